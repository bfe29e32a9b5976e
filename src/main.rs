//! notenav - navigate outline notes from the command line
//!
//! Command-line usage:
//!   notenav headings --tagged     - Tagged headings under the current directory
//!   notenav backlinks plan.org    - Notes linking to plan.org
//!   notenav --help                - Everything else

use clap::Parser;
use notenav::cli::{run, Cli};
use notenav::NavError;
use std::process::ExitCode;

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let mut stdout = std::io::stdout().lock();
    match run(&cli, &mut stdout).await {
        Ok(0) => {
            // 結果なしはエラーではない
            eprintln!("nothing found");
            ExitCode::from(1)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<NavError>() {
                // 設定・環境の問題は対処方法も表示
                Some(nav_err) if nav_err.is_setup_error() => {
                    eprintln!("notenav: {}", nav_err);
                    eprintln!("hint: see `notenav --help` for --config, --ext and the rg/fd requirements");
                }
                _ => eprintln!("notenav: {:#}", err),
            }
            ExitCode::from(2)
        }
    }
}
