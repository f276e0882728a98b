#[path = "btoast-demo/app.rs"]
mod app;
#[path = "btoast-demo/cli.rs"]
mod cli;

use std::error::Error as StdError;

fn main() -> std::process::ExitCode {
    let cli = cli::Cli::parse_args();
    match app::run(cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            std::process::ExitCode::from(1)
        }
    }
}

fn report_error(err: &btoast::Error) {
    eprintln!("Error: {err}");
    let mut source: Option<&dyn StdError> = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}
