//! `cotizador` binary entry point.

use clap::Parser;
use std::process::ExitCode;

use cotizador_cli::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    cotizador_cli::init_tracing(cli.verbose);

    match cotizador_cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            ExitCode::from(err.exit_code())
        }
    }
}
