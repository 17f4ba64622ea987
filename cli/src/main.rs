//! agentdeploy CLI - package agent code and preflight deployments

use std::process::ExitCode;

use clap::Parser;

use agentdeploy_cli::cli::Cli;
use agentdeploy_cli::domain::{format_error, format_panic_payload};
use agentdeploy_cli::logging;
use agentdeploy_cli::output::json;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    std::panic::set_hook(Box::new(|info| {
        eprintln!("Error: {}", format_panic_payload(info.payload()));
    }));

    let json_mode = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json_mode {
                match json::format_error(&format!("{e:#}"), json::error_code(&e)) {
                    Ok(text) => println!("{text}"),
                    Err(_) => eprintln!("Error: {}", format_error(&e)),
                }
            } else {
                eprintln!("Error: {}", format_error(&e));
            }
            ExitCode::FAILURE
        }
    }
}
