use std::process::ExitCode;

use clap::Parser;

mod args;
mod commands;
mod logging;

use args::{Cli, Command};
use commands::serve::ServeOptions;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Command::Serve {
            routes,
            host,
            port,
            max_requests,
        } => commands::serve::run(ServeOptions {
            routes: &routes,
            host,
            port,
            max_requests,
        }),
        Command::Json { command } => commands::json::run(command),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
