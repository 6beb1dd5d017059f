use std::process::ExitCode;

use anyhow::Result;
use snask_core::{parse, path_get, stringify, stringify_pretty};

use super::common::{parse_input, read_input};
use crate::args::JsonCommand;

pub(crate) fn run(cmd: JsonCommand) -> Result<ExitCode> {
    match cmd {
        JsonCommand::Fmt { file, compact } => {
            let value = parse_input(&file)?;
            let out = if compact {
                stringify(&value)
            } else {
                stringify_pretty(&value)
            };
            println!("{out}");
            Ok(ExitCode::SUCCESS)
        }
        JsonCommand::Check { file } => {
            let text = read_input(&file)?;
            match parse(&text) {
                Ok(_) => {
                    println!("ok");
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("{}: {e}", file.display());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        JsonCommand::Get { file, path } => {
            let value = parse_input(&file)?;
            let result = path_get(&value, &path);
            if result.get("ok").is_truthy() {
                println!("{}", stringify(&result.get("value")));
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!("{}", result.get("error"));
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
