//! CopyCure - Duplicate File Remover
//!
//! Entry point for the CopyCure CLI application.

use clap::error::ErrorKind;
use clap::Parser;
use copycure::{cli::Cli, error::ExitCode};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version are not failures; every other parse error is
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::Success,
                _ => ExitCode::GeneralError,
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    match copycure::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = err
                .downcast_ref::<copycure::error::CopyCureError>()
                .map_or(ExitCode::GeneralError, |e| e.exit_code());
            eprintln!("[{}] Error: {}", exit_code.code_prefix(), err);
            std::process::exit(exit_code.as_i32());
        }
    }
}
