//! xgo - Go CGO cross compiler launcher
//!
//! Wraps a Docker toolchain image that does the actual cross compilation.
//!
//! ## Architecture
//!
//! ```text
//! Rust CLI → docker version → docker images/pull → docker run <toolchain image>
//! ```

mod build;
mod cli;
mod error;
mod exec;
mod utils;

use std::process::ExitCode;

use cli::Cli;

fn main() -> ExitCode {
    let args = std::env::args_os().map(|arg| arg.to_string_lossy().into_owned());
    let cli = Cli::parse_go_style(args);

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.display();
            ExitCode::FAILURE
        }
    }
}
