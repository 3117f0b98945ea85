//! CLI argument parsing using clap derive macros
//!
//! Flags keep the single-dash spelling of Go tooling (`-go 1.4`, `-targets=all`).
//! [`normalize_args`] rewrites those to clap's double-dash form before parsing.

use clap::Parser;

use crate::build::targets::ALL_TARGETS;
use crate::build::{self, BuildRequest, RuntimeConfig, DEFAULT_IMAGE_PREFIX, DEFAULT_RUNTIME};
use crate::error::XgoError;
use crate::exec::subprocess::SystemRunner;
use crate::utils::terminal;

/// Long flags that may be written with a single dash
const LONG_FLAGS: &[&str] = &[
    "go", "pkg", "out", "remote", "branch", "deps", "targets", "v", "race", "docker", "image",
    "no-color", "help", "version",
];

/// Go CGO cross compiler
///
/// Cross compiles a Go import path for several platforms inside a Docker
/// toolchain image. Binaries are written to the current directory.
#[derive(Parser, Debug)]
#[command(name = "xgo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Go release to use for cross compilation
    #[arg(long = "go", value_name = "RELEASE", default_value = "latest")]
    pub go_version: String,

    /// Sub-package to build if not root import
    #[arg(long = "pkg", value_name = "PATH")]
    pub package: Option<String>,

    /// Prefix to use for output naming (empty = package name)
    #[arg(long = "out", value_name = "PREFIX")]
    pub out_prefix: Option<String>,

    /// Version control remote repository to build
    #[arg(long, value_name = "URL")]
    pub remote: Option<String>,

    /// Version control branch to build
    #[arg(long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// CGO dependencies (configure/make based archives)
    #[arg(long, value_name = "URLS")]
    pub deps: Option<String>,

    /// Comma separated targets (linux64, linux386, linuxArm, windows64,
    /// windows386, darwin64, darwin386) or `all`
    #[arg(long, value_name = "LIST", default_value = ALL_TARGETS)]
    pub targets: String,

    /// Print the names of packages as they are compiled
    #[arg(long = "v")]
    pub verbose: bool,

    /// Enable data race detection (supported only on amd64)
    #[arg(long)]
    pub race: bool,

    /// Container runtime binary
    #[arg(long, env = "XGO_DOCKER", value_name = "PROGRAM", default_value = DEFAULT_RUNTIME)]
    pub docker: String,

    /// Toolchain image prefix, the Go release is appended to it
    #[arg(long, env = "XGO_IMAGE_PREFIX", value_name = "PREFIX", default_value = DEFAULT_IMAGE_PREFIX)]
    pub image: String,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Go import path to build
    #[arg(value_name = "IMPORT_PATH")]
    pub import_paths: Vec<String>,

    /// Name the program was invoked as
    #[arg(skip)]
    pub program: String,
}

/// Rewrite `-flag` and `-flag=value` into `--flag` forms clap understands.
///
/// Stops at a bare `--`; unknown single-dash arguments pass through untouched.
pub fn normalize_args<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .enumerate()
        .map(|(index, arg)| {
            if index == 0 || passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            match arg.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split('=').next().unwrap_or(rest);
                    if LONG_FLAGS.contains(&name) {
                        format!("-{}", arg)
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}

impl Cli {
    /// Parse Go-style arguments, exiting with usage on clap errors
    pub fn parse_go_style<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = normalize_args(args);
        let program = args.first().cloned().unwrap_or_else(|| "xgo".to_string());
        let mut cli = Self::parse_from(args);
        cli.program = program;
        cli
    }

    /// The immutable request handed to the build pipeline
    pub fn build_request(&self) -> Result<BuildRequest, XgoError> {
        let [import_path] = self.import_paths.as_slice() else {
            return Err(XgoError::invalid_arguments(&self.program));
        };

        Ok(BuildRequest {
            go_version: self.go_version.clone(),
            import_path: import_path.clone(),
            remote: self.remote.clone().unwrap_or_default(),
            branch: self.branch.clone().unwrap_or_default(),
            package: self.package.clone().unwrap_or_default(),
            targets: self.targets.clone(),
            deps: self.deps.clone().unwrap_or_default(),
            out_prefix: self.out_prefix.clone().unwrap_or_default(),
            verbose: self.verbose,
            race: self.race,
        })
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            program: self.docker.clone(),
            image_prefix: self.image.clone(),
        }
    }

    /// Execute the cross compilation
    pub fn execute(self) -> Result<(), XgoError> {
        if self.no_color {
            terminal::set_colors(false);
        }

        let request = self.build_request()?;
        let config = self.runtime_config();
        build::run(&SystemRunner, &config, &request)
    }
}
