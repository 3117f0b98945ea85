//! Cross compilation orchestration
//!
//! ## Architecture
//!
//! ```text
//! cli.rs → BuildRequest → docker.rs (probe, image) → compile.rs → docker run
//! ```
//!
//! ## Modules
//!
//! - `targets` - Target spec parsing into the per-platform flag set
//! - `docker` - Runtime probing, image presence checks and pulls
//! - `compile` - Assembly and execution of the toolchain container run

pub mod compile;
pub mod docker;
pub mod targets;

use crate::error::XgoError;
use crate::exec::subprocess::CommandRunner;
use docker::DockerClient;

/// Image repository the toolchain releases are published under
pub const DEFAULT_IMAGE_PREFIX: &str = "karalabe/xgo-";

/// Container runtime binary used when none is configured
pub const DEFAULT_RUNTIME: &str = "docker";

/// Everything the toolchain container needs to know about one build.
///
/// Built once from the command line and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Go release appended to the image prefix
    pub go_version: String,
    /// Import path of the repository to build
    pub import_path: String,
    /// Version control remote to fetch instead of the import path
    pub remote: String,
    /// Version control branch to check out
    pub branch: String,
    /// Sub-package to build when the root is not buildable
    pub package: String,
    /// Raw target spec, `all` or a comma separated list
    pub targets: String,
    /// CGO dependency archives (configure/make based)
    pub deps: String,
    /// Output file name prefix, empty for the package name
    pub out_prefix: String,
    /// `go build -v`
    pub verbose: bool,
    /// `go build -race`
    pub race: bool,
}

impl Default for BuildRequest {
    fn default() -> Self {
        Self {
            go_version: "latest".to_string(),
            import_path: String::new(),
            remote: String::new(),
            branch: String::new(),
            package: String::new(),
            targets: targets::ALL_TARGETS.to_string(),
            deps: String::new(),
            out_prefix: String::new(),
            verbose: false,
            race: false,
        }
    }
}

/// Which runtime and image repository to talk to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Container runtime binary
    pub program: String,
    /// Image name prefix, the Go release is appended to it
    pub image_prefix: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_RUNTIME.to_string(),
            image_prefix: DEFAULT_IMAGE_PREFIX.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Toolchain image for a Go release
    pub fn image_for(&self, go_version: &str) -> String {
        format!("{}{}", self.image_prefix, go_version)
    }
}

/// Run the whole pipeline: probe the runtime, make sure the toolchain image
/// is present, then cross compile into the current directory.
pub fn run<R: CommandRunner>(
    runner: &R,
    config: &RuntimeConfig,
    request: &BuildRequest,
) -> Result<(), XgoError> {
    let client = DockerClient::new(runner, config);

    client.check_installation()?;
    client.ensure_image(&config.image_for(&request.go_version))?;

    let selected = targets::select(&request.targets);
    let workdir = std::env::current_dir().map_err(|source| XgoError::WorkingDirectory { source })?;

    compile::compile(&client, request, &selected, &workdir)
}
