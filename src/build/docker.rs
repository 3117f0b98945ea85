//! Docker runtime probing and image management
//!
//! Only three runtime subcommands are used here: `version` to check the
//! installation, `images --no-trunc` to look for the toolchain image and
//! `pull` to fetch it when missing.

use anyhow::anyhow;

use super::RuntimeConfig;
use crate::error::XgoError;
use crate::exec::subprocess::{CommandRunner, Invocation};
use crate::utils::terminal::create_spinner;

/// Outcome of making sure the toolchain image is present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    /// Already in the local image store
    Present,
    /// Fetched from the registry during this run
    Pulled,
}

/// Thin client over the container runtime CLI
pub struct DockerClient<'a, R: CommandRunner> {
    runner: &'a R,
    config: &'a RuntimeConfig,
}

impl<'a, R: CommandRunner> DockerClient<'a, R> {
    pub fn new(runner: &'a R, config: &'a RuntimeConfig) -> Self {
        Self { runner, config }
    }

    pub fn runner(&self) -> &R {
        self.runner
    }

    pub fn config(&self) -> &RuntimeConfig {
        self.config
    }

    /// Start an invocation of the runtime binary
    pub fn command(&self, subcommand: &str) -> Invocation {
        Invocation::new(&self.config.program).arg(subcommand)
    }

    /// Check that the runtime is installed and its daemon answers
    pub fn check_installation(&self) -> Result<(), XgoError> {
        println!("Checking docker installation...");

        let program = &self.config.program;
        if !self.runner.is_available(program) {
            return Err(XgoError::runtime_unavailable(anyhow!(
                "{} not found in PATH",
                program
            )));
        }

        self.runner
            .run(&self.command("version"))
            .map_err(XgoError::runtime_unavailable)?;

        println!();
        Ok(())
    }

    /// Whether the image shows up in the full local image listing
    pub fn image_exists(&self, image: &str) -> Result<bool, XgoError> {
        let listing = self.command("images").arg("--no-trunc");

        let spinner = create_spinner(&format!("Checking for required docker image {}...", image));
        let output = self.runner.capture(&listing);
        spinner.finish_and_clear();

        let output = output.map_err(XgoError::image_query_failed)?;
        Ok(output.contains(image))
    }

    /// Fetch the image from its registry, streaming progress
    pub fn pull_image(&self, image: &str) -> Result<(), XgoError> {
        println!("Pulling {} from docker registry...", image);
        self.runner
            .run(&self.command("pull").arg(image))
            .map_err(XgoError::image_pull_failed)?;
        Ok(())
    }

    /// Make the image available locally, pulling it if absent
    pub fn ensure_image(&self, image: &str) -> Result<ImageStatus, XgoError> {
        let found = self.image_exists(image)?;
        let verdict = if found { "found." } else { "not found!" };
        println!("Checking for required docker image {}... {}", image, verdict);
        if found {
            return Ok(ImageStatus::Present);
        }

        self.pull_image(image)?;
        Ok(ImageStatus::Pulled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::subprocess::testing::RecordingRunner;

    const LISTING: &str = "REPOSITORY          TAG     IMAGE ID\n\
                           karalabe/xgo-latest latest  sha256:0123\n";

    #[test]
    fn test_check_installation_runs_version() {
        let runner = RecordingRunner::default();
        let config = RuntimeConfig::default();
        DockerClient::new(&runner, &config).check_installation().unwrap();

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], Invocation::new("docker").arg("version"));
    }

    #[test]
    fn test_check_installation_failure() {
        let runner = RecordingRunner::with_outcomes(vec![Err("docker exited with status 1")]);
        let config = RuntimeConfig::default();
        let err = DockerClient::new(&runner, &config)
            .check_installation()
            .unwrap_err();
        assert!(matches!(err, XgoError::RuntimeUnavailable { .. }));
        assert!(err.to_string().contains("exited with status 1"));
    }

    #[test]
    fn test_missing_binary_skips_version_query() {
        let runner = RecordingRunner {
            missing: true,
            ..Default::default()
        };
        let config = RuntimeConfig::default();
        let err = DockerClient::new(&runner, &config)
            .check_installation()
            .unwrap_err();
        assert!(matches!(err, XgoError::RuntimeUnavailable { .. }));
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_image_exists_uses_full_listing() {
        let runner = RecordingRunner::with_outcomes(vec![Ok(LISTING)]);
        let config = RuntimeConfig::default();
        let client = DockerClient::new(&runner, &config);

        assert!(client.image_exists("karalabe/xgo-latest").unwrap());
        assert_eq!(
            runner.calls.borrow()[0].args,
            vec!["images", "--no-trunc"]
        );
    }

    #[test]
    fn test_image_query_failure() {
        let runner = RecordingRunner::with_outcomes(vec![Err("daemon not running")]);
        let config = RuntimeConfig::default();
        let err = DockerClient::new(&runner, &config)
            .image_exists("karalabe/xgo-latest")
            .unwrap_err();
        assert!(matches!(err, XgoError::ImageQueryFailed { .. }));
    }

    #[test]
    fn test_present_image_is_not_pulled() {
        let runner = RecordingRunner::with_outcomes(vec![Ok(LISTING)]);
        let config = RuntimeConfig::default();
        let status = DockerClient::new(&runner, &config)
            .ensure_image("karalabe/xgo-latest")
            .unwrap();

        assert_eq!(status, ImageStatus::Present);
        assert_eq!(runner.subcommands(), vec!["images"]);
    }

    #[test]
    fn test_absent_image_is_pulled() {
        let runner = RecordingRunner::with_outcomes(vec![Ok(LISTING), Ok("")]);
        let config = RuntimeConfig::default();
        let status = DockerClient::new(&runner, &config)
            .ensure_image("karalabe/xgo-1.4.2")
            .unwrap();

        assert_eq!(status, ImageStatus::Pulled);
        assert_eq!(runner.subcommands(), vec!["images", "pull"]);
        assert_eq!(
            runner.calls.borrow()[1],
            Invocation::new("docker").args(["pull", "karalabe/xgo-1.4.2"])
        );
    }

    #[test]
    fn test_pull_failure() {
        let runner = RecordingRunner::with_outcomes(vec![Ok(""), Err("manifest unknown")]);
        let config = RuntimeConfig::default();
        let err = DockerClient::new(&runner, &config)
            .ensure_image("karalabe/xgo-0.0")
            .unwrap_err();
        assert!(matches!(err, XgoError::ImagePullFailed { .. }));
        assert!(err.to_string().contains("manifest unknown"));
    }

    #[test]
    fn test_custom_runtime_program() {
        let runner = RecordingRunner::default();
        let config = RuntimeConfig {
            program: "podman".to_string(),
            ..Default::default()
        };
        DockerClient::new(&runner, &config).check_installation().unwrap();
        assert_eq!(runner.calls.borrow()[0].program, "podman");
    }
}
