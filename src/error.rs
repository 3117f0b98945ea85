//! Error types for the launcher
//!
//! Every stage of the pipeline is fatal on failure. Each variant names the
//! stage that failed and carries the underlying cause so `main` can report
//! it on a single line.

use thiserror::Error;

/// Fatal launcher errors, one per pipeline stage
#[derive(Error, Debug)]
pub enum XgoError {
    /// Wrong number of positional arguments
    #[error("Usage: {program} [options] <go import path>")]
    InvalidArguments { program: String },

    /// Container runtime missing or not responding
    #[error("Failed to check docker installation: {source:#}")]
    RuntimeUnavailable { source: anyhow::Error },

    /// Local image listing failed
    #[error("Failed to check docker image availability: {source:#}")]
    ImageQueryFailed { source: anyhow::Error },

    /// Registry pull failed
    #[error("Failed to pull docker image from the registry: {source:#}")]
    ImagePullFailed { source: anyhow::Error },

    /// Current directory could not be resolved for the volume mount
    #[error("Failed to retrieve the working directory: {source}")]
    WorkingDirectory { source: std::io::Error },

    /// The container exited non-zero or could not be started
    #[error("Failed to cross compile package: {source:#}")]
    CompilationFailed { source: anyhow::Error },
}

impl XgoError {
    pub fn invalid_arguments(program: impl Into<String>) -> Self {
        Self::InvalidArguments {
            program: program.into(),
        }
    }

    pub fn runtime_unavailable(source: impl Into<anyhow::Error>) -> Self {
        Self::RuntimeUnavailable {
            source: source.into(),
        }
    }

    pub fn image_query_failed(source: impl Into<anyhow::Error>) -> Self {
        Self::ImageQueryFailed {
            source: source.into(),
        }
    }

    pub fn image_pull_failed(source: impl Into<anyhow::Error>) -> Self {
        Self::ImagePullFailed {
            source: source.into(),
        }
    }

    pub fn compilation_failed(source: impl Into<anyhow::Error>) -> Self {
        Self::CompilationFailed {
            source: source.into(),
        }
    }

    /// Print the error as a single line on stderr
    pub fn display(&self) {
        let line = self.to_string().replace('\n', " ");
        crate::utils::terminal::print_error(&line);
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Context};

    use super::*;

    #[test]
    fn test_message_wraps_cause() {
        let err = XgoError::runtime_unavailable(anyhow!("docker exited with status 1"));
        assert_eq!(
            err.to_string(),
            "Failed to check docker installation: docker exited with status 1"
        );
    }

    #[test]
    fn test_message_keeps_context_chain_on_one_line() {
        let cause: anyhow::Result<()> = Err(anyhow!("no such file")).context("Failed to execute docker");
        let err = XgoError::compilation_failed(cause.unwrap_err());
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to cross compile package: "));
        assert!(msg.contains("Failed to execute docker: no such file"));
        assert!(!msg.contains('\n'));
    }

    #[test]
    fn test_usage_message() {
        let err = XgoError::invalid_arguments("xgo");
        assert_eq!(err.to_string(), "Usage: xgo [options] <go import path>");
    }
}
