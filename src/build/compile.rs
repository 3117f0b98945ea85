//! Toolchain container invocation
//!
//! The container does all of the real work. This module only decides what
//! it gets told: the working directory is mounted at `/build`, every build
//! option becomes an environment variable and the import path is the last
//! argument.

use std::path::Path;

use super::docker::DockerClient;
use super::targets::TargetSet;
use super::BuildRequest;
use crate::error::XgoError;
use crate::exec::subprocess::{CommandRunner, Invocation};
use crate::utils::terminal::print_info;

/// Mount point of the working directory inside the toolchain container
pub const BUILD_MOUNT: &str = "/build";

/// Environment handed to the container, in a fixed order
pub fn container_env(request: &BuildRequest, targets: &TargetSet) -> Vec<(&'static str, String)> {
    let mut env = vec![
        ("REPO_REMOTE", request.remote.clone()),
        ("REPO_BRANCH", request.branch.clone()),
        ("PACK", request.package.clone()),
    ];
    env.extend(
        targets
            .env_pairs()
            .into_iter()
            .map(|(name, enabled)| (name, enabled.to_string())),
    );
    env.extend([
        ("DEPS", request.deps.clone()),
        ("OUT", request.out_prefix.clone()),
        ("FLAG_V", request.verbose.to_string()),
        ("FLAG_RACE", request.race.to_string()),
    ]);
    env
}

/// Build the `run` invocation for a request. Pure: same inputs, same args.
pub fn compile_invocation(
    base: Invocation,
    image: &str,
    request: &BuildRequest,
    targets: &TargetSet,
    workdir: &Path,
) -> Invocation {
    let mut invocation = base
        .arg("-v")
        .arg(format!("{}:{}", workdir.display(), BUILD_MOUNT));

    for (name, value) in container_env(request, targets) {
        invocation = invocation.args(["-e".to_string(), format!("{}={}", name, value)]);
    }

    invocation.arg(image).arg(&request.import_path)
}

/// Cross compile the request into `workdir` using the toolchain container
pub fn compile<R: CommandRunner>(
    client: &DockerClient<'_, R>,
    request: &BuildRequest,
    targets: &TargetSet,
    workdir: &Path,
) -> Result<(), XgoError> {
    let image = client.config().image_for(&request.go_version);
    let invocation = compile_invocation(client.command("run"), &image, request, targets, workdir);

    if request.verbose {
        print_info(&format!("Docker command: {}", invocation));
    }

    println!("Cross compiling {}...", request.import_path);
    let duration = client
        .runner()
        .run(&invocation)
        .map_err(XgoError::compilation_failed)?;

    if request.verbose {
        print_info(&format!("Finished in {:.1}s", duration.as_secs_f64()));
    }
    Ok(())
}
