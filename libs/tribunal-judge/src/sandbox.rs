//! Isolated execution boundary for untrusted code.
//!
//! The judge's only contract with the container runtime is: "run this
//! command, with these caps, against this mounted directory, and report
//! exit status". No persistent state inside the runtime is assumed across
//! invocations. The [`Sandbox`] trait keeps the backend swappable and
//! mockable; [`ContainerSandbox`] is the Docker implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bollard::container::{
    Config, CreateContainerOptions, KillContainerOptions, LogOutput, LogsOptions,
    RemoveContainerOptions, StartContainerOptions, WaitContainerOptions,
};
use bollard::image::CreateImageOptions;
use bollard::models::HostConfig;
use bollard::Docker;
use futures_util::stream::StreamExt;
use tracing::{debug, info, warn};
use tribunal_common::config::JudgeConfig;

use crate::workspace::{Workspace, BINARY_FILE, INPUT_FILE, OUTPUT_FILE, SOURCE_FILE};

/// Directory the workspace is mounted at inside the container.
const MOUNT_POINT: &str = "/box";

/// Resource caps applied to one sandboxed test run.
#[derive(Debug, Clone)]
pub struct RunLimits {
    pub wall_time_ms: u64,
    pub memory_limit_mb: u32,
    pub cpu_limit: f32,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            wall_time_ms: 2_000,
            memory_limit_mb: 128,
            cpu_limit: 0.5,
        }
    }
}

impl From<&JudgeConfig> for RunLimits {
    fn from(config: &JudgeConfig) -> Self {
        Self {
            wall_time_ms: config.run_timeout_ms,
            memory_limit_mb: config.memory_limit_mb,
            cpu_limit: config.cpu_limit,
        }
    }
}

/// Result of one compile attempt inside the sandbox.
#[derive(Debug, Clone)]
pub struct CompileOutcome {
    pub success: bool,
    /// Compiler output, verbatim. Empty on success.
    pub diagnostics: String,
}

impl CompileOutcome {
    pub fn success() -> Self {
        Self {
            success: true,
            diagnostics: String::new(),
        }
    }

    pub fn failure(diagnostics: impl Into<String>) -> Self {
        Self {
            success: false,
            diagnostics: diagnostics.into(),
        }
    }
}

/// Result of one sandboxed test run.
///
/// Everything except `Exited(0)` classifies as a failed test case; the
/// distinction exists for logging only.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The process ran to completion with this exit status.
    Exited(i64),
    /// The wall-clock budget expired and the sandbox killed the process.
    TimedOut,
    /// The sandbox could not launch the process at all.
    LaunchFailed(String),
}

/// Narrow external-process contract: compile once, run once per test.
///
/// Both operations see the workspace as a mounted directory and nothing
/// else of the host.
#[async_trait]
pub trait Sandbox: Send + Sync {
    /// Compile the workspace's source file into its binary artifact.
    ///
    /// `Err` means the sandbox infrastructure itself failed; a failed
    /// compilation is an `Ok` outcome carrying diagnostics.
    async fn compile(&self, workspace: &Workspace) -> Result<CompileOutcome>;

    /// Run the compiled artifact with stdin redirected from the
    /// workspace's input file and stdout redirected to its output file.
    async fn run(&self, workspace: &Workspace, limits: &RunLimits) -> RunOutcome;
}

/// Removes the container on drop, so cleanup survives panics and early
/// returns. Removal is best-effort and logged.
struct ContainerGuard {
    docker: Docker,
    container_id: String,
}

impl ContainerGuard {
    fn new(docker: &Docker, container_id: String) -> Self {
        Self {
            docker: docker.clone(),
            container_id,
        }
    }
}

impl Drop for ContainerGuard {
    fn drop(&mut self) {
        let docker = self.docker.clone();
        let container_id = self.container_id.clone();

        tokio::spawn(async move {
            let remove_options = RemoveContainerOptions {
                force: true,
                ..Default::default()
            };
            if let Err(e) = docker.remove_container(&container_id, Some(remove_options)).await {
                warn!(container_id = %container_id, error = %e, "failed to remove container");
            }
        });
    }
}

/// Docker-backed sandbox. One throwaway container per compile and per
/// test run, workspace bind-mounted at [`MOUNT_POINT`], network disabled.
pub struct ContainerSandbox {
    docker: Docker,
    image: String,
    language_standard: String,
    compile_timeout_ms: u64,
}

impl ContainerSandbox {
    pub fn new(config: &JudgeConfig) -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()
            .context("failed to connect to Docker daemon")?;

        Ok(Self {
            docker,
            image: config.image.clone(),
            language_standard: config.language_standard.clone(),
            compile_timeout_ms: config.compile_timeout_ms,
        })
    }

    /// Verify the image exists locally, pulling it if missing.
    async fn ensure_image(&self) -> Result<()> {
        if self.docker.inspect_image(&self.image).await.is_ok() {
            debug!(image = %self.image, "image cache hit");
            return Ok(());
        }

        warn!(image = %self.image, "image cache miss, pulling");
        let options = Some(CreateImageOptions {
            from_image: self.image.as_str(),
            ..Default::default()
        });

        let mut stream = self.docker.create_image(options, None, None);
        while let Some(result) = stream.next().await {
            result.context("failed to pull sandbox image")?;
        }

        info!(image = %self.image, "image pulled");
        Ok(())
    }

    fn bind_mount(&self, workspace: &Workspace) -> String {
        format!("{}:{}", workspace.path().display(), MOUNT_POINT)
    }

    /// Create and start a throwaway container; the returned guard removes
    /// it on drop.
    async fn launch(
        &self,
        cmd: Vec<String>,
        host_config: HostConfig,
    ) -> Result<(String, ContainerGuard)> {
        let container_name = format!("tribunal-{}", uuid::Uuid::new_v4());
        let config = Config {
            image: Some(self.image.clone()),
            cmd: Some(cmd),
            working_dir: Some(MOUNT_POINT.to_string()),
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            network_disabled: Some(true),
            host_config: Some(host_config),
            ..Default::default()
        };

        let create_options = CreateContainerOptions {
            name: container_name.as_str(),
            platform: None,
        };

        let container = self
            .docker
            .create_container(Some(create_options), config)
            .await
            .context("failed to create container")?;

        let container_id = container.id;
        let guard = ContainerGuard::new(&self.docker, container_id.clone());

        self.docker
            .start_container(&container_id, None::<StartContainerOptions<String>>)
            .await
            .context("failed to start container")?;

        Ok((container_id, guard))
    }

    /// Wait for the container to stop and report its exit status.
    async fn wait_exit(&self, container_id: &str) -> Option<i64> {
        let options = WaitContainerOptions {
            condition: "not-running",
        };
        let mut stream = self.docker.wait_container(container_id, Some(options));

        match stream.next().await {
            Some(Ok(response)) => Some(response.status_code),
            // A non-zero exit surfaces as this error variant; the status
            // is still known.
            Some(Err(bollard::errors::Error::DockerContainerWaitError { code, .. })) => Some(code),
            Some(Err(e)) => {
                warn!(container_id = %container_id, error = %e, "failed waiting on container");
                None
            }
            None => None,
        }
    }

    /// Collect the container's stdout and stderr into one string, in
    /// arrival order.
    async fn collect_logs(&self, container_id: &str) -> String {
        let options = Some(LogsOptions::<String> {
            stdout: true,
            stderr: true,
            follow: true,
            ..Default::default()
        });

        let mut logs = String::new();
        let mut stream = self.docker.logs(container_id, options);
        while let Some(output) = stream.next().await {
            match output {
                Ok(LogOutput::StdOut { message }) | Ok(LogOutput::StdErr { message }) => {
                    logs.push_str(&String::from_utf8_lossy(&message));
                }
                Err(e) => {
                    warn!(container_id = %container_id, error = %e, "failed reading container logs");
                    break;
                }
                _ => {}
            }
        }
        logs
    }

    async fn kill(&self, container_id: &str) {
        if let Err(e) = self
            .docker
            .kill_container(container_id, None::<KillContainerOptions<String>>)
            .await
        {
            warn!(container_id = %container_id, error = %e, "failed to kill container");
        }
    }
}

#[async_trait]
impl Sandbox for ContainerSandbox {
    async fn compile(&self, workspace: &Workspace) -> Result<CompileOutcome> {
        self.ensure_image().await?;

        let cmd = vec![
            "g++".to_string(),
            "-o".to_string(),
            BINARY_FILE.to_string(),
            SOURCE_FILE.to_string(),
            format!("-std={}", self.language_standard),
        ];
        let host_config = HostConfig {
            binds: Some(vec![self.bind_mount(workspace)]),
            ..Default::default()
        };

        let (container_id, _guard) = self.launch(cmd, host_config).await?;

        let finished = async {
            let diagnostics = self.collect_logs(&container_id).await;
            let status = self.wait_exit(&container_id).await;
            (diagnostics, status)
        };

        match tokio::time::timeout(Duration::from_millis(self.compile_timeout_ms), finished).await {
            Ok((_, Some(0))) => Ok(CompileOutcome::success()),
            Ok((diagnostics, _)) => Ok(CompileOutcome::failure(diagnostics)),
            Err(_) => {
                self.kill(&container_id).await;
                Ok(CompileOutcome::failure(format!(
                    "compiler did not finish within {}ms",
                    self.compile_timeout_ms
                )))
            }
        }
    }

    async fn run(&self, workspace: &Workspace, limits: &RunLimits) -> RunOutcome {
        // The redirects live inside the container; the judge only ever
        // touches the mounted files.
        let shell = format!("./{} < {} > {}", BINARY_FILE, INPUT_FILE, OUTPUT_FILE);
        let cmd = vec!["sh".to_string(), "-c".to_string(), shell];
        let host_config = HostConfig {
            binds: Some(vec![self.bind_mount(workspace)]),
            memory: Some(i64::from(limits.memory_limit_mb) * 1024 * 1024),
            nano_cpus: Some((f64::from(limits.cpu_limit) * 1_000_000_000.0) as i64),
            ..Default::default()
        };

        let (container_id, _guard) = match self.launch(cmd, host_config).await {
            Ok(launched) => launched,
            Err(e) => return RunOutcome::LaunchFailed(e.to_string()),
        };

        let wall_time = Duration::from_millis(limits.wall_time_ms);
        match tokio::time::timeout(wall_time, self.wait_exit(&container_id)).await {
            Ok(Some(status)) => RunOutcome::Exited(status),
            Ok(None) => RunOutcome::LaunchFailed("no exit status reported".to_string()),
            Err(_) => {
                self.kill(&container_id).await;
                RunOutcome::TimedOut
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_derive_from_config() {
        let config = JudgeConfig::default();
        let limits = RunLimits::from(&config);
        assert_eq!(limits.wall_time_ms, 2_000);
        assert_eq!(limits.memory_limit_mb, 128);
        assert_eq!(limits.cpu_limit, 0.5);
    }

    #[test]
    fn compile_outcome_constructors() {
        assert!(CompileOutcome::success().success);
        let failed = CompileOutcome::failure("error: expected ';'");
        assert!(!failed.success);
        assert_eq!(failed.diagnostics, "error: expected ';'");
    }
}
