// Environment-driven configuration, loaded once at startup.

use std::str::FromStr;

/// Settings for the sandboxed compile/run pipeline.
///
/// Defaults mirror the reference deployment: `gcc:latest` image, C++17,
/// 2 second wall clock, 128 MiB and half a core per test run.
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// Docker image used for both compilation and execution.
    pub image: String,
    /// Language standard passed to the compiler (`-std=<value>`).
    pub language_standard: String,
    /// Wall-clock budget for the compile container.
    pub compile_timeout_ms: u64,
    /// Wall-clock budget per test-case run.
    pub run_timeout_ms: u64,
    /// Memory ceiling per test-case run.
    pub memory_limit_mb: u32,
    /// CPU share per test-case run (fraction of one core).
    pub cpu_limit: f32,
}

impl JudgeConfig {
    pub fn from_env() -> Self {
        Self {
            image: env_or("SANDBOX_IMAGE", "gcc:latest".to_string()),
            language_standard: env_or("LANGUAGE_STANDARD", "c++17".to_string()),
            compile_timeout_ms: env_or("COMPILE_TIMEOUT_MS", 10_000),
            run_timeout_ms: env_or("RUN_TIMEOUT_MS", 2_000),
            memory_limit_mb: env_or("MEMORY_LIMIT_MB", 128),
            cpu_limit: env_or("CPU_LIMIT", 0.5),
        }
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            image: "gcc:latest".to_string(),
            language_standard: "c++17".to_string(),
            compile_timeout_ms: 10_000,
            run_timeout_ms: 2_000,
            memory_limit_mb: 128,
            cpu_limit: 0.5,
        }
    }
}

/// Settings for the HTTP surface.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8080".to_string()),
        }
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
