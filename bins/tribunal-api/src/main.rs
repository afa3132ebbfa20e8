mod handlers;
mod routes;
mod store;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tribunal_common::config::{JudgeConfig, ServerConfig};
use tribunal_judge::{ContainerSandbox, Judge, RunLimits};

use store::ProblemStore;

pub struct AppState {
    pub store: ProblemStore,
    pub judge: Judge<ContainerSandbox>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Tribunal API booting...");

    let judge_config = JudgeConfig::from_env();
    let server_config = ServerConfig::from_env();
    info!(
        image = %judge_config.image,
        run_timeout_ms = judge_config.run_timeout_ms,
        memory_limit_mb = judge_config.memory_limit_mb,
        cpu_limit = judge_config.cpu_limit,
        "Judge configuration loaded"
    );

    let sandbox = ContainerSandbox::new(&judge_config)?;
    let judge = Judge::new(sandbox, RunLimits::from(&judge_config));

    let store = ProblemStore::new();
    store.seed_samples();
    info!(problems = store.list().len(), "Problem store seeded");

    let state = Arc::new(AppState { store, judge });

    let app = routes::routes().with_state(state);

    let listener = TcpListener::bind(&server_config.bind_addr).await?;
    info!("HTTP server listening on {}", server_config.bind_addr);
    info!("Ready to accept submissions");

    axum::serve(listener, app).await?;

    Ok(())
}
