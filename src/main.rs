use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use mediaweb::cli::Cli;
use mediaweb::config::Settings;
use mediaweb::service::{self, SystemdController};
use mediaweb::web::{self, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mediaweb=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::new().context("Failed to load config")?;
    settings.apply_overrides(cli.dir.clone(), cli.host_port.as_deref())?;

    if let Some(action) = cli.action {
        let controller = SystemdController::new()?;
        let status = service::perform(&controller, action, &service::install_args(&settings)?)
            .with_context(|| format!("Service action {:?} failed", action))?;
        println!("{}", status);
        return Ok(());
    }

    let state = Arc::new(AppState::from_settings(&settings)?);
    info!("[Startup] Serving {:?}", state.root.path());
    if state.root.follows_symlinks() {
        info!("[Startup] Symlinks leaving the served root will be followed");
    }

    let app = web::build_router(state);

    let addr = settings.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("[Startup] Service ready at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
