use anyhow::Context;
use clap::Parser;
use glitchlet::cli::Cli;
use glitchlet::{Settings, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.log_format)?;

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        settings.server.bind = bind;
    }

    std::fs::create_dir_all(&settings.storage.temp_root).with_context(|| {
        format!(
            "failed to create temp root '{}'",
            settings.storage.temp_root.display()
        )
    })?;

    let app = glitchlet::app(&settings);
    let listener = tokio::net::TcpListener::bind(settings.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", settings.server.bind))?;

    tracing::info!(
        addr = %settings.server.bind,
        route = %settings.public.route,
        projects_root = %settings.storage.projects_root.display(),
        "glitchlet listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
