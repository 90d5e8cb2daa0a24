use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{info, warn};

use bossreport_core::{PipelineOptions, ReportPipeline};
use bossreport_logging::{init_tracing, LogFormat, Logger};
use bossreport_mailer::{Mailer, NoopMailer, SmtpMailer};
use bossreport_narrative::{NarrativeRequester, OpenAiNarrator};

use crate::api;
use crate::config::{AppConfig, FileConfig};

pub struct ServeArgs {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config_path: PathBuf,
    pub log_format: LogFormat,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

pub async fn handle_serve_command(args: ServeArgs) -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("Failed to load .env");
        }
    }

    init_tracing(&args.log_level, args.log_format);

    let file = FileConfig::load(&args.config_path)?.unwrap_or_default();
    let mut config = AppConfig::from_parts(file, |key| std::env::var(key).ok())?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let narrator = build_narrator(&config)?;
    let mailer = build_mailer(&config)?;

    let logger = match &args.log_file {
        Some(path) => Logger::with_file(args.log_format, path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?,
        None => Logger::new(args.log_format),
    };

    let options = PipelineOptions {
        mode: config.narrative.mode,
        strict_age: config.strict_age,
        metrics: config.metrics.clone(),
    };
    let pipeline = Arc::new(ReportPipeline::new(
        narrator,
        mailer,
        Arc::new(logger),
        options,
    ));

    info!(
        narrator = pipeline.narrator_name(),
        model = %config.narrative.model,
        mode = ?config.narrative.mode,
        mailer = pipeline.mailer_name(),
        strict_age = config.strict_age,
        "Pipeline ready"
    );

    let router = api::create_router(pipeline);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind server to {}", addr))?;

    eprintln!();
    eprintln!(
        "  {} {}",
        "->".bright_green(),
        format!("Listening on http://{}", addr).bold()
    );
    eprintln!("  {} Press {} to stop", "->".dimmed(), "Ctrl+C".bold());
    eprintln!();

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

fn build_narrator(config: &AppConfig) -> Result<Arc<dyn NarrativeRequester>> {
    let settings = &config.narrative;
    let mut narrator = OpenAiNarrator::new(settings.api_key.clone())
        .with_base_url(settings.base_url.clone())
        .with_model(settings.model.clone());
    if let Some(timeout) = settings.timeout {
        narrator = narrator
            .with_timeout(timeout)
            .context("Failed to configure narrative client")?;
    }
    Ok(Arc::new(narrator))
}

fn build_mailer(config: &AppConfig) -> Result<Arc<dyn Mailer>> {
    match &config.mail {
        Some(settings) => {
            let mailer = SmtpMailer::new(settings.clone()).context("Invalid [mail] settings")?;
            Ok(Arc::new(mailer))
        }
        None => {
            warn!("SMTP_PASSWORD or SMTP username is not set; reports will not be emailed");
            Ok(Arc::new(NoopMailer))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    eprintln!("\nShutting down...");
}
