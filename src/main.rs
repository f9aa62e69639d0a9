//! logcord - sends a sample log event through the webhook hook
//!
//! Loads the hook configuration, installs the tracing pipeline with the
//! webhook layer attached, and emits the event described on the command line.

use anyhow::{Context, Result};
use clap::Parser;
use logcord::{
    cli::Cli,
    config::HookConfig,
    core::{Hook, LogEvent},
    integrations::WebhookLayer,
    notification::WebhookHook,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How long the process lingers after an asynchronous hand-off.
const ASYNC_GRACE_PERIOD: Duration = Duration::from_secs(2);

/// The wait before exiting once a detached delivery has been started. Never
/// longer than the request itself may take.
fn async_grace_period(request_timeout_ms: u64) -> Duration {
    ASYNC_GRACE_PERIOD.min(Duration::from_millis(request_timeout_ms))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Plain logging first, so configuration errors are visible.
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let config = match HookConfig::load_from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            tracing_subscriber::registry()
                .with(filter())
                .with(fmt::layer())
                .init();
            error!("Failed to load configuration: {:#}", err);
            std::process::exit(1);
        }
    };

    let hook = Arc::new(WebhookHook::from_config(&config).context("Failed to create webhook hook")?);
    tracing_subscriber::registry()
        .with(fmt::layer().with_filter(filter()))
        .with(WebhookLayer::new(hook.clone()))
        .init();

    info!("-------------------- Configuration --------------------");
    info!("Minimum Level: {}", config.min_level);
    info!(
        "Delivery: {}",
        if config.options.asynchronous {
            "Asynchronous"
        } else {
            "Synchronous"
        }
    );
    info!("Forwarded Levels: {:?}", hook.levels());
    info!("-------------------------------------------------------");

    let event = cli
        .fields
        .iter()
        .cloned()
        .fold(LogEvent::new(cli.level, cli.message.clone()), |event, (name, value)| {
            event.with_field(name, value)
        });

    if !hook.levels().contains(&event.level) {
        info!(level = %event.level, "Event is below the configured minimum level; nothing sent");
        return Ok(());
    }

    hook.fire(&event).context("Failed to send notification")?;
    if config.options.asynchronous {
        // Nothing joins the detached delivery, so exiting at once would drop it.
        std::thread::sleep(async_grace_period(config.options.request_timeout_ms));
    }
    info!("Notification sent.");
    Ok(())
}
