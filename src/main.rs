//! dxsex - MIDI CC to Yamaha DX/TX sysex bridge
//!
//! Listens on a virtual port, translates controller moves into parameter
//! changes and forwards everything else untouched.

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dxsex::cli::{self, Args};
use dxsex::config::AppConfig;
use dxsex::midi::format_hex;
use dxsex::paths::ConfigSource;
use dxsex::session::{discovery, InboundEvent, Session};
use dxsex::translate::rate_limit::RateLimiter;
use dxsex::translate::Translator;

/// Inbound queue depth between the MIDI callback and the engine
const EVENT_QUEUE: usize = 1024;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level, args.json_logs)?;

    if args.list_ports {
        discovery::print_ports()?;
        return Ok(());
    }

    if args.print_map {
        cli::print_map();
        return Ok(());
    }

    info!("Starting dxsex v{}...", env!("CARGO_PKG_VERSION"));

    let mut config = match ConfigSource::detect(args.config.as_deref()) {
        ConfigSource::Explicit(path) | ConfigSource::Discovered(path) => {
            info!("Configuration file: {}", path.display());
            AppConfig::load(&path).await?
        }
        ConfigSource::Defaults => {
            info!("No configuration file found, using defaults");
            AppConfig::default()
        }
    };
    config.apply(&args.overrides())?;

    run_app(config, shutdown_signal()).await?;

    info!("dxsex shutdown complete");
    Ok(())
}

async fn run_app(config: AppConfig, shutdown: impl std::future::Future<Output = ()>) -> Result<()> {
    let translator = Translator::new(
        config.synth.channel_index(),
        RateLimiter::new(config.synth.coalesce_window()),
    );
    info!(
        "Targeting synth on channel {} (coalescing window {:?})",
        config.synth.device_channel,
        translator.limiter().window()
    );

    let (event_tx, mut event_rx) = mpsc::channel::<InboundEvent>(EVENT_QUEUE);
    let mut session = Session::open(&config.midi, event_tx)?;
    if let Some(name) = session.input_name() {
        info!("Listening on '{}'", name);
    }
    if session.hardware_bound() == Some(false) {
        warn!("Hardware output not bound yet; output muted until it appears");
    }

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(event) = event_rx.recv() => {
                debug!("RX: {}", format_hex(&event.data));
                if let Some(out) = translator.handle(&event.data, event.timestamp) {
                    session.deliver(out.as_bytes());
                }
            }
            _ = &mut shutdown => {
                info!("Shutting down...");
                break;
            }
        }
    }

    session.shutdown();
    info!("Translation stats: {}", translator.stats());

    Ok(())
}

fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .init();
    }

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    info!("Shutdown signal received");
}
