//! # mosaic-runner
//!
//! Main entry point for the mosaic streamer.
//!
//! Loads a JSON configuration file, seeds the price series over HTTP,
//! connects to the message bus, and runs the ingest worker, the wallet
//! refresh scheduler, and the frame compositor until Ctrl+C.
//!
//! # Usage
//!
//! ```bash
//! mosaic-runner config.json --log-level info
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use mosaic_core::bus::client::{BusClient, BusClientConfig, Subscription};
use mosaic_feed::decode::{Route, TopicFamily};
use mosaic_feed::state::MarketState;
use mosaic_feed::wallet::WalletClient;
use mosaic_feed::{backfill, ingest, scheduler};
use mosaic_render::compositor::Compositor;
use mosaic_render::layout::FrameLayout;
use mosaic_render::sink::{FfmpegSink, FileSink, FrameSink};

/// Market-data mosaic compositor and streamer.
#[derive(Parser)]
#[command(name = "mosaic-runner", about = "Market-data mosaic compositor and streamer")]
struct Cli {
    /// Configuration file path (JSON).
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional log directory for file output.
    #[arg(long)]
    log_dir: Option<String>,

    /// Override the broker URL from the config.
    #[arg(long)]
    broker: Option<String>,

    /// Override the output destination from the config.
    #[arg(long)]
    output: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let mut config = mosaic_core::config::load_config(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(broker) = cli.broker {
        config.broker_url = broker;
    }
    if let Some(output) = cli.output {
        config.output = output;
    }

    // 2. Initialize logging
    let module_name = config.module_name();
    let log_dir = cli.log_dir.as_deref().or(config.log_path.as_deref());
    mosaic_core::logging::init_logging(&cli.log_level, log_dir, &module_name);

    info!("{module_name} starting — config={}, log_level={}", cli.config.display(), cli.log_level,);

    // 3. Validate the layout and build the routing table
    let layout = FrameLayout::from_config(&config.canvas, &config.cells)?;
    let mut routes = Vec::with_capacity(config.subscriptions.len());
    for sub in &config.subscriptions {
        let family = TopicFamily::parse(&sub.family)?;
        routes.push(Route { pattern: sub.pattern.clone(), family });
    }
    info!("layout {}x{}, {} cells, {} routes", layout.width, layout.height, layout.cells.len(), routes.len(),);

    let state = MarketState::new(config.series.cap());
    let http = reqwest::Client::new();

    // 4. Seed the price series. A failed backfill is not fatal — the chart
    // fills from streaming updates instead.
    match backfill::fetch_price_history(&http, &config.series.backfill_url).await {
        Ok(samples) => state.seed_series(samples),
        Err(e) => warn!("backfill failed, starting with an empty series: {e}"),
    }

    // 5. Open the output sink
    let sink: Box<dyn FrameSink> = if config.output.starts_with("rtmp://") {
        Box::new(FfmpegSink::spawn(
            &config.output,
            layout.width,
            layout.height,
            config.update_fps(),
            config.movie_fps(),
        )?)
    } else {
        info!("output '{}' is not rtmp, writing raw frames", config.output);
        Box::new(FileSink::create(&config.output)?)
    };

    // 6. Start the ingest worker and the bus client
    let (ingest_tx, ingest_rx) = ingest::channel();
    let ingest_task = {
        let state = state.clone();
        let routes = routes.clone();
        let symbol = config.series.symbol.clone();
        tokio::task::spawn_blocking(move || {
            ingest::run_ingest_loop(ingest_rx, &routes, &symbol, &state);
        })
    };

    let mut bus = BusClient::new(BusClientConfig {
        url: config.broker_url.clone(),
        subscriptions: config
            .subscriptions
            .iter()
            .map(|s| Subscription { pattern: s.pattern.clone(), request: s.request.clone() })
            .collect(),
        ping_interval: Some(Duration::from_secs(30)),
    });
    bus.start(ingest::bus_callback(ingest_tx));

    // 7. Start the wallet refresh scheduler, if configured
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let refresh_task = config.wallet.as_ref().map(|wallet| {
        let client = WalletClient::new(http.clone(), wallet.rpc_url.clone());
        scheduler::spawn_refresh(
            state.clone(),
            move || {
                let client = client.clone();
                async move { client.poll_balance().await }
            },
            Duration::from_secs(wallet.poll_interval_sec()),
            shutdown_rx.clone(),
        )
    });

    // 8. Start the compositor
    let compositor = Compositor::new(
        state,
        layout,
        config.canvas.background(),
        sink,
        config.series.symbol.replace('_', "/"),
        config.series.cap(),
        config.update_fps(),
    )?;
    let compositor_task = tokio::spawn(compositor.run(shutdown_rx));

    info!("all tasks started — press Ctrl+C to stop");

    // 9. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    // 10. Stop everything. Stopping the bus drops the ingest sender, which
    // ends the ingest loop.
    let _ = shutdown_tx.send(true);
    bus.stop().await;
    ingest_task.await?;
    compositor_task.await?;
    if let Some(task) = refresh_task {
        task.await?;
    }

    info!("all tasks stopped — goodbye");
    Ok(())
}
