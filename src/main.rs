//! streamplot: live plot of synthetic (or routed) time-series channels.
//!
//! Usage:
//!   streamplot [--config path.yaml] [--no-generator] [--headless [--ticks N]]
//!   streamplot --write-default-config path.yaml
//!
//! `RUST_LOG` controls verbosity (default: info).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use streamplot::generator::SyntheticPublisher;
use streamplot::{
    channel_set, Diagnostics, FixedTicks, IntervalTicker, LogRenderer, RenderOrchestrator,
    StopSignal, StreamPlotConfig, Ticker,
};

#[derive(Debug, Parser)]
#[command(name = "streamplot", version, about = "Live time-series plot with spline smoothing")]
struct CliArgs {
    /// YAML configuration file (defaults are used when it does not exist)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log frames instead of opening a window
    #[arg(long)]
    headless: bool,

    /// Stop after this many ticks
    #[arg(long, value_name = "N", requires = "headless")]
    ticks: Option<usize>,

    /// Do not start the synthetic publisher
    #[arg(long)]
    no_generator: bool,

    /// Write the default configuration to PATH and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["config", "headless", "ticks", "no_generator"])]
    write_default_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();

    if let Some(path) = &args.write_default_config {
        StreamPlotConfig::default().save(path)?;
        tracing::info!("wrote default configuration to '{}'", path.display());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => StreamPlotConfig::load(path)?,
        None => StreamPlotConfig::default(),
    };
    config.validate()?;

    tracing::info!("streamplot v{} starting", env!("CARGO_PKG_VERSION"));

    let stop = StopSignal::new();
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || {
            tracing::info!("interrupt received, shutting down");
            stop.stop();
        })
        .context("installing Ctrl-C handler")?;
    }

    let diagnostics = Arc::new(Diagnostics::new());
    let (router, channels) = channel_set(&config, diagnostics.clone(), stop.clone());
    let orchestrator = RenderOrchestrator::new(channels, diagnostics, stop.clone())
        .with_output_points(config.output_points);

    let publisher = if config.generator.enabled && !args.no_generator {
        Some(SyntheticPublisher::spawn(&config.generator, &router).context("starting publisher")?)
    } else {
        None
    };

    let outcome = if args.headless || !cfg!(feature = "gui") {
        run_headless(orchestrator, &config, args.ticks);
        Ok(())
    } else {
        run_window(orchestrator, &config)
    };

    stop.stop();
    if let Some(p) = publisher {
        p.join();
    }
    outcome
}

fn run_headless(mut orchestrator: RenderOrchestrator, config: &StreamPlotConfig, ticks: Option<usize>) {
    let mut renderer = LogRenderer::default();
    let mut ticker: Box<dyn Ticker> = match ticks {
        Some(n) => Box::new(PacedTicks::new(n, IntervalTicker::new(config.tick_interval()))),
        None => Box::new(IntervalTicker::new(config.tick_interval())),
    };
    orchestrator.run(ticker.as_mut(), &mut renderer);
}

#[cfg(feature = "gui")]
fn run_window(orchestrator: RenderOrchestrator, config: &StreamPlotConfig) -> Result<()> {
    streamplot::run_streamplot(orchestrator, config).context("window failed")?;
    Ok(())
}

#[cfg(not(feature = "gui"))]
fn run_window(_orchestrator: RenderOrchestrator, _config: &StreamPlotConfig) -> Result<()> {
    anyhow::bail!("built without the `gui` feature; use --headless")
}

/// Wall-clock cadence limited to a fixed number of ticks.
struct PacedTicks {
    budget: FixedTicks,
    cadence: IntervalTicker,
}

impl PacedTicks {
    fn new(n: usize, cadence: IntervalTicker) -> Self {
        Self {
            budget: FixedTicks::new(n),
            cadence,
        }
    }
}

impl Ticker for PacedTicks {
    fn next_tick(&mut self, stop: &StopSignal) -> bool {
        self.budget.next_tick(stop) && self.cadence.next_tick(stop)
    }
}
