//! Entry point for running the pipeline in a native window.

use eframe::egui;

use crate::config::StreamPlotConfig;
use crate::error::RenderError;
use crate::orchestrator::{RenderOrchestrator, RunSummary};
use crate::render::LatestFrames;
use crate::ticker::IntervalTicker;

use super::StreamPlotApp;

/// Open a native window and render `orchestrator`'s channels until the
/// window is closed or the stop signal is raised.
///
/// The render loop runs on its own thread at the configured cadence and the
/// window only displays its latest frames, so a hidden or minimised window
/// never holds back draining. Blocks until the window is gone and the loop
/// has shut down.
pub fn run_streamplot(
    orchestrator: RenderOrchestrator,
    config: &StreamPlotConfig,
) -> Result<RunSummary, RenderError> {
    let stop = orchestrator.stop_signal().clone();
    let diagnostics = orchestrator.diagnostics().clone();
    let rows = orchestrator.channels().len();
    let frames = LatestFrames::default();

    let render_loop = orchestrator
        .spawn(IntervalTicker::new(config.tick_interval()), frames.clone())
        .map_err(|e| RenderError::Unavailable(format!("cannot start render loop: {e}")))?;

    let app = StreamPlotApp::new(
        frames,
        diagnostics,
        stop.clone(),
        rows,
        config.title.clone(),
        config.tick_interval(),
    );
    let opts = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.title.clone())
            .with_inner_size(egui::vec2(1200.0, (320.0 * rows.max(1) as f32).min(960.0))),
        ..Default::default()
    };

    let window = eframe::run_native(&config.title, opts, Box::new(|_cc| Ok(Box::new(app))));
    stop.stop();
    let summary = render_loop
        .join()
        .map_err(|_| RenderError::Unavailable("render loop panicked".into()))?;
    window.map_err(|e| RenderError::Unavailable(e.to_string()))?;
    Ok(summary)
}
