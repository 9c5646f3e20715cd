//! Native window renderer.
//!
//! | Sub-module | Responsibility |
//! | ---------- | -------------- |
//! | [`plot`]   | Drawing one channel's raw and smoothed traces with `egui_plot` |
//! | [`run`]    | [`run_streamplot()`] entry point that opens the window |
//!
//! [`StreamPlotApp`] implements [`eframe::App`]. The render loop runs on a
//! thread of its own and hands each tick to a shared [`LatestFrames`]. egui
//! repaints on demand, so the app asks for a repaint every tick period and
//! draws whatever the last tick produced.

mod plot;
mod run;

pub use run::run_streamplot;

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;

use crate::data::look::ChannelLook;
use crate::diagnostics::Diagnostics;
use crate::render::LatestFrames;
use crate::ticker::StopSignal;

pub struct StreamPlotApp {
    frames: LatestFrames,
    diagnostics: Arc<Diagnostics>,
    stop: StopSignal,
    looks: Vec<ChannelLook>,
    title: String,
    repaint_every: Duration,
}

impl StreamPlotApp {
    pub fn new(
        frames: LatestFrames,
        diagnostics: Arc<Diagnostics>,
        stop: StopSignal,
        channels: usize,
        title: String,
        repaint_every: Duration,
    ) -> Self {
        Self {
            frames,
            diagnostics,
            stop,
            looks: (0..channels.max(1)).map(ChannelLook::new).collect(),
            title,
            repaint_every,
        }
    }

    fn render_status(&self, ui: &mut egui::Ui) {
        let d = self.diagnostics.snapshot();
        ui.horizontal(|ui| {
            ui.label(format!("ticks {}", d.ticks));
            ui.separator();
            ui.label(format!("received {}", d.routed));
            ui.separator();
            ui.label(format!("decode errors {}", d.decode_errors));
            ui.separator();
            ui.label(format!("unknown channel {}", d.unknown_channel));
            ui.separator();
            ui.label(format!("smoothing skipped {}", d.interpolation_errors));
        });
    }
}

impl eframe::App for StreamPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.stop.stop();
            return;
        }
        if self.stop.is_stopped() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }
        ctx.request_repaint_after(self.repaint_every);

        egui::TopBottomPanel::top("streamplot_headline").show(ctx, |ui| {
            ui.heading(&self.title);
        });
        egui::TopBottomPanel::bottom("streamplot_status").show(ctx, |ui| {
            self.render_status(ui);
        });
        let frames = self.frames.snapshot();
        egui::CentralPanel::default().show(ctx, |ui| {
            if frames.is_empty() {
                ui.label("Waiting for data…");
                return;
            }
            let spacing = ui.spacing().item_spacing.y;
            let height = (ui.available_height() / frames.len() as f32 - spacing).max(80.0);
            for (idx, frame) in frames.iter().enumerate() {
                let look = &self.looks[idx % self.looks.len()];
                plot::channel_plot(ui, frame, look, height);
            }
        });
    }
}
