//! Drawing a single channel.

use eframe::egui;
use egui_plot::{Corner, Legend, Line, Plot, Points};

use crate::data::look::ChannelLook;
use crate::render::RenderFrame;
use crate::sink::PlotPoint;

fn to_plot_points(points: &[PlotPoint]) -> Vec<[f64; 2]> {
    points.iter().map(PlotPoint::as_array).collect()
}

/// Format an axis value (seconds since the epoch) as wall-clock time.
pub(crate) fn format_time_axis(x: f64) -> String {
    let secs = x.floor() as i64;
    let nsecs = ((x - secs as f64) * 1e9) as u32;
    chrono::DateTime::from_timestamp(secs, nsecs)
        .map(|dt| dt.naive_utc().format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Plot the raw polyline (with markers) and, when present, the smoothed curve.
pub(super) fn channel_plot(ui: &mut egui::Ui, frame: &RenderFrame, look: &ChannelLook, height: f32) {
    let plot = Plot::new(("streamplot_channel", frame.channel.as_str()))
        .height(height)
        .allow_scroll(false)
        .x_axis_label("Timestamp")
        .y_axis_label("Value")
        .x_axis_formatter(|mark, _range| format_time_axis(mark.value))
        .legend(Legend::default().position(Corner::LeftTop));

    ui.strong(&frame.label);
    plot.show(ui, |plot_ui| {
        if let Some(curve) = &frame.smoothed {
            plot_ui.line(
                Line::new("Smoothed", to_plot_points(curve))
                    .color(look.smooth_color)
                    .width(look.smooth_width)
                    .style(look.smooth_style),
            );
        }
        plot_ui.line(
            Line::new("Straight Line Connection", to_plot_points(&frame.raw))
                .color(look.raw_color)
                .width(look.raw_width),
        );
        plot_ui.points(
            Points::new("Samples", to_plot_points(&frame.raw))
                .color(look.raw_color)
                .shape(look.marker)
                .radius(look.marker_radius),
        );
    });
}
