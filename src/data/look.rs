//! Visual styling of a channel's raw polyline and smoothed curve.

use eframe::egui::Color32;
use egui_plot::{LineStyle, MarkerShape};

/// How one channel is drawn.
#[derive(Debug, Clone)]
pub struct ChannelLook {
    pub raw_color: Color32,
    pub raw_width: f32,
    pub marker: MarkerShape,
    pub marker_radius: f32,
    pub smooth_color: Color32,
    pub smooth_width: f32,
    pub smooth_style: LineStyle,
}

impl ChannelLook {
    /// Style for the channel at position `index` in render order.
    pub fn new(index: usize) -> Self {
        let raw_color = Self::alloc_color(index);
        Self {
            raw_color,
            raw_width: 2.0,
            marker: MarkerShape::Circle,
            marker_radius: 3.0,
            smooth_color: raw_color.gamma_multiply(0.55),
            smooth_width: 1.5,
            smooth_style: LineStyle::Solid,
        }
    }

    /// Starts at orange to match the single-stream plot the layout came from.
    pub fn alloc_color(index: usize) -> Color32 {
        const PALETTE: [Color32; 6] = [
            Color32::from_rgb(255, 140, 0),
            Color32::from_rgb(31, 119, 180),
            Color32::from_rgb(44, 160, 44),
            Color32::from_rgb(214, 39, 40),
            Color32::from_rgb(148, 103, 189),
            Color32::from_rgb(23, 190, 207),
        ];
        PALETTE[index % PALETTE.len()]
    }
}
