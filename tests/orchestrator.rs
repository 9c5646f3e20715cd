use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveDateTime};
use streamplot::{
    channel_set, ChannelRouter, Diagnostics, FixedTicks, IntervalTicker, LatestFrames,
    RenderError, RenderFrame, RenderOrchestrator, RenderSink, Sample, StopSignal,
    StreamPlotConfig, Ticker,
};

fn at(s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(10, 0, s)
        .unwrap()
}

#[derive(Default)]
struct Recorder {
    ticks: Vec<Vec<RenderFrame>>,
}

impl RenderSink for Recorder {
    fn render(&mut self, frames: &[RenderFrame]) -> Result<(), RenderError> {
        self.ticks.push(frames.to_vec());
        Ok(())
    }
}

struct AlwaysBusy;

impl RenderSink for AlwaysBusy {
    fn render(&mut self, _frames: &[RenderFrame]) -> Result<(), RenderError> {
        Err(RenderError::Busy)
    }
}

fn setup() -> (ChannelRouter, RenderOrchestrator) {
    let mut cfg = StreamPlotConfig::default();
    cfg.output_points = 50;
    let diagnostics = Arc::new(Diagnostics::new());
    let stop = StopSignal::new();
    let (router, channels) = channel_set(&cfg, diagnostics.clone(), stop.clone());
    let orch = RenderOrchestrator::new(channels, diagnostics, stop).with_output_points(cfg.output_points);
    (router, orch)
}

#[test]
fn tick_emits_one_frame_per_channel_in_config_order() {
    let (_router, mut orch) = setup();
    let mut rec = Recorder::default();
    let report = orch.tick(&mut rec);
    assert!(report.rendered);
    let names: Vec<&str> = rec.ticks[0].iter().map(|f| f.channel.as_str()).collect();
    assert_eq!(names, vec!["time_series/data", "time_series/data_stream_2"]);
    assert!(rec.ticks[0].iter().all(|f| f.raw.is_empty() && f.smoothed.is_none()));
}

#[test]
fn short_window_renders_raw_only() {
    let (router, mut orch) = setup();
    for s in 0..3 {
        router.route_sample("time_series/data", Sample::new(at(s), s as f64));
    }
    let mut rec = Recorder::default();
    let report = orch.tick(&mut rec);
    assert_eq!(report.drained, 3);
    let frame = &rec.ticks[0][0];
    assert_eq!(frame.raw.len(), 3);
    assert!(frame.smoothed.is_none());
    assert_eq!(report.interpolation_errors, 0);
}

#[test]
fn enough_points_produce_smoothed_curve() {
    let (router, mut orch) = setup();
    for (s, v) in [(0, 5.0), (1, 7.0), (2, 3.0), (3, 9.0)] {
        router.route_sample("time_series/data", Sample::new(at(s), v));
    }
    let mut rec = Recorder::default();
    let report = orch.tick(&mut rec);
    assert_eq!(report.smoothed, 1);
    let curve = rec.ticks[0][0].smoothed.as_ref().expect("smoothed");
    assert_eq!(curve.len(), 50);
    assert!((curve[0].y - 5.0).abs() < 1e-9);
    assert!((curve[49].y - 9.0).abs() < 1e-9);
}

#[test]
fn duplicate_timestamps_skip_smoothing_but_keep_raw() {
    let (router, mut orch) = setup();
    for (s, v) in [(0, 1.0), (1, 2.0), (1, 2.5), (2, 3.0), (3, 4.0)] {
        router.route_sample("time_series/data", Sample::new(at(s), v));
    }
    let mut rec = Recorder::default();
    let report = orch.tick(&mut rec);
    assert_eq!(report.interpolation_errors, 1);
    let frame = &rec.ticks[0][0];
    assert_eq!(frame.raw.len(), 5);
    assert!(frame.smoothed.is_none());

    // The loop keeps going and the error stays observable.
    orch.tick(&mut rec);
    assert_eq!(orch.diagnostics().snapshot().interpolation_errors, 2);
    assert_eq!(rec.ticks.len(), 2);
}

#[test]
fn failing_renderer_never_blocks_draining() {
    let (router, mut orch) = setup();
    router.route_sample("time_series/data", Sample::new(at(0), 1.0));
    let report = orch.tick(&mut AlwaysBusy);
    assert!(!report.rendered);
    assert_eq!(report.drained, 1);
    assert_eq!(orch.channel("time_series/data").unwrap().window().len(), 1);
    assert_eq!(orch.diagnostics().snapshot().skipped_frames, 1);
}

#[test]
fn run_stops_when_ticker_is_exhausted_and_raises_stop() {
    let (router, mut orch) = setup();
    let mut rec = Recorder::default();
    let summary = orch.run(&mut FixedTicks::new(3), &mut rec);
    assert_eq!(summary.ticks, 3);
    assert_eq!(rec.ticks.len(), 3);
    assert!(router.stop_signal().is_stopped());
}

#[test]
fn run_does_not_tick_once_stopped() {
    let (router, mut orch) = setup();
    router.stop_signal().stop();
    let mut rec = Recorder::default();
    let summary = orch.run(&mut FixedTicks::new(10), &mut rec);
    assert_eq!(summary.ticks, 0);
    assert!(rec.ticks.is_empty());
}

/// Raises the stop signal from inside the loop after `n` ticks.
struct StopAfter {
    n: usize,
    stop: StopSignal,
}

impl Ticker for StopAfter {
    fn next_tick(&mut self, stop: &StopSignal) -> bool {
        if self.n == 0 {
            self.stop.stop();
        } else {
            self.n -= 1;
        }
        !stop.is_stopped()
    }
}

#[test]
fn shutdown_discards_pending_and_rejects_new_work() {
    let (router, mut orch) = setup();
    let mut ticker = StopAfter {
        n: 2,
        stop: router.stop_signal().clone(),
    };
    let mut rec = Recorder::default();
    let summary = orch.run(&mut ticker, &mut rec);
    assert_eq!(summary.ticks, 2);

    router.route_sample("time_series/data", Sample::new(at(0), 1.0));
    assert_eq!(router.pending("time_series/data"), Some(0));
    assert_eq!(orch.diagnostics().snapshot().dropped_after_stop, 1);
}

#[test]
fn samples_flow_end_to_end_across_ticks() {
    let (router, mut orch) = setup();
    let mut rec = Recorder::default();
    for s in 0..6 {
        router
            .route(
                "time_series/data_stream_2",
                format!(r#"{{"timestamp": "2024-01-15 10:00:{:02}", "value": {}}}"#, s, s).as_bytes(),
            )
            .unwrap();
        orch.tick(&mut rec);
    }
    let last = rec.ticks.last().unwrap();
    let ys: Vec<f64> = last[1].raw.iter().map(|p| p.y).collect();
    assert_eq!(ys, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(last[1].smoothed.as_ref().map(Vec::len), Some(50));
    assert_eq!(orch.diagnostics().snapshot().drained, 6);
}

#[test]
fn spawned_loop_drains_without_anyone_reading_frames() {
    let (router, orch) = setup();
    let stop = router.stop_signal().clone();
    let frames = LatestFrames::default();
    let handle = orch
        .spawn(IntervalTicker::new(Duration::from_millis(5)), frames.clone())
        .unwrap();

    for s in 0..8 {
        router.route_sample("time_series/data", Sample::new(at(s), s as f64));
    }
    let deadline = Instant::now() + Duration::from_secs(10);
    while router.pending("time_series/data") != Some(0) && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(router.pending("time_series/data"), Some(0));

    // Wait for the tick that drained the last sample to be handed over.
    while frames.snapshot().first().map_or(0, |f| f.raw.len()) < 8 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    let latest = frames.snapshot();
    assert_eq!(latest[0].raw.len(), 8);
    assert_eq!(latest[0].smoothed.as_ref().map(Vec::len), Some(50));

    stop.stop();
    let summary = handle.join().unwrap();
    assert!(summary.ticks >= 1);
    assert_eq!(summary.diagnostics.drained, 8);
}
