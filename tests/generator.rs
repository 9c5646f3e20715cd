use std::sync::Arc;
use std::time::{Duration, Instant};

use streamplot::config::{GeneratorConfig, GeneratorStream};
use streamplot::generator::{payload, SyntheticPublisher};
use streamplot::router::decode_payload;
use streamplot::{channel_set, Diagnostics, StopSignal, StreamPlotConfig};

#[test]
fn payload_round_trips_through_decoder() {
    let s = decode_payload(&payload(42.25)).unwrap();
    assert_eq!(s.value, 42.25);
}

#[test]
fn publisher_feeds_queues_and_stops_promptly() {
    let cfg = StreamPlotConfig::default();
    let diagnostics = Arc::new(Diagnostics::new());
    let stop = StopSignal::new();
    let (router, channels) = channel_set(&cfg, diagnostics.clone(), stop.clone());

    let gen = GeneratorConfig {
        enabled: true,
        min_value: 10.0,
        max_value: 100.0,
        streams: vec![GeneratorStream {
            channel: "time_series/data".into(),
            interval_ms: 5,
        }],
    };
    let publisher = SyntheticPublisher::spawn(&gen, &router).unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while channels[0].queue().len() < 3 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    stop.stop();
    publisher.join();

    let queued = channels[0].queue().take_all();
    assert!(queued.len() >= 3);
    assert!(queued.iter().all(|s| (10.0..100.0).contains(&s.value)));
    assert!(channels[1].queue().is_empty());
    assert_eq!(diagnostics.snapshot().decode_errors, 0);
}

#[test]
fn spawn_rejects_a_range_it_cannot_sample() {
    let cfg = StreamPlotConfig::default();
    let (router, _channels) = channel_set(&cfg, Arc::new(Diagnostics::new()), StopSignal::new());
    let mut gen = cfg.generator.clone();
    gen.min_value = -1e308;
    gen.max_value = 1e308;
    assert!(SyntheticPublisher::spawn(&gen, &router).is_err());

    gen.min_value = 5.0;
    gen.max_value = f64::INFINITY;
    assert!(SyntheticPublisher::spawn(&gen, &router).is_err());
}
