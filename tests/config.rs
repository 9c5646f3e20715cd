use streamplot::config::GeneratorStream;
use streamplot::{ChannelConfig, ConfigError, StreamPlotConfig};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("streamplot-test-{}-{}", std::process::id(), name))
}

#[test]
fn defaults_match_documented_values() {
    let cfg = StreamPlotConfig::default();
    assert_eq!(cfg.tick_interval_ms, 50);
    assert_eq!(cfg.output_points, 500);
    assert_eq!(cfg.channels.len(), 2);
    assert!(cfg.channels.iter().all(|c| c.capacity == 100));
    assert_eq!(cfg.generator.min_value, 10.0);
    assert_eq!(cfg.generator.max_value, 100.0);
    assert!(cfg.validate().is_ok());
}

#[test]
fn partial_yaml_fills_in_defaults() {
    let yaml = r#"
tick_interval_ms: 20
channels:
  - name: sensors/temp
    capacity: 10
  - name: sensors/humidity
generator:
  enabled: false
"#;
    let cfg = StreamPlotConfig::from_yaml(yaml).unwrap();
    assert_eq!(cfg.tick_interval_ms, 20);
    assert_eq!(cfg.output_points, 500);
    assert_eq!(cfg.channels[0].capacity, 10);
    assert_eq!(cfg.channels[1].capacity, 100);
    assert!(!cfg.generator.enabled);
}

#[test]
fn save_then_load_from_disk() {
    let path = temp_path("save.yaml");
    let mut cfg = StreamPlotConfig::default();
    cfg.title = "Bench".into();
    cfg.channels.push(ChannelConfig::new("extra").with_capacity(5));
    cfg.save(&path).unwrap();
    let loaded = StreamPlotConfig::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, cfg);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let cfg = StreamPlotConfig::load(temp_path("does-not-exist.yaml")).unwrap();
    assert_eq!(cfg, StreamPlotConfig::default());
}

#[test]
fn malformed_yaml_is_an_error() {
    assert!(matches!(
        StreamPlotConfig::from_yaml("channels: [ {name: 1, capacity: -3} ]"),
        Err(ConfigError::Yaml(_))
    ));
}

#[test]
fn zero_capacity_is_rejected() {
    let mut cfg = StreamPlotConfig::default();
    cfg.channels[0].capacity = 0;
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn duplicate_channel_is_rejected() {
    let mut cfg = StreamPlotConfig::default();
    cfg.channels.push(ChannelConfig::new("time_series/data"));
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn too_few_output_points_is_rejected() {
    let mut cfg = StreamPlotConfig::default();
    cfg.output_points = 1;
    assert!(cfg.validate().is_err());
}

#[test]
fn generator_must_target_configured_channels() {
    let mut cfg = StreamPlotConfig::default();
    cfg.generator.streams.push(GeneratorStream {
        channel: "nowhere".into(),
        interval_ms: 100,
    });
    assert!(cfg.validate().is_err());

    cfg.generator.enabled = false;
    assert!(cfg.validate().is_ok());
}

#[test]
fn empty_generator_range_is_rejected() {
    let mut cfg = StreamPlotConfig::default();
    cfg.generator.min_value = 5.0;
    cfg.generator.max_value = 5.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn generator_range_wider_than_f64_is_rejected() {
    let mut cfg = StreamPlotConfig::default();
    cfg.generator.min_value = -1e308;
    cfg.generator.max_value = 1e308;
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

    // A disabled generator never samples the range.
    cfg.generator.enabled = false;
    assert!(cfg.validate().is_ok());
}

#[test]
fn infinite_generator_bound_in_yaml_is_rejected() {
    let yaml = r#"
generator:
  min_value: 0.0
  max_value: .inf
"#;
    assert!(matches!(
        StreamPlotConfig::from_yaml(yaml),
        Err(ConfigError::Invalid(_))
    ));
}
