use mindnest_core::{logging_status, StoreConfig};

#[test]
fn config_log_level_reaches_the_logger() {
    let data_dir = tempfile::tempdir().unwrap();
    let mut config = StoreConfig::load_or_init(data_dir.path()).unwrap();
    config.log_level = Some("warn".into());

    let log_dir = data_dir.path().join("logs");
    let log_dir = log_dir.to_str().unwrap();
    config.init_logging(log_dir).unwrap();
    config.init_logging(log_dir).unwrap();

    let (level, active_dir) = logging_status().unwrap();
    assert_eq!(level, "warn");
    assert_eq!(active_dir, data_dir.path().join("logs"));

    config.log_level = Some("error".into());
    assert!(config
        .init_logging(log_dir)
        .unwrap_err()
        .contains("refusing to switch"));
}
