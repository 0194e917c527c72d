use relink::{emit, logging, JsonLineLogger, LogLevel, LogRotationPolicy};
use serde_json::Value;

#[test]
fn records_serialize_as_json_lines() {
    let mut logger = JsonLineLogger::new(LogRotationPolicy::default());
    logger
        .log(LogLevel::Info, "reconcile", "event stream open")
        .unwrap();
    let lines = logger.lines();
    assert_eq!(lines.len(), 1);
    let record: Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(record["level"], "INFO");
    assert_eq!(record["module"], "reconcile");
    assert_eq!(record["message"], "event stream open");
    assert!(record["ts_ms"].is_u64());
}

#[test]
fn records_below_level_are_dropped() {
    let mut logger =
        JsonLineLogger::new(LogRotationPolicy::default()).with_level(LogLevel::Info);
    logger.log(LogLevel::Debug, "reconcile", "event").unwrap();
    assert!(logger.lines().is_empty());
    logger.set_level(LogLevel::Debug);
    logger.log(LogLevel::Debug, "reconcile", "event").unwrap();
    assert_eq!(logger.lines().len(), 1);
}

#[test]
fn rotation_caps_retained_segments() {
    let policy = LogRotationPolicy {
        max_bytes: 96,
        max_files: 2,
    };
    let mut logger = JsonLineLogger::new(policy);
    for index in 0..32 {
        logger
            .log(LogLevel::Info, "watchdog", &format!("tick {index}"))
            .unwrap();
    }
    let segments = logger.files().count();
    assert!(segments <= policy.max_files + 1, "got {segments} segments");
    for file in logger.files() {
        assert!(file.bytes_written() <= policy.max_bytes + 96);
    }
}

#[test]
fn shared_logger_collects_from_any_thread() {
    let logger = logging::shared_for_tests();
    let clone = logger.clone();
    let handle = std::thread::spawn(move || {
        emit(&clone, LogLevel::Info, "watchdog", "neighbor table updated");
    });
    handle.join().unwrap();
    emit(&logger, LogLevel::Info, "reconcile", "reloading");
    let guard = logger.lock().unwrap();
    assert_eq!(guard.lines().len(), 2);
}
