use dormant_logger::{LevelFilter, Logger, LoggerError};

#[test]
fn second_init_reports_subscriber_error() {
    let logger = Logger::builder()
        .name("dormant-init-once")
        .level(LevelFilter::WARN)
        .init()
        .expect("first init should succeed");
    assert!(!logger.has_file_sink());

    let err = Logger::builder()
        .name("dormant-init-twice")
        .init()
        .expect_err("second init should fail");

    assert!(matches!(err, LoggerError::Subscriber { .. }));
}
