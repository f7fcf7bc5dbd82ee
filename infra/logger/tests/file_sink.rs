use dormant_logger::{LevelFilter, LogFormat, Logger};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn json_file_sink_writes_log_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let logger = Logger::builder()
        .name("dormant-file-sink")
        .console(false)
        .format(LogFormat::Json)
        .level(LevelFilter::INFO)
        .directory(&log_dir)
        .max_files(2)
        .init()?;

    assert!(logger.has_file_sink());
    tracing::info!(resources = 3, "scan finished");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(log_file)?;
    assert!(contents.contains("scan finished"));
    assert!(contents.trim_start().starts_with('{'), "json sink should emit JSON lines");

    Ok(())
}
