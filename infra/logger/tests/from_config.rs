use arcade_domain::config::LoggingConfig;
use arcade_logger::Logger;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn json_flag_writes_json_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");
    let config = LoggingConfig {
        console: false,
        json: true,
        path: Some(log_dir.clone()),
        ..LoggingConfig::default()
    };

    let logger = Logger::from_config("arcade-from-config", &config)?;
    assert!(logger.writes_file());

    tracing::info!(definitions = 2, "Sprite sheet injected");
    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let contents = std::fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| std::fs::read_to_string(entry.path()))
        .collect::<Result<String, _>>()?;
    assert!(contents.contains("\"definitions\":2"), "json output expected, got: {contents}");

    Ok(())
}
