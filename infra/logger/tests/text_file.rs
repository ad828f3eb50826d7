use arcade_domain::config::LoggingConfig;
use arcade_logger::Logger;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn configured_path_writes_plain_text() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("nested/logs");
    let config = LoggingConfig {
        level: "debug".to_owned(),
        console: false,
        path: Some(log_dir.clone()),
        ..LoggingConfig::default()
    };

    let logger = Logger::from_config("arcade-text", &config)?;
    assert!(logger.writes_file());

    tracing::debug!(path = "/sprite.svg", "Reusing sprite injected earlier in this session");
    tracing::trace!("below the configured level");
    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let files: Vec<_> = fs::read_dir(&log_dir)?.flatten().map(|entry| entry.path()).collect();
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().and_then(|n| n.to_str()).unwrap_or_default();
    assert!(name.starts_with("arcade-text") && name.ends_with(".log"), "file name: {name}");

    let contents = fs::read_to_string(&files[0])?;
    assert!(contents.contains("Reusing sprite injected earlier in this session"));
    assert!(contents.contains("path=\"/sprite.svg\""), "text fields expected, got: {contents}");
    assert!(!contents.contains("below the configured level"));
    assert!(!contents.contains('\u{1b}'), "no ANSI escapes in files");
    assert!(!contents.trim_start().starts_with('{'), "text, not JSON");

    Ok(())
}
