use arcade_kernel::config::{ConfigError, load_app_config};
use std::fs;
use tempfile::tempdir;

#[test]
fn toml_file_overrides_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("arcade.toml");
    fs::write(
        &path,
        r#"
[icons]
sprite_path = "/static/icons.svg"
origin = "http://localhost:3000"

[logging]
level = "debug"
"#,
    )?;

    let cfg = load_app_config(Some(&path))?;
    assert_eq!(cfg.icons.sprite_path, "/static/icons.svg");
    assert_eq!(cfg.icons.origin.as_deref(), Some("http://localhost:3000"));
    assert_eq!(cfg.logging.level, "debug");
    assert!((cfg.icons.default_size - 24.0).abs() < f64::EPSILON);
    Ok(())
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempdir().expect("temp dir");
    let err = load_app_config(Some(dir.path().join("absent.toml")))
        .expect_err("missing explicit file must fail");
    assert!(matches!(err, ConfigError::Config { context: Some(_), .. }));
}

#[test]
fn malformed_values_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("arcade.toml");
    fs::write(&path, "[icons]\ndefault_size = \"huge\"\n")?;

    assert!(load_app_config(Some(&path)).is_err());
    Ok(())
}
