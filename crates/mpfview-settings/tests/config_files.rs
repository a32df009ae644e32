//! Config file round trips through JSON and TOML

use mpfview_settings::{Config, SettingsError};
use tempfile::tempdir;

fn custom_config() -> Config {
    let mut config = Config::new();
    config.segmentation.step_size_mm = 2.5;
    config.segmentation.max_step_size_mm = 50.0;
    config.logging.level = "mpfview_parser=trace".to_string();
    config.logging.json = true;
    config
}

#[test]
fn toml_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let config = custom_config();

    config.save_to_file(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("[segmentation]"));

    assert_eq!(Config::load_from_file(&path).unwrap(), config);
}

#[test]
fn json_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = custom_config();

    config.save_to_file(&path).unwrap();
    assert_eq!(Config::load_from_file(&path).unwrap(), config);
}

#[test]
fn invalid_file_contents_are_rejected() {
    let dir = tempdir().unwrap();

    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[segmentation\nstep_size_mm = ").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::TomlError(_))
    ));

    let path = dir.path().join("out_of_range.json");
    std::fs::write(&path, r#"{"segmentation": {"step_size_mm": 0.1}}"#).unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::InvalidSetting { .. })
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::IoError(_))
    ));
}

#[test]
fn invalid_config_is_not_saved() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut config = Config::new();
    config.segmentation.step_size_mm = -1.0;
    assert!(config.save_to_file(&path).is_err());
    assert!(!path.exists());
}
