use lucy_app::{Config, RunMode};
use lucy_providers::ProviderKind;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_full_config_parsing() {
    let toml = r#"
        [llm]
        provider = "gemini"
        model = "gemini-1.5-flash"
        api_key = "secret"

        [agent]
        data_dir = "/var/lib/lucy"
        profile = "./profiles/lucy.yaml"
        max_iterations = 8
        step_timeout_secs = 20
        mode = "autonomous"
    "#;

    let config: Config = toml::from_str(toml).unwrap();
    assert_eq!(config.llm.provider, ProviderKind::Gemini);
    assert_eq!(config.llm.model.as_deref(), Some("gemini-1.5-flash"));
    assert_eq!(config.agent.data_dir, PathBuf::from("/var/lib/lucy"));
    assert_eq!(
        config.agent.profile,
        Some(PathBuf::from("./profiles/lucy.yaml"))
    );
    assert_eq!(config.agent.max_iterations, 8);
    assert_eq!(config.agent.step_timeout(), Duration::from_secs(20));
    assert_eq!(config.agent.mode, RunMode::Autonomous);
    config.validate().unwrap();
}

#[test]
fn test_minimal_config_defaults() {
    let config: Config = toml::from_str("[llm]\nprovider = \"none\"\n").unwrap();
    assert_eq!(config.llm.provider, ProviderKind::Disabled);
    assert_eq!(config.agent.data_dir, PathBuf::from("./data"));
    assert_eq!(config.agent.max_iterations, 5);
    assert_eq!(config.agent.step_timeout_secs, 60);
    assert_eq!(config.agent.mode, RunMode::Pipeline);
    assert!(config.agent.profile.is_none());
}

#[test]
fn test_invalid_mode_rejected() {
    let result: Result<Config, _> = toml::from_str("[agent]\nmode = \"turbo\"\n");
    assert!(result.is_err());
}

#[test]
fn test_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.agent.max_iterations = 3;
    config.llm.base_url = Some("http://localhost:1234/v1".to_string());
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.agent.max_iterations, 3);
    assert_eq!(
        loaded.llm.base_url.as_deref(),
        Some("http://localhost:1234/v1")
    );
    assert_eq!(loaded.llm.provider, ProviderKind::LmStudio);
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.agent.max_iterations, 5);
    assert!(Config::load(dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_overrides_win_over_file() {
    let mut config: Config =
        toml::from_str("[llm]\nprovider = \"github\"\napi_key = \"old\"\nmodel = \"gpt-4o\"\n")
            .unwrap();
    config.apply_overrides(Some("new".to_string()), Some("  ".to_string()));
    assert_eq!(config.llm.api_key.as_deref(), Some("new"));
    assert_eq!(config.llm.model.as_deref(), Some("gpt-4o"));
}

#[test]
fn test_validation() {
    let mut config = Config::default();
    config.agent.max_iterations = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.agent.step_timeout_secs = 0;
    assert!(config.validate().is_err());

    let config: Config = toml::from_str("[llm]\nprovider = \"yandexgpt\"\napi_key = \"k\"\n").unwrap();
    assert!(config.validate().is_err());
}
