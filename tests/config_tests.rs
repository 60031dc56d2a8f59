//! Configuration loading tests

use shortkeep::config::args::{Cli, Command, ConfigCommand};
use shortkeep::config::{StaticConfig, get_config, update_config};
use clap::Parser;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write config");
    path.to_string_lossy().into_owned()
}

#[test]
fn test_load_from_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "custom.toml",
        r#"
        [server]
        host = "0.0.0.0"
        port = 9090

        [database]
        database_url = "memory://"
        timeout = 2

        [api]
        identity_header = "x-owner"
        "#,
    );

    let config = StaticConfig::load(Some(&path));
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.database.database_url, "memory://");
    assert_eq!(config.database.timeout, 2);
    assert_eq!(config.api.identity_header, "x-owner");
    // 未设置的项使用默认值
    assert_eq!(config.database.pool_size, 10);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let config = StaticConfig::load(Some("/definitely/not/here/config.toml"));
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.database.database_url, "shortened_urls.db");
}

#[test]
fn test_environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "env.toml",
        r#"
        [api]
        redirect_max_age = 10
        "#,
    );

    // SAFETY: 该测试是本文件中唯一修改这些环境变量的地方
    unsafe {
        std::env::set_var("SK__API__REDIRECT_MAX_AGE", "42");
        std::env::set_var("SK__CORS__ALLOWED_ORIGINS", "https://a.example,https://b.example");
    }

    let config = StaticConfig::load(Some(&path));

    unsafe {
        std::env::remove_var("SK__API__REDIRECT_MAX_AGE");
        std::env::remove_var("SK__CORS__ALLOWED_ORIGINS");
    }

    assert_eq!(config.api.redirect_max_age, 42);
    assert_eq!(
        config.cors.allowed_origins,
        vec!["https://a.example".to_string(), "https://b.example".to_string()]
    );
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("saved.toml");

    let mut config = StaticConfig::default();
    config.server.port = 7070;
    config.api.max_short_id_length = 32;
    config.save_to_file(&path).unwrap();

    let reloaded = StaticConfig::load(Some(path.to_str().unwrap()));
    assert_eq!(reloaded.server.port, 7070);
    assert_eq!(reloaded.api.max_short_id_length, 32);
}

#[test]
fn test_update_config_replaces_global() {
    let mut config = StaticConfig::default();
    config.api.redirect_max_age = 1234;
    update_config(config);

    assert_eq!(get_config().api.redirect_max_age, 1234);
}

#[test]
fn test_cli_config_generate() {
    let cli = Cli::parse_from(["shortkeep", "config", "generate", "-o", "out.toml"]);
    assert_eq!(
        cli.command(),
        &Command::Config(ConfigCommand::Generate {
            output: Some("out.toml".to_string())
        })
    );
}
