use clap::Parser;
use logcord::cli::Cli;
use logcord::config::HookConfig;
use logcord::{Level, LevelColors, WebhookHook};
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// A helper function to run a test with a temporary config file.
fn with_config_file<F>(toml_content: &str, test_fn: F)
where
    F: FnOnce(PathBuf),
{
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", toml_content).unwrap();
    let path = file.path().to_path_buf();
    test_fn(path);
}

#[test]
#[serial]
fn test_load_full_valid_config() {
    let toml_content = r#"
        webhook_url = "https://discord.com/api/webhooks/123/abc"
        min_level = "debug"
        [options]
        username = "Test Username"
        author = "worker-3"
        asynchronous = true
        disable_inline_fields = true
        enable_custom_colors = true
        disable_timestamp = false
        timestamp_format = "%b %-d %H:%M:%S%.f"
        request_timeout_ms = 2500
        [options.custom_level_colors]
        debug = 10170623
        info = 3581519
        warn = 14327864
        error = 13631488
        fatal = 13631488
        panic = 13631488
    "#;

    with_config_file(toml_content, |path| {
        let config = HookConfig::load(Some(&path)).unwrap();

        assert_eq!(config.webhook_url, "https://discord.com/api/webhooks/123/abc");
        assert_eq!(config.min_level, Level::Debug);
        let opts = &config.options;
        assert_eq!(opts.username.as_deref(), Some("Test Username"));
        assert_eq!(opts.author.as_deref(), Some("worker-3"));
        assert!(opts.asynchronous);
        assert!(opts.disable_inline_fields);
        assert!(!opts.disable_timestamp);
        assert_eq!(opts.request_timeout_ms, 2500);
        let colors = opts.level_colors();
        assert_eq!(colors.info, 3581519);
        // Left out of the table, so it stays zero.
        assert_eq!(colors.trace, 0);

        assert!(WebhookHook::from_config(&config).is_ok());
    });
}

#[test]
#[serial]
fn test_defaults_fill_missing_options() {
    with_config_file(r#"webhook_url = "https://example.com/hook""#, |path| {
        let config = HookConfig::load(Some(&path)).unwrap();
        assert_eq!(config.min_level, Level::Warn);
        assert!(!config.options.asynchronous);
        assert_eq!(config.options.level_colors(), LevelColors::DEFAULT);
        assert_eq!(config.options.request_timeout_ms, 10_000);
    });
}

#[test]
#[serial]
fn test_missing_webhook_url_is_rejected() {
    with_config_file(r#"min_level = "error""#, |path| {
        assert!(HookConfig::load(Some(&path)).is_err());
    });
}

#[test]
#[serial]
fn test_custom_colors_without_table_is_rejected() {
    let toml_content = r#"
        webhook_url = "https://example.com/hook"
        [options]
        enable_custom_colors = true
    "#;
    with_config_file(toml_content, |path| {
        let err = HookConfig::load(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("custom_level_colors"));
    });
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    with_config_file(
        r#"
        webhook_url = "https://example.com/hook"
        min_level = "info"
        "#,
        |path| {
            std::env::set_var("LOGCORD_MIN_LEVEL", "error");
            std::env::set_var("LOGCORD_OPTIONS__USERNAME", "from-env");
            let result = HookConfig::load(Some(&path));
            std::env::remove_var("LOGCORD_MIN_LEVEL");
            std::env::remove_var("LOGCORD_OPTIONS__USERNAME");

            let config = result.unwrap();
            assert_eq!(config.min_level, Level::Error);
            assert_eq!(config.options.username.as_deref(), Some("from-env"));
        },
    );
}

#[test]
#[serial]
fn test_cli_overrides_file() {
    with_config_file(
        r#"
        webhook_url = "https://example.com/hook"
        min_level = "info"
        [options]
        username = "from-file"
        "#,
        |path| {
            let cli = Cli::try_parse_from([
                "logcord",
                "--config",
                path.to_str().unwrap(),
                "--min-level",
                "fatal",
                "--webhook-url",
                "https://example.com/other",
                "--async",
            ])
            .unwrap();
            let config = HookConfig::load_from_cli(&cli).unwrap();

            assert_eq!(config.min_level, Level::Fatal);
            assert_eq!(config.webhook_url, "https://example.com/other");
            assert_eq!(config.options.username.as_deref(), Some("from-file"));
            assert!(config.options.asynchronous);
        },
    );
}
