use dormant_kernel::config::{ConfigError, load_config, validate};
use dormant_kernel::domain::config::ApiConfig;
use serial_test::serial;
use std::io::Write;

const KEY: &str = "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4";

fn write_config(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().expect("temp file");
    file.write_all(body.as_bytes()).expect("write config");
    file
}

#[test]
#[serial]
fn loads_file_with_section_defaults() {
    let file = write_config(&format!(
        r#"
[server]
port = 9000

[security]
token_key = "{KEY}"

[scanner]
concurrency = 4
"#
    ));

    let cfg: ApiConfig = load_config(Some(file.path())).expect("config loads");

    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.security.token_key, KEY);
    assert_eq!(cfg.scanner.concurrency, 4);
    assert_eq!(cfg.scanner.default_window_days, 90);
    assert_eq!(cfg.crm.api_version, "59.0");
    assert!(validate(&cfg).is_ok());
}

#[test]
#[serial]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = load_config::<ApiConfig>(Some(dir.path().join("absent.toml")));
    assert!(matches!(result, Err(ConfigError::Config { .. })));
}

#[test]
fn validation_rejects_unusable_settings() {
    let mut cfg = ApiConfig::default();
    cfg.security.token_key = KEY.to_owned();
    assert!(validate(&cfg).is_ok());

    let mut zero = cfg.clone();
    zero.scanner.concurrency = 0;
    let err = validate(&zero).unwrap_err();
    assert!(err.to_string().contains("scanner.concurrency"));

    let mut window = cfg.clone();
    window.scanner.default_window_days = window.scanner.max_window_days + 1;
    assert!(matches!(validate(&window), Err(ConfigError::Invalid { .. })));

    let mut timeout = cfg.clone();
    timeout.scanner.query_timeout_secs = 0;
    assert!(validate(&timeout).is_err());

    let mut century = cfg.clone();
    century.scanner.max_window_days = 36_500;
    assert!(validate(&century).is_ok());

    let mut unbounded = cfg.clone();
    unbounded.scanner.max_window_days = u32::MAX;
    let err = validate(&unbounded).unwrap_err();
    assert!(err.to_string().contains("scanner.max_window_days"), "{err}");

    let mut open_hosts = cfg.clone();
    open_hosts.crm.allowed_host_suffixes.clear();
    let err = validate(&open_hosts).unwrap_err();
    assert!(err.to_string().contains("crm.allowed_host_suffixes"), "{err}");

    let mut keyless = cfg;
    keyless.security.token_key.clear();
    assert!(validate(&keyless).is_err());
}
