use tika_samples::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../tika-samples.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.server.url, "http://127.0.0.1:9998");
    assert_eq!(cfg.server.timeout_seconds, 120);
    assert_eq!(cfg.endpoints.rmeta, "/rmeta/json");
    assert!(!cfg.generator.font_candidates.is_empty());
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let raw = r#"
[server]
url = "http://tika:9998"
url_env = "X"
timeout_seconds = 5
"#;
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.server.url, "http://tika:9998");
    assert_eq!(cfg.paths.samples_dir, "tika_samples");
    assert_eq!(cfg.output.mime_summary, "detected_mime.tsv");
}

#[test]
fn url_override_replaces_configured_url() {
    let mut cfg = Config::default();
    cfg.apply_url_override(Some("http://10.0.0.5:9998/"));
    assert_eq!(cfg.base_url(), "http://10.0.0.5:9998");
}
