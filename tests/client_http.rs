use httpmock::prelude::*;
use std::path::Path;
use tika_samples::{
    client::{Endpoint, Extractor, TikaClient},
    config::Config,
    harness::Harness,
};

fn config_for(server: &MockServer) -> Config {
    let mut cfg = Config::default();
    cfg.server.url = server.base_url();
    cfg.server.timeout_seconds = 5;
    cfg
}

fn write_samples(dir: &Path) {
    std::fs::write(dir.join("alpha.txt"), "alpha body").unwrap();
    std::fs::write(dir.join("beta.txt"), "beta body").unwrap();
}

#[test]
fn put_sends_file_bytes_with_accept_header() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/rmeta/json")
            .header("accept", "application/json")
            .body("alpha body");
        then.status(200).body(r#"[{"X-TIKA:content":"alpha"}]"#);
    });

    let dir = tempfile::tempdir().unwrap();
    write_samples(dir.path());
    let client = TikaClient::new(&config_for(&server)).unwrap();
    let body = client
        .put(Endpoint::RecursiveMeta, &dir.path().join("alpha.txt"))
        .unwrap();

    assert_eq!(body, r#"[{"X-TIKA:content":"alpha"}]"#);
    mock.assert();
}

#[test]
fn non_success_status_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path("/tika");
        then.status(422).body("Unprocessable");
    });

    let dir = tempfile::tempdir().unwrap();
    write_samples(dir.path());
    let client = TikaClient::new(&config_for(&server)).unwrap();
    let err = client
        .put(Endpoint::Text, &dir.path().join("alpha.txt"))
        .unwrap_err();
    assert!(format!("{err:#}").contains("/tika"));
}

#[test]
fn connection_failure_is_an_error() {
    let mut cfg = Config::default();
    cfg.server.url = "http://127.0.0.1:9".into();
    cfg.server.timeout_seconds = 2;
    let dir = tempfile::tempdir().unwrap();
    write_samples(dir.path());

    let client = TikaClient::new(&cfg).unwrap();
    assert!(client.put(Endpoint::Detect, &dir.path().join("beta.txt")).is_err());
}

#[test]
fn harness_round_trip_against_stub_server() {
    let server = MockServer::start();
    let text = server.mock(|when, then| {
        when.method(PUT).path("/tika").header("accept", "text/plain");
        then.status(200).body("plain text\n");
    });
    let meta = server.mock(|when, then| {
        when.method(PUT).path("/meta").header("accept", "application/json");
        then.status(200).body(r#"{"Content-Type":"text/plain"}"#);
    });
    let rmeta = server.mock(|when, then| {
        when.method(PUT).path("/rmeta/json");
        then.status(200).body(r#"[{"Content-Type":"text/plain"}]"#);
    });
    let detect = server.mock(|when, then| {
        when.method(PUT).path("/detect/stream");
        then.status(200).body("text/plain");
    });
    let language = server.mock(|when, then| {
        when.method(PUT).path("/language/stream");
        then.status(200).body("en");
    });

    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_samples(input.path());

    let cfg = config_for(&server);
    let harness = Harness::new(&cfg, TikaClient::new(&cfg).unwrap());
    let report = harness.run(input.path(), out.path()).unwrap();

    assert_eq!(report.files.len(), 2);
    for mock in [&text, &meta, &rmeta, &detect, &language] {
        mock.assert_hits(2);
    }
    let rmeta_out = std::fs::read_to_string(out.path().join("rmeta").join("alpha.json")).unwrap();
    assert_eq!(rmeta_out, "[\n  {\n    \"Content-Type\": \"text/plain\"\n  }\n]");
    let mime = std::fs::read_to_string(out.path().join("detected_mime.tsv")).unwrap();
    assert_eq!(mime, "alpha.txt\ttext/plain\nbeta.txt\ttext/plain");
}

#[test]
fn server_error_aborts_before_later_files() {
    let server = MockServer::start();
    let failing = server.mock(|when, then| {
        when.method(PUT).path("/meta").body("alpha body");
        then.status(500).body("boom");
    });
    let later = server.mock(|when, then| {
        when.method(PUT).path("/tika").body("beta body");
        then.status(200).body("never");
    });
    server.mock(|when, then| {
        when.method(PUT).path("/tika").body("alpha body");
        then.status(200).body("alpha text");
    });

    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_samples(input.path());

    let cfg = config_for(&server);
    let harness = Harness::new(&cfg, TikaClient::new(&cfg).unwrap());
    assert!(harness.run(input.path(), out.path()).is_err());

    failing.assert_hits(1);
    later.assert_hits(0);
    assert!(out.path().join("text").join("alpha.txt.txt").exists());
    assert!(!out.path().join("text").join("beta.txt.txt").exists());
}
