//! Snapshot tests
//!
//! Loads each fixtures/*.json individually and compares if the generated config changes.
//! A fixture holds everything the API would return for one product plus the reveal policy.

mod common;

#[test]
fn snapshots() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("STAGED_CONFIG_LOG"))
        .with_writer(std::io::stderr)
        .init();

    insta::glob!("fixtures/*.json", |path| {
        let fixture = std::fs::read_to_string(path).unwrap();
        let service = common::FakeService::from_json(&fixture);
        let product = service.fixture.product.clone();

        let config = staged_config::document::generate(&service, &product, service.policy())
            .expect("valid config");

        insta::assert_json_snapshot!("config", config);
    });
}
