//! Shared integration-test server bootstrap helpers.

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use pastelite_server::{create_app, AppState, Config, Database};
use std::path::Path;
use tempfile::TempDir;

pub(crate) const TEST_NOW: HeaderName = HeaderName::from_static("x-test-now-ms");

pub(crate) fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_str().expect("db path").to_string(),
        max_paste_size: 1024,
        reap_interval_secs: 3600,
        test_mode: true,
        public_url: None,
        bind: None,
    }
}

pub(crate) fn test_server_for_config(config: Config) -> TestServer {
    let db = Database::new(config.db_path.as_str()).expect("open db");
    let state = AppState::new(config, db);
    let app = create_app(state, false);
    TestServer::new(app).expect("server")
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let server = test_server_for_config(test_config_for_db_path(&db_path));
    (server, temp_dir)
}

/// Fixed instant requests are pinned to.
pub(crate) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn at(instant: DateTime<Utc>) -> HeaderValue {
    HeaderValue::from_str(&instant.timestamp_millis().to_string()).expect("header value")
}
