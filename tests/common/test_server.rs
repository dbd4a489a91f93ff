//! Mock release feed shared by the integration tests.

use std::io::Write;
use std::time::Duration;

use flate2::Compression;
use flate2::write::GzEncoder;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const FEED_PATH: &str = "/repos/tags/releases/latest";
pub const ASSET_PATH: &str = "/download/db.html.json.gz";

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("gzip write");
    encoder.finish().expect("gzip finish")
}

pub fn sample_database(sha: &str) -> Value {
    json!({
        "head": {"sha": sha},
        "data": [
            {"namespace": "artist", "data": {"two words": {"name": "<p>Two Words</p>"}}},
            {"namespace": "rows", "data": {"artist": {"name": "Artist"}}},
            {"namespace": "misc", "data": {"foo": {"name": "<p>Bar</p>", "intro": "a misc tag"}}}
        ]
    })
}

pub fn feed_url(server: &MockServer) -> String {
    format!("{}{FEED_PATH}", server.uri())
}

/// Serves a release whose database asset is a gzip of `database`.
pub async fn mount_release(server: &MockServer, version: &str, database: &Value) {
    mount_slow_release(server, version, database, Duration::ZERO).await;
}

/// Like [`mount_release`], but the asset download takes at least `delay`.
pub async fn mount_slow_release(
    server: &MockServer,
    version: &str,
    database: &Value,
    delay: Duration,
) {
    Mock::given(method("GET"))
        .and(path(FEED_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "target_commitish": version,
            "html_url": format!("https://example.invalid/releases/{version}"),
            "assets": [{
                "name": "db.html.json.gz",
                "browser_download_url": format!("{}{ASSET_PATH}", server.uri())
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(ASSET_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(gzip(database.to_string().as_bytes()))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}
