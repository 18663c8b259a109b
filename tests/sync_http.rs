use std::fs;

use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mindsync::app::{AppContext, MindsyncError};
use mindsync::cli::commands;
use mindsync::config::{Config, RemoteConfig};
use mindsync::fetcher::{Fetcher, HttpFetcher};

fn config_for(server: &MockServer, output: std::path::PathBuf) -> Config {
    let mut config = Config::default();
    config.sync.user_id = "u1".into();
    config.sync.output = output;
    config.sync.workers = Some(2);
    config.remote.feed_base = format!("{}/feeds", server.uri());
    config.remote.entity_base = format!("{}/entities", server.uri());
    config
}

async fn mount_feed(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/feeds/u1/activities"))
        .and(query_param("sync", "1"))
        .and(query_param("limit", "150"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn sync_writes_store_and_skips_complete_items_next_time() {
    let server = MockServer::start().await;
    mount_feed(
        &server,
        json!({ "entities": [
            { "guid": "1", "entity": { "message": "hi" } },
            { "guid": "2" }
        ] }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/entities/"))
        .and(query_param("urns", "urn:activity:2"))
        .and(query_param("as_activities", "0"))
        .and(query_param("export_user_counts", "false"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "entities": [{ "guid": "2", "message": "world" }] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("out.txt");
    let ctx = AppContext::new(config_for(&server, output.clone())).unwrap();

    let first = commands::sync(&ctx, false).await.unwrap();
    assert_eq!(first.updated, 2);
    assert!(first.empty_urls.is_empty());
    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written, "**MINDSYNC-2**\nworld\n**MINDSYNC-1**\nhi\n");

    let second = commands::sync(&ctx, false).await.unwrap();
    assert_eq!(second.updated, 0);
    assert_eq!(fs::read_to_string(&output).unwrap(), written);

    assert_eq!(commands::list(&ctx).unwrap(), 2);
}

#[tokio::test]
async fn sync_reports_empty_details() {
    let server = MockServer::start().await;
    mount_feed(
        &server,
        json!({ "entities": [
            { "guid": "1", "entity": { "message": "hi" } },
            { "guid": "gone" }
        ] }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/entities/"))
        .and(query_param("urns", "urn:activity:gone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "entities": [] })))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("out.txt");
    let ctx = AppContext::new(config_for(&server, output.clone())).unwrap();

    let report = commands::sync(&ctx, false).await.unwrap();
    assert_eq!(report.updated, 1);
    assert_eq!(report.empty_urls.len(), 1);
    assert!(report.empty_urls[0].contains("urn%3Aactivity%3Agone"));
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "**MINDSYNC-1**\nhi\n"
    );
}

#[tokio::test]
async fn sync_without_changes_leaves_file_alone() {
    let server = MockServer::start().await;
    mount_feed(&server, json!({ "entities": [] })).await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("out.txt");
    let ctx = AppContext::new(config_for(&server, output.clone())).unwrap();

    let report = commands::sync(&ctx, false).await.unwrap();
    assert_eq!(report.updated, 0);
    assert!(!output.exists());
    assert_eq!(commands::list(&ctx).unwrap(), 0);
}

#[tokio::test]
async fn http_fetcher_surfaces_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string("body"))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&RemoteConfig::default()).unwrap();

    let ok = fetcher.fetch(&format!("{}/ok", server.uri())).await.unwrap();
    assert_eq!(ok, b"body");

    let err = fetcher
        .fetch(&format!("{}/broken", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, MindsyncError::Http(_)));
}
