// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use auxs::config::{HttpConfig, RankConfig};
use auxs::http_client::HttpClient;
use auxs::pipeline::{CollectSink, LineSource, Pipeline};
use auxs::rank::{Rank, RankClient};
use auxs::retry::RetryConfig;
use auxs::transforms::ranking::rank_sort_sink;
use auxs::transforms::{RankLine, RankSort};
use std::time::Duration;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn popularity(rank: u64) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><ALEXA VER="0.9"><SD><POPULARITY URL="x/" TEXT="{}" SOURCE="panel"/></SD></ALEXA>"#,
        rank
    )
}

const UNRANKED: &str = r#"<?xml version="1.0" encoding="UTF-8"?><ALEXA VER="0.9"></ALEXA>"#;

fn client(server: &MockServer) -> RankClient {
    let http = HttpClient::new(&HttpConfig::default()).unwrap();
    let config = RankConfig {
        endpoint: format!("{}/data?cli=10&url=", server.uri()),
    };
    RankClient::new(http, &config).with_retry(RetryConfig::fixed(2, Duration::from_millis(5)))
}

async fn mount_rank(server: &MockServer, domain: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/data"))
        .and(query_param("url", domain))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_rank_and_unranked() {
    let server = MockServer::start().await;
    mount_rank(&server, "example.com", popularity(42)).await;
    mount_rank(&server, "nobody.example", UNRANKED.to_string()).await;

    let ranks = client(&server);
    assert_eq!(ranks.rank("example.com").await.unwrap(), Rank::Ranked(42));
    assert_eq!(ranks.rank("nobody.example").await.unwrap(), Rank::Unranked);
}

#[tokio::test]
async fn test_transport_failure_is_error_not_unranked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let err = client(&server).rank("example.com").await.unwrap_err();
    assert_eq!(err.status_code(), Some(503));
}

#[tokio::test]
async fn test_ranks_are_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string(popularity(7)))
        .expect(1)
        .mount(&server)
        .await;

    let ranks = client(&server);
    for _ in 0..3 {
        assert_eq!(ranks.rank("Example.com").await.unwrap(), Rank::Ranked(7));
    }
}

#[tokio::test]
async fn test_rank_line_skips_failed_lookups() {
    let server = MockServer::start().await;
    mount_rank(&server, "example.com", popularity(42)).await;
    mount_rank(&server, "nobody.example", UNRANKED.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .and(query_param("url", "broken.example"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let pipeline = Pipeline::with_concurrency(1, RankLine::new(client(&server)));
    let outcome = pipeline
        .run(
            LineSource::lines(["example.com", "broken.example", "nobody.example"]),
            CollectSink::new(),
        )
        .await
        .unwrap();

    assert_eq!(
        outcome.sink.into_items(),
        vec!["example.com,42", "nobody.example,-1"]
    );
    assert_eq!(outcome.report.failed, 1);
}

#[tokio::test]
async fn test_rank_sort_orders_by_rank() {
    let server = MockServer::start().await;
    mount_rank(&server, "example.com", popularity(500)).await;
    mount_rank(&server, "example.com:8443", popularity(700)).await;
    mount_rank(&server, "example.org", popularity(3)).await;
    mount_rank(&server, "nobody.example", UNRANKED.to_string()).await;

    let pipeline = Pipeline::with_concurrency(4, RankSort::new(client(&server)));
    let outcome = pipeline
        .run(
            LineSource::lines([
                "example.com",
                "https://example.com:8443/login",
                "example.org",
                "nobody.example",
            ]),
            rank_sort_sink(Vec::new(), true),
        )
        .await
        .unwrap();

    let out = String::from_utf8(outcome.sink.into_inner()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "nobody.example,-1",
            "example.org,3",
            "example.com,500",
            "example.com:8443,700",
        ]
    );
}
