//! Integration tests for the harvest pool
//!
//! These tests use wiremock to serve score pages and run the full
//! fetch-extract-store cycle end-to-end.

use esg_harvest::config::{Config, HarvesterConfig, InputConfig, OutputConfig, UserAgentConfig};
use esg_harvest::harvest::{
    run_harvest, HttpFetcher, Pool, PoolOptions, SpGlobalExtractor, WorkItem,
};
use esg_harvest::universe::{CountryTable, Universe};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a score page for one company
fn score_page(name: &str, country: &str, env: u32) -> String {
    format!(
        r#"<html><body>
        <div id="company-data"
             data-long-name="{name}"
             data-company-ticker="NYSE {name}"
             data-industry="Testing"
             data-country="{country}"
             data-yoy-score="50"
             data-availabilitylevel="High"></div>
        <div id="dimentions-score-env" data-score="{env}" data-avg="20" data-max="90"></div>
        <div id="dimentions-score-social" data-score="41" data-avg="21" data-max="91"></div>
        <div id="dimentions-score-govecon" data-score="42" data-avg="22" data-max="92"></div>
        </body></html>"#
    )
}

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestHarvester".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

fn countries() -> CountryTable {
    [
        ("Wonderland".to_string(), "WND".to_string()),
        ("Oz".to_string(), "OZZ".to_string()),
    ]
    .into_iter()
    .collect()
}

fn base_url(server: &MockServer) -> String {
    format!("{}/esg/scores/results?cid=", server.uri())
}

fn items(server: &MockServer, ids: &[&str]) -> Vec<WorkItem> {
    Universe::new(ids.iter().map(|id| id.to_string()).collect()).work_items(&base_url(server))
}

fn http_pool(workers: usize, threads: usize) -> Pool {
    let fetcher = HttpFetcher::from_config(&user_agent(), Duration::from_secs(5))
        .expect("Failed to build HTTP client");
    Pool::new(
        Arc::new(fetcher),
        Arc::new(SpGlobalExtractor::new()),
        Arc::new(countries()),
        PoolOptions::new(workers, threads).expect("Invalid pool options"),
    )
}

/// Mounts a score page for `id`
async fn mount_page(server: &MockServer, id: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/esg/scores/results"))
        .and(query_param("cid", id))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_item_resolves_country() {
    let server = MockServer::start().await;
    mount_page(&server, "A", score_page("Alpha", "Wonderland", 40)).await;

    let records = http_pool(2, 2)
        .run(items(&server, &["A"]))
        .await
        .expect("Run failed");

    assert_eq!(records.len(), 1);
    let record = &records["A"];
    assert_eq!(record.id(), "A");
    assert_eq!(record.field("country"), Some("Wonderland"));
    assert_eq!(record.country_iso3(), Some("WND"));
    assert_eq!(record.field("name"), Some("Alpha"));
    assert_eq!(record.field("score_env"), Some("40"));
    assert_eq!(record.field("score_env_ind_average"), Some("20"));
    assert_eq!(record.field("score_env_ind_max"), Some("90"));
    assert_eq!(record.url(), format!("{}A", base_url(&server)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fetch_failure_yields_empty_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let records = http_pool(2, 2)
        .run(items(&server, &["B"]))
        .await
        .expect("Run should not fail on item errors");

    assert!(records.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_duplicate_identifier_stored_once() {
    let server = MockServer::start().await;
    mount_page(&server, "C", score_page("Gamma", "Oz", 10)).await;

    let records = http_pool(2, 4)
        .run(items(&server, &["C", "C", "C", "C"]))
        .await
        .expect("Run failed");

    assert_eq!(records.len(), 1);
    assert_eq!(records["C"].country_iso3(), Some("OZZ"));
}

#[tokio::test]
async fn test_sequential_duplicate_is_not_refetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("cid", "C"))
        .respond_with(ResponseTemplate::new(200).set_body_string(score_page("Gamma", "Oz", 10)))
        .expect(1)
        .mount(&server)
        .await;

    let report = http_pool(1, 1)
        .run_with_stats(items(&server, &["C", "C"]))
        .await
        .expect("Run failed");

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.stats.duplicates_skipped, 1);
    assert_eq!(report.stats.races_lost, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failures_are_isolated() {
    let server = MockServer::start().await;
    mount_page(&server, "OK1", score_page("One", "Wonderland", 1)).await;
    mount_page(&server, "OK2", score_page("Two", "Oz", 2)).await;
    mount_page(&server, "BROKEN", "<html><body>maintenance</body></html>".to_string()).await;
    Mock::given(method("GET"))
        .and(query_param("cid", "GONE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let report = http_pool(2, 2)
        .run_with_stats(items(&server, &["GONE", "OK1", "BROKEN", "OK2"]))
        .await
        .expect("Run failed");

    let mut keys: Vec<_> = report.records.keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, vec!["OK1", "OK2"]);
    assert_eq!(report.stats.fetch_failures, 1);
    assert_eq!(report.stats.extract_failures, 1);
    assert_eq!(report.stats.stored, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_does_not_change_outcome() {
    let server = MockServer::start().await;
    let ids: Vec<String> = (0..40).map(|i| format!("T{}", i)).collect();
    for (i, id) in ids.iter().enumerate() {
        let country = if i % 2 == 0 { "Wonderland" } else { "Nowhere" };
        mount_page(&server, id, score_page(id, country, i as u32)).await;
    }

    // Every identifier twice, plus one that always fails
    let mut seeds: Vec<&str> = ids.iter().map(String::as_str).collect();
    seeds.extend(ids.iter().map(String::as_str));
    seeds.push("MISSING");

    let sequential = http_pool(1, 1)
        .run(items(&server, &seeds))
        .await
        .expect("Sequential run failed");
    let parallel = http_pool(4, 4)
        .run(items(&server, &seeds))
        .await
        .expect("Parallel run failed");

    assert_eq!(sequential.len(), 40);
    assert_eq!(sequential, parallel);
    assert_eq!(parallel["T3"].country_iso3(), None);
    assert_eq!(parallel["T4"].country_iso3(), Some("WND"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_run_harvest_from_config() {
    let server = MockServer::start().await;
    mount_page(&server, "A", score_page("Alpha", "Wonderland", 40)).await;
    mount_page(&server, "B", score_page("Beta", "Oz", 41)).await;

    let config = Config {
        harvester: HarvesterConfig {
            base_url: base_url(&server),
            threads_per_worker: 2,
            workers: Some(2),
            request_timeout_secs: 5,
        },
        user_agent: user_agent(),
        input: InputConfig {
            tickers_path: "unused".to_string(),
            countries_path: "unused".to_string(),
        },
        output: OutputConfig {
            results_path: "unused".to_string(),
        },
    };
    let universe = Universe::new(vec!["A".into(), "B".into(), "A".into()]);

    let report = run_harvest(&config, &universe, countries())
        .await
        .expect("Harvest failed");

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.stats.queued, 3);
    assert_eq!(report.stats.workers, 2);
    assert_eq!(report.stats.threads_per_worker, 2);
    assert_eq!(report.records["B"].field("ticker"), Some("Beta"));
}
