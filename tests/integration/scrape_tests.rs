//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to create mock HTTP servers and run the real
//! fetcher through the scheduler end-to-end.

use std::collections::HashSet;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use url_meta_scraper::config::Config;
use url_meta_scraper::pipeline::{run_to_csv, urls_from_list, Fetcher, Scraper};
use url_meta_scraper::{ResultRecord, ScrapeError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a fetcher with a short backoff so retry tests stay fast
fn test_fetcher(timeout: &str, retries: u32) -> Fetcher {
    Fetcher::new(timeout, retries)
        .expect("Failed to build fetcher")
        .with_backoff_unit(Duration::from_millis(10))
}

fn html_page(title: &str, description: &str) -> String {
    format!(
        r#"<html><head><title>{}</title><meta name="description" content="{}"></head><body></body></html>"#,
        title, description
    )
}

async fn mount_page(server: &MockServer, page_path: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Serves one raw HTTP response per connection and returns the base URL
///
/// wiremock only accepts status codes it knows by name, so codes such as
/// 299 are written by hand.
async fn serve_raw(status: u16, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let response = format!(
                "HTTP/1.1 {} Custom\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}", addr)
}

async fn scrape_all(scraper: &Scraper, urls: Vec<String>) -> Vec<ResultRecord> {
    let mut rx = scraper.scrape(urls_from_list(urls));
    let mut records = Vec::new();
    while let Some(record) = rx.recv().await {
        records.push(record);
    }
    records
}

#[tokio::test]
async fn test_every_page_emitted_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let mut urls = Vec::new();
    for i in 0..12 {
        let page_path = format!("/page{}", i);
        mount_page(
            &mock_server,
            &page_path,
            200,
            html_page(&format!("Page {}", i), "Listing"),
        )
        .await;
        urls.push(format!("{}{}", base_url, page_path));
    }

    let scraper = Scraper::with_source(test_fetcher("5s", 3), 3).expect("Failed to build scraper");
    let records = scrape_all(&scraper, urls.clone()).await;

    assert_eq!(records.len(), urls.len());
    let seen: HashSet<String> = records.iter().map(|r| r.url.clone()).collect();
    assert_eq!(seen, urls.iter().cloned().collect::<HashSet<_>>());

    for record in &records {
        let index = record.url.rsplit("page").next().unwrap();
        assert_eq!(record.title, format!("Page {}", index));
        assert_eq!(record.description, "Listing");
        assert_eq!(record.status_code, 200);
    }
}

#[tokio::test]
async fn test_always_failing_url_is_dropped_after_three_attempts() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ok", 200, html_page("Fine", "Works")).await;

    let scraper = Scraper::with_source(test_fetcher("5s", 3), 2).expect("Failed to build scraper");
    let records = scrape_all(
        &scraper,
        vec![format!("{}/broken", base_url), format!("{}/ok", base_url)],
    )
    .await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, format!("{}/ok", base_url));
    assert_eq!(records[0].title, "Fine");

    // Wiremock verifies expect(3) when the mock server drops
}

#[tokio::test]
async fn test_success_after_one_failure() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("Recovered", "")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let scraper = Scraper::with_source(test_fetcher("5s", 3), 1).expect("Failed to build scraper");
    let records = scrape_all(&scraper, vec![format!("{}/flaky", base_url)]).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Recovered");
    assert_eq!(records[0].description, "");

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_status_299_is_success() {
    let base_url = serve_raw(299, html_page("Edge", "Boundary")).await;

    let scraper = Scraper::with_source(test_fetcher("5s", 3), 1).expect("Failed to build scraper");
    let records = scrape_all(&scraper, vec![format!("{}/edge", base_url)]).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status_code, 299);
    assert_eq!(records[0].to_row()[2], "299");
    assert_eq!(records[0].title, "Edge");
    assert_eq!(records[0].description, "Boundary");
}

#[tokio::test]
async fn test_status_300_is_retried_then_dropped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/choices"))
        .respond_with(ResponseTemplate::new(300).set_body_string(html_page("Choices", "")))
        .expect(3)
        .mount(&mock_server)
        .await;

    let scraper = Scraper::with_source(test_fetcher("5s", 3), 1).expect("Failed to build scraper");
    let records = scrape_all(&scraper, vec![format!("{}/choices", base_url)]).await;

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_not_found_is_retried() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher("5s", 2);
    let result = fetcher.fetch(&format!("{}/gone", base_url)).await;

    assert!(matches!(
        result,
        Err(ScrapeError::FetchExhausted { attempts: 2, .. })
    ));
}

#[tokio::test]
async fn test_backoff_waits_between_attempts() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new("5s", 3)
        .expect("Failed to build fetcher")
        .with_backoff_unit(Duration::from_millis(200));

    let started = Instant::now();
    let result = fetcher.fetch(&format!("{}/down", base_url)).await;
    let elapsed = started.elapsed();

    assert!(matches!(
        result,
        Err(ScrapeError::FetchExhausted { attempts: 3, .. })
    ));
    // One unit after the first failure, two after the second, none after the last
    assert!(
        elapsed >= Duration::from_millis(600),
        "retries finished after {:?}",
        elapsed
    );
    assert!(
        elapsed < Duration::from_millis(1200),
        "slept after the last attempt: {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("Slow", ""))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let scraper =
        Scraper::with_source(test_fetcher("100ms", 2), 1).expect("Failed to build scraper");
    let records = scrape_all(&scraper, vec![format!("{}/slow", base_url)]).await;

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_unreachable_host_does_not_block_others() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_page(&mock_server, "/ok", 200, html_page("Up", "")).await;

    let scraper = Scraper::with_source(test_fetcher("1s", 2), 2).expect("Failed to build scraper");
    let records = scrape_all(
        &scraper,
        vec![
            "http://127.0.0.1:1/nothing-here".to_string(),
            format!("{}/ok", base_url),
        ],
    )
    .await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Up");
}

#[tokio::test]
async fn test_page_without_head_gives_empty_fields() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_page(
        &mock_server,
        "/bare",
        200,
        "<p>just a paragraph</p>".to_string(),
    )
    .await;

    let scraper = Scraper::with_source(test_fetcher("5s", 1), 1).expect("Failed to build scraper");
    let records = scrape_all(&scraper, vec![format!("{}/bare", base_url)]).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "");
    assert_eq!(records[0].description, "");
}

#[tokio::test]
async fn test_empty_input_dispatches_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let scraper = Scraper::with_source(test_fetcher("5s", 3), 4).expect("Failed to build scraper");
    let (tx, urls) = mpsc::channel::<String>(1);
    drop(tx);

    let mut rx = scraper.scrape(urls);
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_run_to_csv_end_to_end() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/shop",
        200,
        html_page("Fish, Chips & More", "Fresh daily"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let csv_path = dir.path().join("result.csv");

    let mut config = Config::default();
    config.scraper.timeout = "5s".to_string();
    config.scraper.retry_count = 2;
    config.scraper.backoff_unit = "10ms".to_string();
    config.scraper.max_parallel = 2;
    config.output.csv_path = csv_path.display().to_string();

    let urls = vec![format!("{}/shop", base_url), format!("{}/down", base_url)];
    let summary = run_to_csv(&config, urls_from_list(urls))
        .await
        .expect("Scrape failed");

    assert_eq!(summary.dispatched, 2);
    assert_eq!(summary.written, 1);
    assert_eq!(summary.dropped(), 1);

    let content = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1);

    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    assert_eq!(
        lines[0],
        format!(
            "{},{}/shop,200,\"Fish, Chips & More\",Fresh daily",
            today, base_url
        )
    );
}
