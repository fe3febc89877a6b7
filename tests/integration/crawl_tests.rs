//! End-to-end crawl tests against a mock search endpoint

use deepsift::config::{Config, EndpointConfig};
use deepsift::crawler::{crawl, Coordinator, Fetcher, ProxyFetcher};
use deepsift::output::write_results;
use deepsift::{QueryBuilder, SiftError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a configuration pointing at the mock server, without a proxy
fn create_test_config(server: &MockServer) -> Config {
    let address = server.address();

    let mut config = Config::default();
    config.endpoint = EndpointConfig {
        host: address.ip().to_string(),
        port: address.port(),
        scheme: "http".to_string(),
        proxy: String::new(),
        timeout_secs: 5,
        connect_timeout_secs: 5,
    };
    config.crawler.dispatch_delay_ms = 0;
    config
}

/// Renders a result page with literal `/results/<n>` pagination links
fn results_page(total: u64, current: u32, last: u32, hosts: &[&str]) -> String {
    let mut html = format!(
        r#"<html><body><div class="search-info">Found <strong>{}</strong> hosts</div>"#,
        total
    );

    for host in hosts {
        html.push_str(&format!(
            r#"<div class="search-result">
                <a class="result-url" href="http://{0}/">{0}</a>
                <h4 class="result-title">{0} index</h4>
                <p class="result-snippet">HTTP/1.1 200 OK</p>
            </div>"#,
            host
        ));
    }

    html.push_str(r#"<ul class="pagination">"#);
    for page in 1..=last {
        if page == current {
            html.push_str(&format!(r#"<li class="active"><span>{}</span></li>"#, page));
        } else {
            html.push_str(&format!(
                r#"<li><a href="/results/{0}">{0}</a></li>"#,
                page
            ));
        }
    }
    if current == last {
        html.push_str(r#"<li class="disabled"><span>Next</span></li>"#);
    } else {
        html.push_str(&format!(
            r#"<li><a href="/results/{}">Next</a></li>"#,
            current + 1
        ));
    }
    html.push_str("</ul></body></html>");
    html
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_search_term_single_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "darknet market"))
        .respond_with(html_response(results_page(
            2,
            1,
            1,
            &["alpha.onion", "beta.onion"],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let report = crawl(&config, "darknet market").await.expect("Crawl failed");

    assert_eq!(report.expected_total, Some(2));
    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.entries[0].url, "http://alpha.onion/");
    assert_eq!(report.entries[0].title, "alpha.onion index");
    assert!(report.complete);
}

#[tokio::test]
async fn test_full_crawl_follows_pagination_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/results/1"))
        .respond_with(html_response(results_page(
            5,
            1,
            3,
            &["a.onion", "b.onion", "c.onion"],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/results/2"))
        .respond_with(html_response(results_page(5, 2, 3, &["d.onion"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/results/3"))
        .respond_with(html_response(results_page(5, 3, 3, &["e.onion"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let coordinator = Coordinator::from_config(&config).expect("Failed to create coordinator");
    let report = coordinator.run("/results/1").await.expect("Crawl failed");

    assert_eq!(report.entries.len(), 5);
    assert_eq!(report.pages_fetched, 3);
    assert_eq!(report.pages_admitted, 3);
    assert!(report.complete);

    let mut hosts: Vec<_> = report.entries.iter().map(|e| e.url.as_str()).collect();
    hosts.sort();
    assert_eq!(
        hosts,
        vec![
            "http://a.onion/",
            "http://b.onion/",
            "http://c.onion/",
            "http://d.onion/",
            "http://e.onion/"
        ]
    );
}

#[tokio::test]
async fn test_no_results_first_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html_response(
            r#"<html><body><div class="no-results">Nothing found there</div></body></html>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let err = crawl(&config, "qwertyuiop").await.unwrap_err();

    assert!(matches!(err, SiftError::NoResults { .. }));
}

#[tokio::test]
async fn test_http_error_is_transport_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let fetcher = ProxyFetcher::new(&config.endpoint).expect("Failed to build fetcher");
    let request = QueryBuilder::default().build("nginx");

    let err = fetcher.fetch(&request).await.unwrap_err();
    assert!(matches!(err, SiftError::Transport { ref message, .. } if message == "HTTP 503"));
}

#[tokio::test]
async fn test_empty_body_is_parse_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let err = crawl(&config, "nginx").await.unwrap_err();

    assert!(matches!(err, SiftError::Parse { .. }));
}

#[tokio::test]
async fn test_crawl_then_save() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html_response(results_page(1, 1, 1, &["saved.onion"])))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let report = crawl(&config, "saved").await.expect("Crawl failed");

    let dir = tempfile::TempDir::new().unwrap();
    let output = dir.path().join("hosts.txt");
    write_results(&output, &report.entries).expect("Failed to write results");

    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        content,
        "URL: http://saved.onion/\nTitle: saved.onion index\nSnippet: HTTP/1.1 200 OK\n"
    );

    // A second save must not overwrite the first
    let err = write_results(&output, &report.entries).unwrap_err();
    assert!(matches!(err, SiftError::OutputPath(_)));
}
