//! Integration tests for seed construction against a mock catalog

use site_mirror::crawler::build_http_client;
use site_mirror::seed::{SeedRules, SeedSet};
use site_mirror::MirrorError;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn rules() -> SeedRules {
    SeedRules {
        start_paths: vec!["/".to_string()],
        blacklist_paths: vec!["/search".to_string()],
        blocked_formats: vec!["place".to_string(), "local_transaction".to_string()],
        allow_paths: vec!["/bank-holidays".to_string()],
    }
}

fn catalog_body(results: &str) -> String {
    format!(
        r#"{{"_response_info":{{"status":"ok"}},"results":[{}]}}"#,
        results
    )
}

async fn discover(server: &MockServer, rules: &SeedRules) -> Result<SeedSet, MirrorError> {
    let client = build_http_client().expect("client");
    let site_root = Url::parse(&server.uri()).expect("site root");
    SeedSet::discover(&client, &site_root, rules).await
}

fn start_url_strings(seeds: &SeedSet) -> Vec<String> {
    seeds.start_urls.iter().map(|u| u.to_string()).collect()
}

#[tokio::test]
async fn test_catalog_entries_partitioned_by_format() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/artefacts.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog_body(
            r#"{"format":"answer","web_url":"https://www.test.example/foo"},
               {"format":"local_transaction","web_url":"https://www.test.example/bar/baz"},
               {"format":"place","web_url":"https://www.test.example/somewhere"},
               {"format":"guide","web_url":"https://www.test.example/vat"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let seeds = discover(&server, &rules()).await.expect("seed set");
    let starts = start_url_strings(&seeds);

    assert!(starts.contains(&"https://www.test.example/foo".to_string()));
    assert!(starts.contains(&"https://www.test.example/vat".to_string()));
    assert!(!starts.contains(&"https://www.test.example/bar/baz".to_string()));
    assert!(!starts.contains(&"https://www.test.example/somewhere".to_string()));

    assert!(seeds.blacklist_prefixes.contains(&"/bar/baz".to_string()));
    assert!(seeds.blacklist_prefixes.contains(&"/somewhere".to_string()));
    assert!(seeds.blacklist_prefixes.contains(&"/search".to_string()));
}

#[tokio::test]
async fn test_catalog_pagination_follows_next_link() {
    let server = MockServer::start().await;
    let api = format!("{}/api/artefacts.json", server.uri());

    // The page-2 mock is mounted first so it wins for the paged request
    Mock::given(method("GET"))
        .and(path("/api/artefacts.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog_body(
            r#"{"format":"answer","web_url":"https://www.test.example/foo2"},
               {"format":"local_transaction","web_url":"https://www.test.example/bar/baz2"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/artefacts.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(catalog_body(
                    r#"{"format":"guide","web_url":"https://www.test.example/vat"}"#,
                ))
                .insert_header("link", format!("<{}?page=2>; rel=\"next\"", api).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let seeds = discover(&server, &rules()).await.expect("seed set");
    let starts = start_url_strings(&seeds);

    assert!(starts.contains(&"https://www.test.example/vat".to_string()));
    assert!(starts.contains(&"https://www.test.example/foo2".to_string()));
    assert!(seeds.blacklist_prefixes.contains(&"/bar/baz2".to_string()));
}

#[tokio::test]
async fn test_catalog_fetch_retries_once_on_transient_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/artefacts.json"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/artefacts.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog_body(
            r#"{"format":"guide","web_url":"https://www.test.example/vat"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let seeds = discover(&server, &rules()).await.expect("seed set");
    assert!(start_url_strings(&seeds).contains(&"https://www.test.example/vat".to_string()));
}

#[tokio::test]
async fn test_catalog_fetch_retries_only_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/artefacts.json"))
        .respond_with(ResponseTemplate::new(502))
        .expect(2)
        .mount(&server)
        .await;

    let result = discover(&server, &rules()).await;
    assert!(matches!(result, Err(MirrorError::Fetch(_))));
}

#[tokio::test]
async fn test_undecodable_catalog_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/artefacts.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let result = discover(&server, &rules()).await;
    assert!(matches!(result, Err(MirrorError::CatalogDecode { .. })));
}
