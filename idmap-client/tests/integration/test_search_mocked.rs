//! Integration tests for affiliation search using mocked ESearch responses

use std::io::Write;

use idmap_client::{AffiliationSearcher, ClientConfig, IdMapError};
use tempfile::NamedTempFile;
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_config(mock_server: &MockServer) -> ClientConfig {
    ClientConfig::new()
        .with_eutils_base_url(mock_server.uri())
        .with_email("researcher@university.edu")
        .with_api_key("test-key")
        .with_tool("test-client")
}

fn create_mock_searcher(mock_server: &MockServer) -> AffiliationSearcher {
    AffiliationSearcher::with_variants(
        mock_config(mock_server),
        vec![
            "Cincinnati Children's".to_string(),
            "CCHMC".to_string(),
        ],
    )
    .unwrap()
}

fn esearch_body(count: &str, ids: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "header": {"type": "esearch", "version": "0.3"},
        "esearchresult": {
            "count": count,
            "retmax": ids.len().to_string(),
            "retstart": "0",
            "idlist": ids,
            "querytranslation": "CCHMC[Affiliation]"
        }
    })
}

#[tokio::test]
#[traced_test]
async fn test_search_sends_single_request_with_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("db", "pubmed"))
        .and(query_param(
            "term",
            "(\"Cincinnati Children's\"[Affiliation] OR \"CCHMC\"[Affiliation]) AND 2024/01/01:2024/12/31[dp]",
        ))
        .and(query_param("retmax", "100000"))
        .and(query_param("retmode", "json"))
        .and(query_param("email", "researcher@university.edu"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("tool", "test-client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(
            "3",
            &["39000001", "39000002", "39000003"],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let searcher = create_mock_searcher(&mock_server);
    let result = searcher
        .search(Some("2024/01/01"), Some("2024/12/31"))
        .await
        .unwrap();

    assert_eq!(result.pmids, vec!["39000001", "39000002", "39000003"]);
    assert_eq!(result.total_count, 3);
    assert!(!result.is_truncated());
    assert_eq!(result.query_translation.as_deref(), Some("CCHMC[Affiliation]"));
}

#[tokio::test]
#[traced_test]
async fn test_open_ended_and_undated_terms() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param(
            "term",
            "(\"Cincinnati Children's\"[Affiliation] OR \"CCHMC\"[Affiliation]) AND 2023/06/01:3000/12/31[dp]",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body("1", &["1"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(query_param(
            "term",
            "(\"Cincinnati Children's\"[Affiliation] OR \"CCHMC\"[Affiliation])",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body("2", &["1", "2"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let searcher = create_mock_searcher(&mock_server);

    let open_ended = searcher.search(Some("2023/06/01"), None).await.unwrap();
    assert_eq!(open_ended.pmids, vec!["1"]);

    // An end date without a start date adds no clause
    let undated = searcher.search(None, Some("2024/12/31")).await.unwrap();
    assert_eq!(undated.pmids, vec!["1", "2"]);
}

#[tokio::test]
#[traced_test]
async fn test_truncated_result_is_kept_with_warning() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(esearch_body("250000", &["10", "11"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let searcher = create_mock_searcher(&mock_server);
    let result = searcher.search(None, None).await.unwrap();

    assert!(result.is_truncated());
    assert_eq!(result.total_count, 250_000);
    assert_eq!(result.pmids.len(), 2);
    assert!(logs_contain("Search matched more papers than a single request returns"));
}

#[tokio::test]
#[traced_test]
async fn test_zero_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body("0", &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let searcher = create_mock_searcher(&mock_server);
    let result = searcher.search(Some("1800/01/01"), Some("1800/12/31")).await.unwrap();

    assert!(result.is_empty());
    assert_eq!(result.total_count, 0);
}

#[tokio::test]
#[traced_test]
async fn test_esearch_error_field_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "esearchresult": {"ERROR": "Invalid query syntax"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let searcher = create_mock_searcher(&mock_server);
    let err = searcher.search(None, None).await.unwrap_err();

    match err {
        IdMapError::ApiError { status, message } => {
            assert_eq!(status, 200);
            assert!(message.contains("Invalid query syntax"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
#[traced_test]
async fn test_http_error_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let searcher = create_mock_searcher(&mock_server);
    let err = searcher.search(None, None).await.unwrap_err();

    assert!(matches!(err, IdMapError::ApiError { status: 500, .. }));
    assert!(!err.is_configuration_error());
}

#[tokio::test]
#[traced_test]
async fn test_unparsable_body_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<eSearchResult/>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let searcher = create_mock_searcher(&mock_server);
    let err = searcher.search(None, None).await.unwrap_err();

    assert!(matches!(err, IdMapError::JsonError(_)));
}

#[tokio::test]
#[traced_test]
async fn test_empty_esearchresult_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "esearchresult": {}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let searcher = create_mock_searcher(&mock_server);
    let err = searcher.search(None, None).await.unwrap_err();

    match err {
        IdMapError::ApiError { status, message } => {
            assert_eq!(status, 200);
            assert!(message.contains("missing"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
#[traced_test]
async fn test_count_without_idlist_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "esearchresult": {"count": "5"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let searcher = create_mock_searcher(&mock_server);
    let err = searcher.search(Some("2024/01/01"), None).await.unwrap_err();

    assert!(matches!(err, IdMapError::ApiError { status: 200, .. }));
    assert!(!err.is_configuration_error());
}

#[tokio::test]
#[traced_test]
async fn test_idlist_without_count_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "esearchresult": {"idlist": ["1", "2"]}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let searcher = create_mock_searcher(&mock_server);
    assert!(searcher.search(None, None).await.is_err());
}

#[tokio::test]
#[traced_test]
async fn test_variants_file_drives_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param(
            "term",
            "(\"Example Hospital\"[Affiliation] OR \"Example Research Foundation\"[Affiliation])",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body("1", &["42"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"variations": ["Example Hospital", "  ", "Example Research Foundation"]}}"#
    )
    .unwrap();

    let searcher =
        AffiliationSearcher::from_variants_file(mock_config(&mock_server), file.path()).unwrap();
    assert_eq!(searcher.variants().len(), 2);

    let result = searcher.search(None, None).await.unwrap();
    assert_eq!(result.pmids, vec!["42"]);
}

#[tokio::test]
async fn test_missing_credentials_make_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new()
        .with_eutils_base_url(mock_server.uri())
        .with_email("researcher@university.edu");
    let err = AffiliationSearcher::with_variants(config, vec!["CCHMC".to_string()]).unwrap_err();

    assert!(err.is_configuration_error());
    assert!(err.to_string().contains("NCBI_API_KEY"));
}
