use echodeck::documents::{DocumentSource, DocumentsError, JsonPlaceholderSource};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn posts(count: u32) -> serde_json::Value {
    let items: Vec<_> = (1..=count)
        .map(|id| {
            json!({
                "userId": 1,
                "id": id,
                "title": format!("post number {id} title"),
                "body": format!("body of post {id}"),
            })
        })
        .collect();
    json!(items)
}

// ============================================================================
// JsonPlaceholderSource Tests
// ============================================================================

#[tokio::test]
async fn test_lists_first_posts_as_documents() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts(25)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = JsonPlaceholderSource::new(mock_server.uri(), 10);
    let documents = source.list_documents().await.unwrap();

    assert_eq!(documents.len(), 10);
    assert_eq!(documents[0].file_name, "post_number_1.pdf");
    assert_eq!(documents[0].version, "v1.1");
    assert_eq!(documents[9].version, "v1.0");
    assert_eq!(documents[3].description, "body of post 4");
    for doc in &documents {
        assert!(doc.size.ends_with(" KB"));
        assert!(doc.upload_date.ends_with(".2024"));
    }
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts(2)))
        .mount(&mock_server)
        .await;

    let source = JsonPlaceholderSource::new(format!("{}/", mock_server.uri()), 10);
    assert_eq!(source.list_documents().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_http_error_is_api_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let source = JsonPlaceholderSource::new(mock_server.uri(), 10);
    match source.list_documents().await {
        Err(DocumentsError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let source = JsonPlaceholderSource::new(mock_server.uri(), 10);
    assert!(matches!(
        source.list_documents().await,
        Err(DocumentsError::Parse(_))
    ));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Nothing listens on a port we bound and released
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = JsonPlaceholderSource::new(format!("http://{addr}"), 10);
    assert!(matches!(
        source.list_documents().await,
        Err(DocumentsError::Network(_))
    ));
}
