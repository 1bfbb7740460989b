use directmap::deployment::OrchestratorClient;
use directmap::sparql::GraphStoreClient;
use directmap::{MappingOptions, Subject, Term, Triple};
use std::time::Duration;

// Nothing listens on the discard port, so every request fails at the
// transport layer. This pins down that transport failures surface as
// errors instead of panics, for both clients.
const UNREACHABLE: &str = "http://127.0.0.1:9/ds";

#[tokio::test]
async fn test_graph_store_requests_fail_against_closed_port() {
    let client = GraphStoreClient::with_timeout(UNREACHABLE, Duration::from_millis(200))
        .unwrap()
        .with_basic_auth("admin", "admin");
    assert!(client.get(None, "application/n-triples").await.is_err());
    assert!(client.update("CLEAR GRAPH <http://ex/g>").await.is_err());
    assert!(client.clear_graph("http://ex/g", true).await.is_err());
}

#[tokio::test]
async fn test_insert_data_fails_before_sending_on_a_broken_stream() {
    let client = GraphStoreClient::new(UNREACHABLE).unwrap();
    let triples = directmap::parse_json(&b"{\"a\": "[..], MappingOptions::default());
    // The stream is truncated, so the builder bails out before the request.
    assert!(client.insert_data(triples, None).await.is_err());
}

#[tokio::test]
async fn test_insert_data_reaches_the_endpoint_on_a_good_stream() {
    let client = GraphStoreClient::new(UNREACHABLE).unwrap();
    let triples = vec![Ok(Triple::new(
        Subject::Named("http://ex/s".to_string()),
        "http://ex/p",
        Term::Node(Subject::Named("http://ex/o".to_string())),
    ))];
    // The stream is fine, so the failure is the connection itself.
    let error = client.insert_data(triples, None).await.unwrap_err();
    assert!(matches!(error, directmap::Error::Http(_)));
}

#[tokio::test]
async fn test_orchestrator_read_fails_against_closed_port() {
    let client = OrchestratorClient::new("http://127.0.0.1:9").unwrap();
    assert!(client.read_deployment("etl/parent").await.is_err());
    assert!(client.read_parameter("etl/parent", "sub_deployments").await.is_err());
}
