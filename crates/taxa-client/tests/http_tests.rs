use pretty_assertions::assert_eq;
use serde_json::json;
use taxa_client::{ClientConfig, HttpTaxonomyService, ServiceError, TaxonomyService};
use taxa_core::{NewTaxon, NodeId, TaxonomicRank};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> HttpTaxonomyService {
    let config = ClientConfig::new()
        .with_base_url(format!("{}/api/", server.uri()))
        .with_bearer_token("secret");
    HttpTaxonomyService::new(&config).unwrap()
}

#[tokio::test]
async fn list_by_rank_sends_wire_rank() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/taxonomy"))
        .and(query_param("rank", "DOMAIN"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "1", "name": "Eukaryota", "rank": "DOMAIN"},
            {"id": "2", "name": "Bacteria", "rank": "DOMAIN", "parentId": null}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let nodes = client_for(&server)
        .await
        .list_by_rank(TaxonomicRank::Domain)
        .await
        .unwrap();

    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].name, "Eukaryota");
    assert_eq!(nodes[1].parent_id, None);
}

#[tokio::test]
async fn list_by_parent_hits_children_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/taxonomy/rosaceae/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "rosoideae", "name": "Rosoideae", "rank": "SUBFAMILY", "parentId": "rosaceae"}
        ])))
        .mount(&server)
        .await;

    let children = client_for(&server)
        .await
        .list_by_parent(&NodeId::new("rosaceae"))
        .await
        .unwrap();

    assert_eq!(children[0].rank, TaxonomicRank::Subfamily);
    assert_eq!(children[0].parent_id, Some(NodeId::new("rosaceae")));
}

#[tokio::test]
async fn create_posts_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/taxonomy"))
        .and(body_json(json!({"name": "Rosa", "rank": "GENUS", "parentId": "rosinae"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!(
            {"id": "rosa", "name": "Rosa", "rank": "GENUS", "parentId": "rosinae"}
        )))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server)
        .await
        .create(NewTaxon::new("Rosa", TaxonomicRank::Genus, Some(NodeId::new("rosinae"))))
        .await
        .unwrap();

    assert_eq!(created.id, NodeId::new("rosa"));
}

#[tokio::test]
async fn rename_patches_name_only() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/taxonomy/rosa"))
        .and(body_json(json!({"name": "Rosa L."})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": "rosa", "name": "Rosa L.", "rank": "GENUS", "parentId": "rosinae"}
        )))
        .mount(&server)
        .await;

    let renamed = client_for(&server)
        .await
        .rename(&NodeId::new("rosa"), "Rosa L.")
        .await
        .unwrap();

    assert_eq!(renamed.name, "Rosa L.");
}

#[tokio::test]
async fn delete_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/taxonomy/rosa"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .await
        .delete(&NodeId::new("rosa"))
        .await
        .unwrap();
}

#[tokio::test]
async fn missing_node_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/taxonomy/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .get(&NodeId::new("ghost"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound(id) if id.as_str() == "ghost"));
}

#[tokio::test]
async fn node_id_is_one_encoded_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/taxonomy/a/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": "WRONG", "name": "Wrong", "rank": "GENUS"}
        )))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/taxonomy/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": "a/b", "name": "Rosa", "rank": "GENUS"}
        )))
        .expect(1)
        .mount(&server)
        .await;

    let node = client_for(&server)
        .await
        .get(&NodeId::new("a/b"))
        .await
        .unwrap();

    assert_eq!(node.id, NodeId::new("a/b"));
}

#[tokio::test]
async fn reserved_characters_stay_in_children_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/taxonomy/x%3Fy%23z/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let children = client_for(&server)
        .await
        .list_by_parent(&NodeId::new("x?y#z"))
        .await
        .unwrap();

    assert!(children.is_empty());
}

#[tokio::test]
async fn server_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/taxonomy"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .list_by_rank(TaxonomicRank::Domain)
        .await
        .unwrap_err();

    match &err {
        ServiceError::Status { status, body } => {
            assert_eq!(*status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/taxonomy/x/children"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .list_by_parent(&NodeId::new("x"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Decode(_)));
    assert!(!err.is_retryable());
}

#[test]
fn invalid_config_is_rejected() {
    let err = HttpTaxonomyService::new(&ClientConfig::new().with_base_url("localhost")).unwrap_err();
    assert!(matches!(err, ServiceError::Config(_)));
}

#[test]
fn trailing_slash_is_trimmed() {
    let service =
        HttpTaxonomyService::new(&ClientConfig::new().with_base_url("https://x.test/api//")).unwrap();
    assert_eq!(service.base_url(), "https://x.test/api");
}
