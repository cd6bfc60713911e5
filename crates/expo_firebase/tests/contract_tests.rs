// Contract tests for the Firebase REST clients against a mock server.

use expo_common::services::{AuthProvider, DocumentStore, ObjectStorage};
use expo_common::ExpoError;
use expo_config::FirebaseConfig;
use expo_firebase::FirebaseServices;
use serde_json::{json, Map, Value};
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCS: &str = "/projects/expo-test/databases/(default)/documents";

fn services(server: &MockServer) -> FirebaseServices {
    FirebaseServices::new(FirebaseConfig {
        project_id: "expo-test".to_string(),
        api_key: "web-key".to_string(),
        key_path: None,
        storage_bucket: "expo-test.appspot.com".to_string(),
        empresa_id: "expo".to_string(),
        firestore_url: Some(server.uri()),
        auth_url: Some(server.uri()),
        storage_url: Some(server.uri()),
    })
    .expect("config is valid")
}

fn fields(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

#[tokio::test]
async fn get_decodes_typed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/empresas/expo/contactos/c1", DOCS)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/expo-test/databases/(default)/documents/empresas/expo/contactos/c1",
            "fields": {
                "nombre": {"stringValue": "Ana"},
                "esAcompanante": {"booleanValue": true},
                "historial": {"arrayValue": {"values": [{"stringValue": "alta"}]}}
            }
        })))
        .mount(&server)
        .await;

    let doc = services(&server)
        .firestore
        .get("empresas/expo/contactos", "c1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.id, "c1");
    assert_eq!(
        Value::Object(doc.data),
        json!({"nombre": "Ana", "esAcompanante": true, "historial": ["alta"]})
    );
}

#[tokio::test]
async fn get_of_missing_document_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "Document not found", "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let doc = services(&server)
        .firestore
        .get("empresas/expo/contactos", "nope")
        .await
        .unwrap();
    assert!(doc.is_none());
}

#[tokio::test]
async fn query_posts_an_equality_filter_to_the_parent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}/empresas/expo:runQuery", DOCS)))
        .and(body_json(json!({
            "structuredQuery": {
                "from": [{"collectionId": "citas"}],
                "where": {"fieldFilter": {
                    "field": {"fieldPath": "receptor.id"},
                    "op": "EQUAL",
                    "value": {"stringValue": "e1"}
                }}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"document": {
                "name": "projects/expo-test/databases/(default)/documents/empresas/expo/citas/k9",
                "fields": {"hora": {"stringValue": "10:30"}}
            }, "readTime": "2025-10-01T00:00:00Z"},
            {"readTime": "2025-10-01T00:00:00Z"}
        ])))
        .mount(&server)
        .await;

    let docs = services(&server)
        .firestore
        .query_eq("empresas/expo/citas", "receptor.id", &json!("e1"))
        .await
        .unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, "k9");
    assert_eq!(docs[0].data["hora"], "10:30");
}

#[tokio::test]
async fn update_sends_an_update_mask() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("{}/empresas/expo/citas/k9", DOCS)))
        .and(query_param("updateMask.fieldPaths", "estatus"))
        .and(query_param("currentDocument.exists", "true"))
        .and(body_json(json!({"fields": {"estatus": {"stringValue": "confirmada"}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/expo-test/databases/(default)/documents/empresas/expo/citas/k9"
        })))
        .expect(1)
        .mount(&server)
        .await;

    services(&server)
        .firestore
        .update(
            "empresas/expo/citas",
            "k9",
            fields(json!({"estatus": "confirmada"})),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn add_returns_the_generated_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}/empresas/expo/solicitudes", DOCS)))
        .and(body_partial_json(json!({"fields": {"email": {"stringValue": "ana@example.com"}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/expo-test/databases/(default)/documents/empresas/expo/solicitudes/s1",
            "fields": {"email": {"stringValue": "ana@example.com"}}
        })))
        .mount(&server)
        .await;

    let id = services(&server)
        .firestore
        .add(
            "empresas/expo/solicitudes",
            fields(json!({"email": "ana@example.com"})),
        )
        .await
        .unwrap();
    assert_eq!(id, "s1");
}

#[tokio::test]
async fn list_follows_page_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/empresas/expo/expositores", DOCS)))
        .and(query_param("pageToken", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{"name": "x/expositores/e2", "fields": {}}]
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/empresas/expo/expositores", DOCS)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{"name": "x/expositores/e1", "fields": {}}],
            "nextPageToken": "p2"
        })))
        .with_priority(2)
        .mount(&server)
        .await;

    let docs = services(&server)
        .firestore
        .list("empresas/expo/expositores")
        .await
        .unwrap();
    let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["e1", "e2"]);
}

#[tokio::test]
async fn sign_in_uses_the_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts:signInWithPassword"))
        .and(query_param("key", "web-key"))
        .and(body_json(json!({
            "email": "ana@example.com",
            "password": "secreto",
            "returnSecureToken": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-1",
            "email": "ana@example.com",
            "idToken": "id-token",
            "refreshToken": "refresh",
            "expiresIn": "3600"
        })))
        .mount(&server)
        .await;

    let session = services(&server)
        .identity
        .sign_in("ana@example.com", "secreto")
        .await
        .unwrap();
    assert_eq!(session.uid, "uid-1");
    assert_eq!(session.id_token, "id-token");
    assert_eq!(session.expires_in, 3600);
}

#[tokio::test]
async fn duplicate_sign_up_is_a_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts:signUp"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "EMAIL_EXISTS"}
        })))
        .mount(&server)
        .await;

    let err = services(&server)
        .identity
        .sign_up("ana@example.com", "secreto")
        .await
        .unwrap_err();
    assert!(matches!(err, ExpoError::ConflictError(_)));
}

#[tokio::test]
async fn bad_credentials_are_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "INVALID_LOGIN_CREDENTIALS"}
        })))
        .mount(&server)
        .await;

    let err = services(&server)
        .identity
        .sign_in("ana@example.com", "mala")
        .await
        .unwrap_err();
    assert!(matches!(err, ExpoError::AuthError(_)));
}

#[tokio::test]
async fn password_reset_sends_an_oob_code_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts:sendOobCode"))
        .and(body_json(json!({"requestType": "PASSWORD_RESET", "email": "ana@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "ana@example.com"})))
        .expect(1)
        .mount(&server)
        .await;

    services(&server)
        .identity
        .send_password_reset("ana@example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn lookup_resolves_the_token_owner() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts:lookup"))
        .and(body_json(json!({"idToken": "id-token"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"localId": "uid-1", "email": "ana@example.com"}]
        })))
        .mount(&server)
        .await;

    let user = services(&server).identity.lookup("id-token").await.unwrap();
    assert_eq!(user.uid, "uid-1");
    assert_eq!(user.email, "ana@example.com");
}

#[tokio::test]
async fn upload_returns_a_tokenized_download_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/b/expo-test.appspot.com/o"))
        .and(query_param("name", "expositores/e1/logo.png"))
        .and(header("content-type", "image/png"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "expositores/e1/logo.png",
            "bucket": "expo-test.appspot.com",
            "downloadTokens": "tok-1"
        })))
        .mount(&server)
        .await;

    let stored = services(&server)
        .storage
        .upload("expositores/e1/logo.png", "image/png", vec![0x89, 0x50])
        .await
        .unwrap();
    assert_eq!(stored.path, "expositores/e1/logo.png");
    assert_eq!(
        stored.url,
        format!(
            "{}/b/expo-test.appspot.com/o/expositores%2Fe1%2Flogo.png?alt=media&token=tok-1",
            server.uri()
        )
    );
}

#[tokio::test]
async fn delete_by_url_hits_the_object_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/b/expo-test.appspot.com/o/expositores%2Fe1%2Flogo.png"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!(
        "{}/b/expo-test.appspot.com/o/expositores%2Fe1%2Flogo.png?alt=media&token=tok-1",
        server.uri()
    );
    services(&server).storage.delete_by_url(&url).await.unwrap();
}
