use expo_common::services::{EmailMessage, EmailSender};
use expo_common::ExpoError;
use expo_config::MailConfig;
use expo_mail::HttpEmailSender;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sender(server: &MockServer) -> HttpEmailSender {
    HttpEmailSender::new(&MailConfig {
        endpoint_url: format!("{}/send", server.uri()),
        timeout_secs: Some(5),
    })
}

fn message() -> EmailMessage {
    EmailMessage {
        to: "ana@example.com".to_string(),
        subject: "Registro confirmado".to_string(),
        html: "<p>Hola</p>".to_string(),
    }
}

#[tokio::test]
async fn posts_to_subject_html() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .and(body_json(json!({
            "to": "ana@example.com",
            "subject": "Registro confirmado",
            "html": "<p>Hola</p>"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = sender(&server).send(&message()).await.unwrap();
    assert!(receipt.success);
}

#[tokio::test]
async fn success_false_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "message": "quota exceeded"})),
        )
        .mount(&server)
        .await;

    let err = sender(&server).send(&message()).await.unwrap_err();
    match err {
        ExpoError::ExternalServiceError { message, .. } => assert!(message.contains("quota")),
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_are_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = sender(&server).send(&message()).await.unwrap_err();
    assert!(matches!(err, ExpoError::ExternalServiceError { .. }));
}
