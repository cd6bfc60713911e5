use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use expo_config::{AppConfig, GaleriaImagen};
use expo_site::routes;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn config() -> Arc<AppConfig> {
    let mut config = AppConfig::default();
    config.site.galeria = vec![GaleriaImagen {
        url: "/static/galeria/2024.jpg".to_string(),
        descripcion: Some("Edición 2024".to_string()),
    }];
    Arc::new(config)
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let response = routes(config())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn landing_endpoint_returns_event_and_countdown() {
    let (status, body) = get_json("/site/landing").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["evento"]["nombre"], "Expo Empresarios de la Baja");
    assert_eq!(body["evento"]["dias"].as_array().unwrap().len(), 2);
    assert!(body["countdown"]["iniciado"].is_boolean());
}

#[tokio::test]
async fn galeria_endpoint_lists_configured_images() {
    let (status, body) = get_json("/site/galeria").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imagenes"][0]["url"], "/static/galeria/2024.jpg");
}

#[tokio::test]
async fn countdown_endpoint_has_all_units() {
    let (status, body) = get_json("/site/countdown").await;
    assert_eq!(status, StatusCode::OK);
    for unit in ["dias", "horas", "minutos", "segundos"] {
        assert!(body[unit].is_i64(), "missing {unit}");
    }
}
