use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use expo_common::models::Coleccion;
use expo_common::services::ObjectStorage;
use expo_common::testing::{MemoryAuth, MemoryServiceFactory};
use expo_common::AppContext;
use expo_config::{AppConfig, AuthConfig, InvitacionesConfig};
use expo_portal::routes;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgo=";
const OLD_LOGO: &str = "expositores/uid-luis@acme.mx/logo/old.png";

/// Confirmed contacto `ana`, pending contacto `beto` and confirmed
/// expositor `acme` with a logo and one gallery image.
struct Fixture {
    services: MemoryServiceFactory,
    context: AppContext,
    ana_token: String,
    acme_token: String,
}

impl Fixture {
    async fn new() -> Self {
        Self::with_services(MemoryServiceFactory::new()).await
    }

    async fn with_services(services: MemoryServiceFactory) -> Self {
        let mut config = AppConfig::default();
        config.site.public_url = "https://expo.mx".to_string();
        config.invitaciones = Some(InvitacionesConfig {
            secret: "s3cr3t".to_string(),
        });
        config.auth = Some(AuthConfig {
            login_timeout_secs: Some(5),
        });
        let context = AppContext::new(Arc::new(config), Arc::new(services.clone()));
        let empresa = context.empresa_id().to_string();

        services.store.insert(
            &Coleccion::Contactos.path(&empresa),
            "ana",
            json!({
                "nombre": "Ana",
                "apellido": "López",
                "email": "ana@example.com",
                "empresa": "Zeta",
                "estatus": "Confirmado",
                "historial": ["2025-01-01T00:00:00Z - Registro confirmado"]
            }),
        );
        services.store.insert(
            &Coleccion::Contactos.path(&empresa),
            "beto",
            json!({
                "nombre": "Beto",
                "email": "beto@example.com",
                "estatus": "Pendiente",
                "historial": []
            }),
        );

        let old_logo = services
            .storage
            .upload(OLD_LOGO, "image/png", vec![1, 2, 3])
            .await
            .unwrap();
        let foto = services
            .storage
            .upload("expositores/uid-luis@acme.mx/galeria/a.png", "image/png", vec![4])
            .await
            .unwrap();
        services.store.insert(
            &Coleccion::Expositores.path(&empresa),
            "acme",
            json!({
                "nombre": "Luis",
                "apellido": "Pérez",
                "email": "luis@acme.mx",
                "empresa": "Acme",
                "categoria": "Software",
                "descripcion": "Soluciones",
                "estatus": "Confirmado",
                "logoUrl": old_logo.url,
                "galeria": [foto.url],
                "historial": [],
                "uid": "uid-luis@acme.mx"
            }),
        );

        let ana_token = services.auth.register("ana@example.com", "secreto");
        let acme_token = services.auth.register("luis@acme.mx", "secreto");

        Self {
            services,
            context,
            ana_token,
            acme_token,
        }
    }

    fn doc(&self, coleccion: Coleccion, id: &str) -> Value {
        self.services
            .store
            .document(&coleccion.path(self.context.empresa_id()), id)
            .unwrap_or(Value::Null)
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = routes(self.context.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }
}

fn campos(body: &Value) -> Vec<String> {
    body["error"]["fields"]
        .as_array()
        .map(|fields| {
            fields
                .iter()
                .filter_map(|f| f["campo"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

// --- Account ---

#[tokio::test]
async fn login_returns_session_and_participant() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": " ANA@example.com ", "password": "secreto"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sesion"]["email"], "ana@example.com");
    assert!(body["sesion"]["idToken"].as_str().unwrap().starts_with("token-"));
    assert_eq!(body["participante"]["tipo"], "contacto");
    assert_eq!(body["participante"]["id"], "ana");
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": "ana@example.com", "password": "otra"})),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], 401);
}

#[tokio::test]
async fn account_without_participant_record_cannot_log_in() {
    let fx = Fixture::new().await;
    fx.services.auth.register("ghost@example.com", "secreto");

    let (status, _) = fx
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": "ghost@example.com", "password": "secreto"})),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test(start_paused = true)]
async fn slow_sign_in_times_out() {
    let services =
        MemoryServiceFactory::new().with_auth(MemoryAuth::with_sign_in_delay(Duration::from_secs(60)));
    let fx = Fixture::with_services(services).await;

    let (status, body) = fx
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": "ana@example.com", "password": "secreto"})),
        )
        .await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"]["code"], 504);
}

#[tokio::test]
async fn password_reset_is_forwarded_to_the_auth_service() {
    let fx = Fixture::new().await;
    let (status, _) = fx
        .call(
            Method::POST,
            "/auth/password-reset",
            None,
            Some(json!({"email": "Ana@Example.com"})),
        )
        .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(fx.services.auth.reset_requests(), vec!["ana@example.com"]);
}

#[tokio::test]
async fn password_change_checks_the_current_password() {
    let fx = Fixture::new().await;
    let request = |actual: &str| {
        json!({
            "passwordActual": actual,
            "passwordNueva": "nuevo-secreto",
            "confirmPassword": "nuevo-secreto"
        })
    };

    let (status, _) = fx
        .call(
            Method::POST,
            "/auth/password-change",
            Some(fx.ana_token.as_str()),
            Some(request("equivocada")),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        fx.services.auth.password_of("ana@example.com").as_deref(),
        Some("secreto")
    );

    let (status, _) = fx
        .call(
            Method::POST,
            "/auth/password-change",
            Some(fx.ana_token.as_str()),
            Some(request("secreto")),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(
        fx.services.auth.password_of("ana@example.com").as_deref(),
        Some("nuevo-secreto")
    );
}

#[tokio::test]
async fn password_change_rejects_short_or_mismatched_passwords() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .call(
            Method::POST,
            "/auth/password-change",
            Some(fx.ana_token.as_str()),
            Some(json!({
                "passwordActual": "secreto",
                "passwordNueva": "abc",
                "confirmPassword": "abcd"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(campos(&body), vec!["passwordNueva", "confirmPassword"]);
}

// --- Profile ---

#[tokio::test]
async fn profile_requires_a_token() {
    let fx = Fixture::new().await;
    let (status, _) = fx.call(Method::GET, "/perfil", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = fx.call(Method::GET, "/perfil", Some(fx.acme_token.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tipo"], "expositor");
    assert_eq!(body["empresa"], "Acme");
}

#[tokio::test]
async fn profile_update_writes_fields_and_history() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .call(
            Method::PATCH,
            "/perfil",
            Some(fx.ana_token.as_str()),
            Some(json!({"telefono": " 6649990000 ", "puesto": "Directora"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["telefono"], "6649990000");
    let stored = fx.doc(Coleccion::Contactos, "ana");
    assert_eq!(stored["puesto"], "Directora");
    assert_eq!(stored["nombre"], "Ana");
    let historial = stored["historial"].as_array().unwrap();
    assert_eq!(historial.len(), 2);
    assert!(historial[1].as_str().unwrap().contains("Perfil actualizado"));
}

#[tokio::test]
async fn attendees_cannot_set_exhibitor_fields() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .call(
            Method::PATCH,
            "/perfil",
            Some(fx.ana_token.as_str()),
            Some(json!({"descripcion": "Hola", "nombre": "  "})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(campos(&body), vec!["nombre", "descripcion"]);
    assert_eq!(fx.doc(Coleccion::Contactos, "ana")["nombre"], "Ana");
}

#[tokio::test]
async fn availability_is_normalized_and_stored() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .call(
            Method::PUT,
            "/perfil/disponibilidad",
            Some(fx.acme_token.as_str()),
            Some(json!({
                "viernes": {"enabled": true, "inicio": "9:00", "fin": "11:30"},
                "sabado": {"enabled": true, "inicio": "12:00"},
                "domingo": {"enabled": false}
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["viernes"]["inicio"], "09:00");
    assert_eq!(body["sabado"]["inicio"], "12:00");
    assert!(body["sabado"].get("fin").is_none());

    let stored = fx.doc(Coleccion::Expositores, "acme");
    assert_eq!(stored["disponibilidad"]["viernes"]["fin"], "11:30");
    assert_eq!(stored["disponibilidad"]["domingo"]["enabled"], false);
}

#[tokio::test]
async fn malformed_or_inverted_availability_is_rejected() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .call(
            Method::PUT,
            "/perfil/disponibilidad",
            Some(fx.ana_token.as_str()),
            Some(json!({
                "viernes": {"enabled": true, "inicio": "12:00", "fin": "10:00"},
                "sabado": {"enabled": true, "inicio": "9h", "fin": "13:00"}
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(campos(&body), vec!["viernes.fin", "sabado.inicio"]);
    assert!(fx.doc(Coleccion::Contactos, "ana").get("disponibilidad").is_none());
}

#[tokio::test]
async fn new_logo_replaces_and_deletes_the_old_one() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .call(
            Method::POST,
            "/perfil/logo",
            Some(fx.acme_token.as_str()),
            Some(json!({"data": PNG_DATA_URL})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let url = body["logoUrl"].as_str().unwrap();
    assert!(url.starts_with("memory://expositores/uid-luis@acme.mx/logo/"));
    assert!(url.ends_with(".png"));
    assert_eq!(fx.doc(Coleccion::Expositores, "acme")["logoUrl"], url);
    assert!(!fx.services.storage.contains(OLD_LOGO));
    assert!(fx.services.storage.contains(url.trim_start_matches("memory://")));
}

#[tokio::test]
async fn large_logos_are_stored_and_oversized_ones_refused() {
    let fx = Fixture::new().await;
    let mut foto = vec![0x89, b'P', b'N', b'G'];
    foto.resize(3 * 1024 * 1024, 7);
    let (status, body) = fx
        .call(
            Method::POST,
            "/perfil/logo",
            Some(fx.acme_token.as_str()),
            Some(json!({"data": STANDARD.encode(&foto), "contentType": "image/jpeg"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["logoUrl"].as_str().unwrap().ends_with(".jpg"));

    foto.resize(6 * 1024 * 1024, 7);
    let (status, _) = fx
        .call(
            Method::POST,
            "/perfil/logo",
            Some(fx.acme_token.as_str()),
            Some(json!({"data": STANDARD.encode(&foto), "contentType": "image/png"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn svg_logos_are_refused() {
    let fx = Fixture::new().await;
    let svg = STANDARD.encode(r#"<svg xmlns="http://www.w3.org/2000/svg"><script>alert(1)</script></svg>"#);
    let (status, _) = fx
        .call(
            Method::POST,
            "/perfil/logo",
            Some(fx.acme_token.as_str()),
            Some(json!({"data": format!("data:image/svg+xml;base64,{}", svg)})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(fx.services.storage.contains(OLD_LOGO));
}

#[tokio::test]
async fn attendees_have_no_logo() {
    let fx = Fixture::new().await;
    let (status, _) = fx
        .call(
            Method::POST,
            "/perfil/logo",
            Some(fx.ana_token.as_str()),
            Some(json!({"data": PNG_DATA_URL})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn gallery_images_are_added_and_removed() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .call(
            Method::POST,
            "/perfil/galeria",
            Some(fx.acme_token.as_str()),
            Some(json!({"imagenes": [{"data": PNG_DATA_URL}, {"data": PNG_DATA_URL}]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["galeria"].as_array().unwrap().len(), 3);

    let primera = "memory://expositores/uid-luis@acme.mx/galeria/a.png";
    let (status, body) = fx
        .call(
            Method::DELETE,
            "/perfil/galeria",
            Some(fx.acme_token.as_str()),
            Some(json!({"url": primera})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let galeria = body["galeria"].as_array().unwrap();
    assert_eq!(galeria.len(), 2);
    assert!(!galeria.iter().any(|u| u == primera));
    assert!(!fx.services.storage.contains("expositores/uid-luis@acme.mx/galeria/a.png"));
    assert_eq!(
        fx.doc(Coleccion::Expositores, "acme")["galeria"].as_array().unwrap().len(),
        2
    );

    let (status, _) = fx
        .call(
            Method::DELETE,
            "/perfil/galeria",
            Some(fx.acme_token.as_str()),
            Some(json!({"url": primera})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_images_are_refused_before_upload() {
    let fx = Fixture::new().await;
    let (status, _) = fx
        .call(
            Method::POST,
            "/perfil/galeria",
            Some(fx.acme_token.as_str()),
            Some(json!({"imagenes": [{"data": "aGVsbG8=", "contentType": "text/plain"}]})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(fx.services.storage.len(), 2);
}

#[tokio::test]
async fn exhibitors_invite_collaborators() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .call(
            Method::POST,
            "/perfil/colaboradores",
            Some(fx.acme_token.as_str()),
            Some(json!({"nombre": "Carla", "email": "Carla@Acme.mx"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let id = body["contactoId"].as_str().unwrap();
    assert!(body["invitacion"]
        .as_str()
        .unwrap()
        .starts_with(&format!("https://expo.mx/registro?invitacion={}&token=", id)));

    let contacto = fx.doc(Coleccion::Contactos, id);
    assert_eq!(contacto["email"], "carla@acme.mx");
    assert_eq!(contacto["esInvitadoExpositor"], true);
    assert_eq!(contacto["expositorId"], "acme");
    assert_eq!(contacto["empresa"], "Acme");
    assert_eq!(contacto["estatus"], "Pendiente");

    let sent = fx.services.sent_mail();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "carla@acme.mx");

    let (status, _) = fx
        .call(
            Method::POST,
            "/perfil/colaboradores",
            Some(fx.acme_token.as_str()),
            Some(json!({"nombre": "Ana", "email": "ana@example.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// --- Directory ---

#[tokio::test]
async fn directory_lists_confirmed_participants_except_the_caller() {
    let fx = Fixture::new().await;
    let (status, body) = fx.call(Method::GET, "/contactos", Some(fx.ana_token.as_str()), None).await;

    assert_eq!(status, StatusCode::OK);
    let participantes = body["participantes"].as_array().unwrap();
    assert_eq!(participantes.len(), 1);
    assert_eq!(participantes[0]["id"], "acme");
    assert_eq!(participantes[0]["tipo"], "expositor");
    assert_eq!(participantes[0]["email"], "luis@acme.mx");
}

#[tokio::test]
async fn public_profiles_hide_contact_details() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .call(Method::GET, "/contactos/contacto/ana", Some(fx.acme_token.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nombre"], "Ana");
    assert!(body.get("email").is_none());
    assert!(body.get("historial").is_none());

    let (status, _) = fx
        .call(Method::GET, "/contactos/expositor/nadie", Some(fx.acme_token.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pending_invitees_have_no_public_profile() {
    let fx = Fixture::new().await;
    let (status, _) = fx
        .call(Method::GET, "/contactos/contacto/beto", Some(fx.acme_token.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    fx.services.store.insert(
        &Coleccion::Expositores.path(fx.context.empresa_id()),
        "nueva",
        json!({"nombre": "Sofía", "empresa": "Nueva", "estatus": "Pendiente", "historial": []}),
    );
    let (status, _) = fx.call(Method::GET, "/expositores/nueva", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn exhibitor_listing_is_public() {
    let fx = Fixture::new().await;
    let (status, body) = fx.call(Method::GET, "/expositores", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let participantes = body["participantes"].as_array().unwrap();
    assert_eq!(participantes.len(), 1);
    assert_eq!(participantes[0]["categoria"], "Software");
    assert!(participantes[0].get("email").is_none());

    let (status, body) = fx.call(Method::GET, "/expositores/acme", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["descripcion"], "Soluciones");
    assert_eq!(body["galeria"].as_array().unwrap().len(), 1);
}
