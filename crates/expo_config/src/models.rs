// --- File: crates/expo_config/src/models.rs ---

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Firebase Config ---
// Project identifiers are plain config; the API key and the service account
// key path usually arrive as "secret_from_env".
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub api_key: String, // FIREBASE_API_KEY
    pub key_path: Option<String>, // FIREBASE_KEY_PATH, service account json
    pub storage_bucket: String,
    /// Tenant document under `empresas/` holding all collections.
    pub empresa_id: String,
    // Base URL overrides, used for the emulator suite and in tests.
    #[serde(default)]
    pub firestore_url: Option<String>,
    #[serde(default)]
    pub auth_url: Option<String>,
    #[serde(default)]
    pub storage_url: Option<String>,
}

// --- Mail Endpoint Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MailConfig {
    pub endpoint_url: String,
    pub timeout_secs: Option<u64>,
}

// --- Event Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EventoConfig {
    pub nombre: String,
    /// RFC3339 start of the first event day, e.g. "2025-10-24T10:00:00-07:00".
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub fecha_inicio: DateTime<FixedOffset>,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub fecha_fin: DateTime<FixedOffset>,
    pub sede: String,
    pub zona_horaria: Option<String>,
}

impl EventoConfig {
    /// Event time zone, Tijuana unless configured otherwise.
    pub fn time_zone(&self) -> Tz {
        self.zona_horaria
            .as_deref()
            .and_then(|tz| Tz::from_str(tz).ok())
            .unwrap_or(Tz::America__Tijuana)
    }

    /// Every calendar day the expo runs, in the event time zone.
    pub fn dias(&self) -> Vec<NaiveDate> {
        let tz = self.time_zone();
        let first = self.fecha_inicio.with_timezone(&tz).date_naive();
        let last = self.fecha_fin.with_timezone(&tz).date_naive();
        let mut dias = Vec::new();
        let mut dia = first;
        while dia <= last {
            dias.push(dia);
            dia += Duration::days(1);
        }
        dias
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HeroSlide {
    pub imagen: String,
    pub titulo: String,
    pub subtitulo: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GaleriaImagen {
    pub url: String,
    pub descripcion: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RifaConfig {
    pub titulo: String,
    pub descripcion: String,
    #[serde(default)]
    pub premios: Vec<String>,
    pub fecha_sorteo: Option<String>,
}

// --- Public Site Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    /// Base URL used when building links inside emails.
    pub public_url: String,
    /// Directory with the built client bundle.
    pub static_dir: Option<String>,
    #[serde(default)]
    pub hero: Vec<HeroSlide>,
    #[serde(default)]
    pub galeria: Vec<GaleriaImagen>,
    #[serde(default)]
    pub rifa: Option<RifaConfig>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AuthConfig {
    /// Watchdog on the sign-in call. Defaults to 15 seconds.
    pub login_timeout_secs: Option<u64>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AdminConfig {
    pub shared_secret: Option<String>, // ADMIN_SHARED_SECRET
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InvitacionesConfig {
    pub secret: String, // INVITACIONES_SECRET
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    /// When set, logs are also written to a daily rolling file here.
    pub directory: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_mail: bool,

    pub evento: EventoConfig,
    pub site: SiteConfig,

    // --- Optional Sections ---
    #[serde(default)]
    pub firebase: Option<FirebaseConfig>,
    #[serde(default)]
    pub mail: Option<MailConfig>,
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    #[serde(default)]
    pub admin: Option<AdminConfig>,
    #[serde(default)]
    pub invitaciones: Option<InvitacionesConfig>,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let inicio =
            DateTime::parse_from_rfc3339("2025-10-24T10:00:00-07:00").unwrap_or_default();
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            use_mail: false,
            evento: EventoConfig {
                nombre: "Expo Empresarios de la Baja".to_string(),
                fecha_inicio: inicio,
                fecha_fin: inicio + Duration::hours(32),
                sede: "Tijuana, B.C.".to_string(),
                zona_horaria: Some("America/Tijuana".to_string()),
            },
            site: SiteConfig {
                public_url: "http://localhost:8080".to_string(),
                static_dir: None,
                hero: Vec::new(),
                galeria: Vec::new(),
                rifa: None,
            },
            firebase: None,
            mail: None,
            auth: None,
            admin: None,
            invitaciones: None,
            logging: None,
        }
    }
}
