// --- File: crates/expo_site/src/logic.rs ---
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use expo_config::{AppConfig, GaleriaImagen, HeroSlide, RifaConfig};
use serde::Serialize;

use crate::countdown::{Countdown, CountdownView};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EventoInfo {
    pub nombre: String,
    pub sede: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub fecha_inicio: DateTime<FixedOffset>,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub fecha_fin: DateTime<FixedOffset>,
    pub zona_horaria: String,
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<String>))]
    pub dias: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LandingResponse {
    pub evento: EventoInfo,
    pub hero: Vec<HeroSlide>,
    pub rifa: Option<RifaConfig>,
    pub countdown: CountdownView,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GaleriaResponse {
    pub imagenes: Vec<GaleriaImagen>,
}

pub fn evento_info(config: &AppConfig) -> EventoInfo {
    let evento = &config.evento;
    EventoInfo {
        nombre: evento.nombre.clone(),
        sede: evento.sede.clone(),
        fecha_inicio: evento.fecha_inicio,
        fecha_fin: evento.fecha_fin,
        zona_horaria: evento.time_zone().name().to_string(),
        dias: evento.dias(),
    }
}

/// Countdown to the configured opening, as seen at `now`.
pub fn countdown_at(config: &AppConfig, now: DateTime<Utc>) -> CountdownView {
    Countdown::new(config.evento.fecha_inicio.with_timezone(&Utc), now).view()
}

pub fn landing(config: &AppConfig, now: DateTime<Utc>) -> LandingResponse {
    LandingResponse {
        evento: evento_info(config),
        hero: config.site.hero.clone(),
        rifa: config.site.rifa.clone(),
        countdown: countdown_at(config, now),
    }
}

pub fn galeria(config: &AppConfig) -> GaleriaResponse {
    GaleriaResponse {
        imagenes: config.site.galeria.clone(),
    }
}
