// File: crates/expo_citas/src/logic.rs
//! Meeting-slot computation.
//!
//! Pure and synchronous: a participant's weekly availability map plus their
//! existing citas in, free 30-minute slot starts out.

use chrono::{NaiveDate, NaiveTime, Timelike};
use expo_common::models::{Cita, Dia, Disponibilidad};
use expo_common::ExpoError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Length of every meeting slot.
pub const SLOT_MINUTES: u32 = 30;
/// Window used when a participant never filled in their availability.
pub const DEFAULT_INICIO_MIN: u32 = 10 * 60;
pub const DEFAULT_FIN_MIN: u32 = 18 * 60;

const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("The slot {fecha} {hora} is not available")]
    Unavailable { fecha: NaiveDate, hora: String },

    #[error("{0} is not a day of the event")]
    OutsideEvent(NaiveDate),
}

impl From<SlotError> for ExpoError {
    fn from(err: SlotError) -> Self {
        match err {
            SlotError::Unavailable { .. } => ExpoError::ConflictError(err.to_string()),
            _ => ExpoError::ValidationError(err.to_string()),
        }
    }
}

/// Free slots of one participant on one date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SlotsResponse {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub fecha: NaiveDate,
    pub slots: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FechasResponse {
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<String>))]
    pub fechas: Vec<NaiveDate>,
}

pub fn parse_fecha(value: &str) -> Result<NaiveDate, SlotError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| SlotError::InvalidDate(value.to_string()))
}

/// Parse "HH:MM" (a single-digit hour is accepted) into minutes since
/// midnight.
pub fn parse_hora(value: &str) -> Result<u32, SlotError> {
    let time = NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| SlotError::InvalidTime(value.to_string()))?;
    Ok(time.hour() * 60 + time.minute())
}

pub fn format_hora(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Canonical "HH:MM" for a user-supplied time.
pub fn normalize_hora(value: &str) -> Result<String, SlotError> {
    parse_hora(value).map(format_hora)
}

/// The `[inicio, fin)` window in minutes for `fecha`, or `None` when the
/// participant is not available that day.
///
/// - no map at all: the default 10:00-18:00 window, every day
/// - map without this weekday, or the weekday disabled: no window
/// - weekday enabled with a bound missing or blank: the default for that bound
pub fn window_for(
    disponibilidad: Option<&Disponibilidad>,
    fecha: NaiveDate,
) -> Result<Option<(u32, u32)>, SlotError> {
    let Some(map) = disponibilidad else {
        return Ok(Some((DEFAULT_INICIO_MIN, DEFAULT_FIN_MIN)));
    };
    match map.get(&Dia::from_date(fecha)) {
        Some(dia) if dia.enabled => {
            let inicio = match dia.inicio.as_deref().filter(|s| !s.trim().is_empty()) {
                Some(s) => parse_hora(s)?,
                None => DEFAULT_INICIO_MIN,
            };
            let fin = match dia.fin.as_deref().filter(|s| !s.trim().is_empty()) {
                Some(s) => parse_hora(s)?,
                None => DEFAULT_FIN_MIN,
            };
            Ok(Some((inicio, fin)))
        }
        _ => Ok(None),
    }
}

/// Slot starts already taken on `fecha` by citas that still hold their slot.
fn occupied_on(citas: &[Cita], fecha: NaiveDate) -> HashSet<u32> {
    citas
        .iter()
        .filter(|c| c.fecha == fecha && c.occupies_slot())
        .filter_map(|c| match parse_hora(&c.hora) {
            Ok(minutes) => Some(minutes),
            Err(_) => {
                debug!("Ignoring cita {:?} with malformed hora '{}'", c.id, c.hora);
                None
            }
        })
        .collect()
}

/// Free 30-minute slot starts ("HH:MM") on `fecha`, in order.
pub fn available_slots(
    disponibilidad: Option<&Disponibilidad>,
    citas: &[Cita],
    fecha: NaiveDate,
) -> Result<Vec<String>, SlotError> {
    let Some((inicio, fin)) = window_for(disponibilidad, fecha)? else {
        return Ok(Vec::new());
    };
    let fin = fin.min(MINUTES_PER_DAY);
    let occupied = occupied_on(citas, fecha);

    let slots = (inicio..fin)
        .step_by(SLOT_MINUTES as usize)
        .filter(|start| !occupied.contains(start))
        .map(format_hora)
        .collect();
    Ok(slots)
}

/// Event days on which the participant has at least one free slot.
pub fn candidate_dates(
    dias: &[NaiveDate],
    disponibilidad: Option<&Disponibilidad>,
    citas: &[Cita],
) -> Result<Vec<NaiveDate>, SlotError> {
    let mut fechas = Vec::new();
    for &fecha in dias {
        if !available_slots(disponibilidad, citas, fecha)?.is_empty() {
            fechas.push(fecha);
        }
    }
    Ok(fechas)
}

/// Whether `hora` on `fecha` is one of the participant's free slots.
pub fn is_slot_available(
    disponibilidad: Option<&Disponibilidad>,
    citas: &[Cita],
    fecha: NaiveDate,
    hora: &str,
) -> Result<bool, SlotError> {
    let hora = normalize_hora(hora)?;
    Ok(available_slots(disponibilidad, citas, fecha)?.contains(&hora))
}
