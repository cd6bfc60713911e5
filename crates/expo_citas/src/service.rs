// File: crates/expo_citas/src/service.rs
//! Appointment lifecycle: propose, accept, reject and reschedule.
//!
//! Each action is a read, a single write of the cita, best-effort history
//! lines on both participants and one email to the counterpart. The slot
//! re-check before writing is not transactional: two proposals racing for
//! the same slot can both succeed.

use chrono::{NaiveDate, Utc};
use expo_common::models::{
    Cita, EstatusCita, Participante, ParticipanteRef, TipoParticipante,
};
use expo_common::services::EmailMessage;
use expo_common::{
    conflict, forbidden, internal_error, not_found, validation_error, AppContext, ExpoError,
    Repository,
};
use expo_mail::{notify, templates};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::logic::{
    available_slots, candidate_dates, is_slot_available, normalize_hora, parse_fecha, FechasResponse, SlotError,
    SlotsResponse,
};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProponerCitaRequest {
    pub receptor_id: String,
    pub receptor_tipo: TipoParticipante,
    /// "YYYY-MM-DD"
    pub fecha: String,
    /// "HH:MM"
    pub hora: String,
    #[serde(default)]
    pub tema: String,
    #[serde(default)]
    pub notas: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RechazarCitaRequest {
    #[serde(default)]
    pub motivo_rechazo: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReagendarCitaRequest {
    pub fecha: String,
    pub hora: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CitasResponse {
    pub citas: Vec<Cita>,
}

fn ensure_event_day(ctx: &AppContext, fecha: NaiveDate) -> Result<(), SlotError> {
    if ctx.config.evento.dias().contains(&fecha) {
        Ok(())
    } else {
        Err(SlotError::OutsideEvent(fecha))
    }
}

/// Counterparts must be confirmed; pending invitees have no login to
/// answer a cita with, so they are reported as missing.
async fn require_participant(
    repo: &Repository,
    tipo: TipoParticipante,
    id: &str,
) -> Result<Participante, ExpoError> {
    repo.participant(tipo, id)
        .await?
        .filter(Participante::is_confirmado)
        .ok_or_else(|| not_found(format!("{:?} '{}' not found", tipo, id)))
}

/// Load a cita the actor takes part in. Citas of other people are reported
/// as missing.
async fn load_own_cita(
    repo: &Repository,
    actor: &Participante,
    id: &str,
) -> Result<Cita, ExpoError> {
    match repo.get::<Cita>(id).await? {
        Some(cita) if cita.involves(actor.tipo(), actor.id()) => Ok(cita),
        _ => Err(not_found(format!("cita '{}' not found", id))),
    }
}

fn ensure_awaiting_response(cita: &Cita, actor: &Participante) -> Result<(), ExpoError> {
    match cita.awaiting_response_from() {
        None => Err(conflict(format!("cita is already {:?}", cita.estatus))),
        Some(who) if who.is(actor.tipo(), actor.id()) => Ok(()),
        Some(_) => Err(forbidden("this cita is waiting for the other participant")),
    }
}

/// Free-slot check against the counterpart, ignoring the cita being moved.
async fn ensure_slot_free(
    repo: &Repository,
    counterpart: &Participante,
    fecha: NaiveDate,
    hora: &str,
    ignore: Option<&str>,
) -> Result<(), ExpoError> {
    let mut citas = repo.citas_for(counterpart.tipo(), counterpart.id()).await?;
    if let Some(ignore) = ignore {
        citas.retain(|c| c.id.as_deref() != Some(ignore));
    }
    if is_slot_available(counterpart.disponibilidad(), &citas, fecha, hora)? {
        Ok(())
    } else {
        Err(SlotError::Unavailable {
            fecha,
            hora: hora.to_string(),
        }
        .into())
    }
}

async fn record_history(repo: &Repository, who: &ParticipanteRef, text: &str) {
    if let Err(e) = repo
        .append_history(who.tipo.coleccion(), &who.id, text)
        .await
    {
        warn!("Could not append history to {:?} {}: {}", who.tipo, who.id, e);
    }
}

async fn send(ctx: &AppContext, message: EmailMessage) {
    notify(ctx.services.email_sender().as_ref(), message).await;
}

fn cita_id(cita: &Cita) -> Result<&str, ExpoError> {
    cita.id
        .as_deref()
        .ok_or_else(|| internal_error("stored cita without id"))
}

#[instrument(skip(ctx, actor, request), fields(actor = actor.id()))]
pub async fn propose(
    ctx: &AppContext,
    actor: &Participante,
    request: ProponerCitaRequest,
) -> Result<Cita, ExpoError> {
    let fecha = parse_fecha(&request.fecha)?;
    let hora = normalize_hora(&request.hora)?;
    ensure_event_day(ctx, fecha)?;

    if actor.tipo() == request.receptor_tipo && actor.id() == request.receptor_id {
        return Err(validation_error("cannot propose a cita to yourself"));
    }

    let repo = ctx.repository();
    let receptor = require_participant(&repo, request.receptor_tipo, &request.receptor_id).await?;
    ensure_slot_free(&repo, &receptor, fecha, &hora, None).await?;

    let now = Utc::now();
    let mut cita = Cita {
        id: None,
        fecha,
        hora,
        tema: request.tema.trim().to_string(),
        notas: request.notas.trim().to_string(),
        estatus: EstatusCita::Pendiente,
        solicitante: actor.referencia(),
        receptor: receptor.referencia(),
        motivo_rechazo: None,
        reagendada_por: None,
        creada_en: now,
        actualizada_en: now,
    };
    let id = repo.add(&cita).await?;
    cita.id = Some(id.clone());
    info!("Cita {} proposed for {} {}", id, cita.fecha, cita.hora);

    record_history(
        &repo,
        &cita.solicitante,
        &format!("Propuso cita a {} para {} {}", cita.receptor.nombre, cita.fecha, cita.hora),
    )
    .await;
    record_history(
        &repo,
        &cita.receptor,
        &format!("Recibió propuesta de cita de {} para {} {}", cita.solicitante.nombre, cita.fecha, cita.hora),
    )
    .await;

    send(ctx, templates::cita_propuesta(&ctx.config.evento, &cita)).await;
    Ok(cita)
}

#[instrument(skip(ctx, actor), fields(actor = actor.id()))]
pub async fn accept(ctx: &AppContext, actor: &Participante, id: &str) -> Result<Cita, ExpoError> {
    let repo = ctx.repository();
    let mut cita = load_own_cita(&repo, actor, id).await?;
    ensure_awaiting_response(&cita, actor)?;

    cita.estatus = EstatusCita::Confirmada;
    cita.actualizada_en = Utc::now();
    repo.save(cita_id(&cita)?, &cita).await?;
    info!("Cita {} confirmed", id);

    let me = actor.referencia();
    record_history(&repo, &me, &format!("Aceptó cita {} {}", cita.fecha, cita.hora)).await;
    if let Some(other) = cita.counterpart(actor.tipo(), actor.id()).cloned() {
        record_history(&repo, &other, &format!("Cita {} {} confirmada por {}", cita.fecha, cita.hora, me.nombre)).await;
        send(
            ctx,
            templates::cita_aceptada(&ctx.config.evento, &cita, &other.email, &other.nombre, &me.nombre),
        )
        .await;
    }
    Ok(cita)
}

#[instrument(skip(ctx, actor, request), fields(actor = actor.id()))]
pub async fn reject(
    ctx: &AppContext,
    actor: &Participante,
    id: &str,
    request: RechazarCitaRequest,
) -> Result<Cita, ExpoError> {
    let repo = ctx.repository();
    let mut cita = load_own_cita(&repo, actor, id).await?;
    ensure_awaiting_response(&cita, actor)?;

    cita.estatus = EstatusCita::Rechazada;
    cita.motivo_rechazo = request
        .motivo_rechazo
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());
    cita.actualizada_en = Utc::now();
    repo.save(cita_id(&cita)?, &cita).await?;
    info!("Cita {} rejected", id);

    let me = actor.referencia();
    record_history(&repo, &me, &format!("Rechazó cita {} {}", cita.fecha, cita.hora)).await;
    if let Some(other) = cita.counterpart(actor.tipo(), actor.id()).cloned() {
        record_history(&repo, &other, &format!("Cita {} {} rechazada por {}", cita.fecha, cita.hora, me.nombre)).await;
        send(
            ctx,
            templates::cita_rechazada(&ctx.config.evento, &cita, &other.email, &other.nombre, &me.nombre),
        )
        .await;
    }
    Ok(cita)
}

#[instrument(skip(ctx, actor, request), fields(actor = actor.id()))]
pub async fn reschedule(
    ctx: &AppContext,
    actor: &Participante,
    id: &str,
    request: ReagendarCitaRequest,
) -> Result<Cita, ExpoError> {
    let fecha = parse_fecha(&request.fecha)?;
    let hora = normalize_hora(&request.hora)?;
    ensure_event_day(ctx, fecha)?;

    let repo = ctx.repository();
    let mut cita = load_own_cita(&repo, actor, id).await?;
    if cita.estatus == EstatusCita::Rechazada {
        return Err(conflict("a rejected cita cannot be rescheduled"));
    }

    let other_ref = cita
        .counterpart(actor.tipo(), actor.id())
        .cloned()
        .ok_or_else(|| not_found(format!("cita '{}' not found", id)))?;
    let other = require_participant(&repo, other_ref.tipo, &other_ref.id).await?;
    ensure_slot_free(&repo, &other, fecha, &hora, Some(id)).await?;

    let me = actor.referencia();
    cita.fecha = fecha;
    cita.hora = hora;
    cita.estatus = EstatusCita::Reagendada;
    cita.reagendada_por = Some(me.clone());
    cita.actualizada_en = Utc::now();
    repo.save(cita_id(&cita)?, &cita).await?;
    info!("Cita {} moved to {} {}", id, cita.fecha, cita.hora);

    record_history(&repo, &me, &format!("Reagendó cita a {} {}", cita.fecha, cita.hora)).await;
    record_history(
        &repo,
        &other_ref,
        &format!("{} reagendó cita a {} {}", me.nombre, cita.fecha, cita.hora),
    )
    .await;
    send(
        ctx,
        templates::cita_reagendada(&ctx.config.evento, &cita, &other_ref.email, &other_ref.nombre, &me.nombre),
    )
    .await;
    Ok(cita)
}

pub async fn list(ctx: &AppContext, actor: &Participante) -> Result<CitasResponse, ExpoError> {
    let citas = ctx
        .repository()
        .citas_for(actor.tipo(), actor.id())
        .await?;
    Ok(CitasResponse { citas })
}

/// Event days on which a participant still has free slots.
pub async fn fechas(
    ctx: &AppContext,
    tipo: TipoParticipante,
    id: &str,
) -> Result<FechasResponse, ExpoError> {
    let repo = ctx.repository();
    let participante = require_participant(&repo, tipo, id).await?;
    let citas = repo.citas_for(tipo, id).await?;
    let fechas = candidate_dates(
        &ctx.config.evento.dias(),
        participante.disponibilidad(),
        &citas,
    )?;
    Ok(FechasResponse { fechas })
}

pub async fn disponibilidad(
    ctx: &AppContext,
    tipo: TipoParticipante,
    id: &str,
    fecha: &str,
) -> Result<SlotsResponse, ExpoError> {
    let fecha = parse_fecha(fecha)?;
    let repo = ctx.repository();
    let participante = require_participant(&repo, tipo, id).await?;
    let citas = repo.citas_for(tipo, id).await?;
    let slots = available_slots(participante.disponibilidad(), &citas, fecha)?;
    Ok(SlotsResponse { fecha, slots })
}
