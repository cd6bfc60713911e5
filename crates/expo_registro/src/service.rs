// --- File: crates/expo_registro/src/service.rs ---
//! Registration flows.
//!
//! Every flow validates first, then performs its writes, then sends email.
//! Email and upload failures after the writes are logged and do not fail
//! the request.

use chrono::Utc;
use expo_common::models::{
    history_entry, new_confirmation_code, Acompanante, Coleccion, Contacto, EstatusContacto,
    EstatusSolicitud, Expositor, Solicitud, TipoParticipante,
};
use expo_common::{conflict, validation_error, AppContext, ExpoError, Repository};
use expo_mail::{notify, templates};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::error::RegistroError;
use crate::form::{AcompananteForm, Rama, RegistroForm};
use crate::token;
use crate::uploads::{upload_all, upload_image};

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct InvitacionQuery {
    pub invitacion: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SolicitudResponse {
    pub id: String,
    pub estatus: EstatusSolicitud,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RegistroResponse {
    pub id: String,
    pub tipo: TipoParticipante,
    pub email: String,
    pub codigo_confirmacion: String,
}

/// What the registration page needs to render an invitation link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InvitacionView {
    pub contacto_id: String,
    pub rama: Rama,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub empresa: String,
    pub puesto: String,
    pub campos_requeridos: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AprobacionResponse {
    pub solicitud_id: String,
    pub contacto_id: String,
    pub invitacion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SolicitudesResponse {
    pub solicitudes: Vec<Solicitud>,
}

fn clean(value: &str) -> String {
    value.trim().to_string()
}

fn clean_email(value: &str) -> String {
    value.trim().to_lowercase()
}

async fn ensure_email_free(repo: &Repository, email: &str) -> Result<(), ExpoError> {
    if repo.participant_by_email(email).await?.is_some() {
        return Err(conflict(format!("{} is already registered", email)));
    }
    Ok(())
}

/// Email an invitation link for `contacto_id` and return the link.
pub async fn send_invitation(
    ctx: &AppContext,
    contacto_id: &str,
    nombre: &str,
    email: &str,
) -> Result<String, ExpoError> {
    let link = token::invitation_link(&ctx.config, contacto_id)?;
    notify(
        ctx.services.email_sender().as_ref(),
        templates::invitacion(&ctx.config.evento, email, nombre, &link),
    )
    .await;
    Ok(link)
}

#[instrument(skip(ctx, form), fields(email = %form.email))]
pub async fn submit_solicitud(
    ctx: &AppContext,
    form: RegistroForm,
) -> Result<SolicitudResponse, ExpoError> {
    Rama::Solicitud.validate(&form)?;

    let mut solicitud = Solicitud {
        id: None,
        nombre: clean(&form.nombre),
        apellido: clean(&form.apellido),
        email: clean_email(&form.email),
        telefono: clean(&form.telefono),
        empresa: clean(&form.empresa),
        puesto: clean(&form.puesto),
        mensaje: clean(&form.mensaje),
        estatus: EstatusSolicitud::Pendiente,
        creada_en: Utc::now(),
    };
    let id = ctx.repository().add(&solicitud).await?;
    solicitud.id = Some(id.clone());
    info!("Solicitud {} received", id);

    notify(
        ctx.services.email_sender().as_ref(),
        templates::solicitud_recibida(&ctx.config.evento, &solicitud),
    )
    .await;

    Ok(SolicitudResponse {
        id,
        estatus: solicitud.estatus,
    })
}

/// Verify the link, then load the invited record.
async fn load_invited(
    ctx: &AppContext,
    query: &InvitacionQuery,
) -> Result<Contacto, ExpoError> {
    let secret = token::secret(&ctx.config)?;
    token::verify_invitation(secret, &query.invitacion, &query.token)?;

    let contacto: Contacto = ctx.repository().require(&query.invitacion).await?;
    if contacto.estatus == EstatusContacto::Confirmado {
        return Err(RegistroError::AlreadyRegistered(contacto.email).into());
    }
    Ok(contacto)
}

pub async fn invitation(
    ctx: &AppContext,
    query: &InvitacionQuery,
) -> Result<InvitacionView, ExpoError> {
    let contacto = load_invited(ctx, query).await?;
    let rama = Rama::for_contacto(&contacto);
    Ok(InvitacionView {
        contacto_id: query.invitacion.clone(),
        rama,
        nombre: contacto.nombre,
        apellido: contacto.apellido,
        email: contacto.email,
        empresa: contacto.empresa,
        puesto: contacto.puesto,
        campos_requeridos: rama.required_fields().iter().map(|c| c.to_string()).collect(),
    })
}

pub async fn complete_invitation(
    ctx: &AppContext,
    query: &InvitacionQuery,
    form: RegistroForm,
) -> Result<RegistroResponse, ExpoError> {
    complete(ctx, query, form, false).await
}

pub async fn complete_acompanante(
    ctx: &AppContext,
    query: &InvitacionQuery,
    form: RegistroForm,
) -> Result<RegistroResponse, ExpoError> {
    complete(ctx, query, form, true).await
}

#[instrument(skip(ctx, query, form), fields(contacto = %query.invitacion))]
async fn complete(
    ctx: &AppContext,
    query: &InvitacionQuery,
    form: RegistroForm,
    only_companion: bool,
) -> Result<RegistroResponse, ExpoError> {
    let mut contacto = load_invited(ctx, query).await?;
    let id = query.invitacion.clone();
    let rama = Rama::for_contacto(&contacto);
    if only_companion && rama != Rama::Acompanante {
        return Err(RegistroError::NotACompanion.into());
    }
    rama.validate(&form)?;

    let email = clean_email(&contacto.email);
    if email.is_empty() {
        return Err(validation_error("the invited record has no email address"));
    }

    let repo = ctx.repository();
    let acompanante: Option<AcompananteForm> = match rama {
        Rama::Invitado => form.acompanante.clone().filter(|a| !a.is_empty()),
        _ => None,
    };
    if let Some(a) = &acompanante {
        ensure_email_free(&repo, &clean_email(&a.email)).await?;
    }

    let account = ctx
        .services
        .auth_provider()
        .sign_up(&email, &form.password)
        .await?;

    contacto.nombre = clean(&form.nombre);
    contacto.telefono = clean(&form.telefono);
    match rama {
        Rama::Colaborador => {
            contacto.apellido = clean(&form.apellido);
            contacto.puesto = clean(&form.puesto);
        }
        Rama::Invitado => {
            contacto.apellido = clean(&form.apellido);
            contacto.empresa = clean(&form.empresa);
            contacto.puesto = clean(&form.puesto);
        }
        _ => {}
    }
    let codigo = new_confirmation_code();
    contacto.email = email.clone();
    contacto.uid = Some(account.uid);
    contacto.estatus = EstatusContacto::Confirmado;
    contacto.codigo_confirmacion = Some(codigo.clone());
    contacto
        .historial
        .push(history_entry(Utc::now(), &format!("Registro completado ({:?})", rama)));

    let mut companion_invite = None;
    if let Some(a) = acompanante {
        let companion = Contacto {
            nombre: clean(&a.nombre),
            email: clean_email(&a.email),
            telefono: clean(&a.telefono),
            empresa: contacto.empresa.clone(),
            es_acompanante: true,
            acompanante_de: Some(id.clone()),
            historial: vec![history_entry(
                Utc::now(),
                &format!("Invitado como acompañante de {} {}", contacto.nombre, contacto.apellido),
            )],
            ..Default::default()
        };
        let companion_id = repo.add(&companion).await?;
        info!("Companion {} created for {}", companion_id, id);
        contacto.historial.push(history_entry(
            Utc::now(),
            &format!("Invitó a {} como acompañante", companion.email),
        ));
        contacto.acompanante = Some(Acompanante {
            nombre: companion.nombre.clone(),
            email: companion.email.clone(),
            telefono: companion.telefono.clone(),
        });
        companion_invite = Some((companion_id, companion.nombre, companion.email));
    }

    repo.save(&id, &contacto).await?;
    info!("Contacto {} confirmed", id);

    if let Some((companion_id, nombre, email)) = companion_invite {
        if let Err(e) = send_invitation(ctx, &companion_id, &nombre, &email).await {
            warn!("Could not invite companion {}: {}", companion_id, e);
        }
    }
    notify(
        ctx.services.email_sender().as_ref(),
        templates::registro_confirmado(&ctx.config.evento, &email, &contacto.nombre, &codigo),
    )
    .await;

    Ok(RegistroResponse {
        id,
        tipo: TipoParticipante::Contacto,
        email,
        codigo_confirmacion: codigo,
    })
}

#[instrument(skip(ctx, form), fields(email = %form.email))]
pub async fn register_expositor(
    ctx: &AppContext,
    form: RegistroForm,
) -> Result<RegistroResponse, ExpoError> {
    Rama::Expositor.validate(&form)?;
    let email = clean_email(&form.email);
    let repo = ctx.repository();
    ensure_email_free(&repo, &email).await?;

    let account = ctx
        .services
        .auth_provider()
        .sign_up(&email, &form.password)
        .await?;

    let storage = ctx.services.object_storage();
    let prefix = format!("expositores/{}", account.uid);
    let logo_url = match &form.logo {
        Some(logo) => match upload_image(storage.as_ref(), &prefix, logo).await {
            Ok(stored) => Some(stored.url),
            Err(e) => {
                warn!("Skipping logo for {}: {}", email, e);
                None
            }
        },
        None => None,
    };
    let galeria = upload_all(storage.as_ref(), &format!("{}/galeria", prefix), &form.galeria).await;

    let codigo = new_confirmation_code();
    let expositor = Expositor {
        id: None,
        nombre: clean(&form.nombre),
        apellido: clean(&form.apellido),
        email: email.clone(),
        telefono: clean(&form.telefono),
        empresa: clean(&form.empresa),
        puesto: clean(&form.puesto),
        categoria: clean(&form.categoria),
        stand: None,
        logo_url,
        galeria,
        descripcion: clean(&form.descripcion),
        codigo_confirmacion: Some(codigo.clone()),
        estatus: EstatusContacto::Confirmado,
        historial: vec![history_entry(Utc::now(), "Registro de expositor")],
        disponibilidad: None,
        uid: Some(account.uid),
    };
    let id = repo.add(&expositor).await?;
    info!("Expositor {} registered", id);

    notify(
        ctx.services.email_sender().as_ref(),
        templates::bienvenida_expositor(
            &ctx.config.evento,
            &email,
            &expositor.nombre,
            &expositor.empresa,
            &codigo,
        ),
    )
    .await;

    Ok(RegistroResponse {
        id,
        tipo: TipoParticipante::Expositor,
        email,
        codigo_confirmacion: codigo,
    })
}

pub async fn list_solicitudes(ctx: &AppContext) -> Result<SolicitudesResponse, ExpoError> {
    let mut solicitudes: Vec<Solicitud> = ctx.repository().list().await?;
    solicitudes.sort_by(|a, b| b.creada_en.cmp(&a.creada_en));
    Ok(SolicitudesResponse { solicitudes })
}

async fn load_pending(repo: &Repository, id: &str) -> Result<Solicitud, ExpoError> {
    let solicitud: Solicitud = repo.require(id).await?;
    if solicitud.estatus != EstatusSolicitud::Pendiente {
        return Err(RegistroError::AlreadyProcessed(id.to_string()).into());
    }
    Ok(solicitud)
}

fn estatus_fields(estatus: EstatusSolicitud) -> Result<Map<String, Value>, ExpoError> {
    let mut fields = Map::new();
    fields.insert("estatus".to_string(), serde_json::to_value(estatus)?);
    Ok(fields)
}

/// Turn a pending solicitud into an invited contacto.
#[instrument(skip(ctx))]
pub async fn approve_solicitud(
    ctx: &AppContext,
    id: &str,
) -> Result<AprobacionResponse, ExpoError> {
    token::secret(&ctx.config)?;
    let repo = ctx.repository();
    let solicitud = load_pending(&repo, id).await?;
    ensure_email_free(&repo, &solicitud.email).await?;

    let contacto = Contacto {
        nombre: solicitud.nombre.clone(),
        apellido: solicitud.apellido.clone(),
        email: solicitud.email.clone(),
        telefono: solicitud.telefono.clone(),
        empresa: solicitud.empresa.clone(),
        puesto: solicitud.puesto.clone(),
        historial: vec![history_entry(Utc::now(), &format!("Solicitud {} aprobada", id))],
        ..Default::default()
    };
    let contacto_id = repo.add(&contacto).await?;
    repo.update_fields(
        Coleccion::Solicitudes,
        id,
        estatus_fields(EstatusSolicitud::Aprobada)?,
    )
    .await?;
    info!("Solicitud {} approved as contacto {}", id, contacto_id);

    let invitacion =
        send_invitation(ctx, &contacto_id, &solicitud.nombre, &solicitud.email).await?;

    Ok(AprobacionResponse {
        solicitud_id: id.to_string(),
        contacto_id,
        invitacion,
    })
}

#[instrument(skip(ctx))]
pub async fn reject_solicitud(ctx: &AppContext, id: &str) -> Result<Solicitud, ExpoError> {
    let repo = ctx.repository();
    let mut solicitud = load_pending(&repo, id).await?;
    repo.update_fields(
        Coleccion::Solicitudes,
        id,
        estatus_fields(EstatusSolicitud::Rechazada)?,
    )
    .await?;
    solicitud.estatus = EstatusSolicitud::Rechazada;
    info!("Solicitud {} rejected", id);

    notify(
        ctx.services.email_sender().as_ref(),
        templates::solicitud_rechazada(&ctx.config.evento, &solicitud),
    )
    .await;
    Ok(solicitud)
}
