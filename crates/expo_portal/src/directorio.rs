// --- File: crates/expo_portal/src/directorio.rs ---
//! Participant directory: who can be asked for a cita, and the public
//! exhibitor listing.

use expo_common::models::{
    Contacto, EstatusContacto, Expositor, Participante, TipoParticipante,
};
use expo_common::{not_found, AppContext, ExpoError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One row of the directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DirectorioEntry {
    pub id: String,
    pub tipo: TipoParticipante,
    pub nombre: String,
    pub apellido: String,
    pub empresa: String,
    pub puesto: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DirectorioResponse {
    pub participantes: Vec<DirectorioEntry>,
}

/// Public view of a participant. Contact details and history stay private.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PerfilPublico {
    #[serde(flatten)]
    pub entrada: DirectorioEntry,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub descripcion: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub galeria: Vec<String>,
}

impl DirectorioEntry {
    fn from_contacto(contacto: &Contacto, with_email: bool) -> Self {
        Self {
            id: contacto.id.clone().unwrap_or_default(),
            tipo: TipoParticipante::Contacto,
            nombre: contacto.nombre.clone(),
            apellido: contacto.apellido.clone(),
            empresa: contacto.empresa.clone(),
            puesto: contacto.puesto.clone(),
            email: with_email.then(|| contacto.email.clone()),
            categoria: None,
            stand: None,
            logo_url: None,
        }
    }

    fn from_expositor(expositor: &Expositor, with_email: bool) -> Self {
        Self {
            id: expositor.id.clone().unwrap_or_default(),
            tipo: TipoParticipante::Expositor,
            nombre: expositor.nombre.clone(),
            apellido: expositor.apellido.clone(),
            empresa: expositor.empresa.clone(),
            puesto: expositor.puesto.clone(),
            email: with_email.then(|| expositor.email.clone()),
            categoria: Some(expositor.categoria.clone()).filter(|c| !c.is_empty()),
            stand: expositor.stand.clone(),
            logo_url: expositor.logo_url.clone(),
        }
    }
}

fn by_name(entries: &mut [DirectorioEntry]) {
    entries.sort_by(|a, b| {
        (a.empresa.to_lowercase(), a.nombre.to_lowercase())
            .cmp(&(b.empresa.to_lowercase(), b.nombre.to_lowercase()))
    });
}

/// Confirmed participants of both kinds, without the caller.
pub async fn contactos(
    ctx: &AppContext,
    yo: &Participante,
) -> Result<DirectorioResponse, ExpoError> {
    let repo = ctx.repository();
    let mut participantes: Vec<DirectorioEntry> = repo
        .list::<Contacto>()
        .await?
        .iter()
        .filter(|c| c.estatus == EstatusContacto::Confirmado)
        .map(|c| DirectorioEntry::from_contacto(c, true))
        .collect();
    participantes.extend(
        repo.list::<Expositor>()
            .await?
            .iter()
            .filter(|e| e.estatus == EstatusContacto::Confirmado)
            .map(|e| DirectorioEntry::from_expositor(e, true)),
    );
    participantes.retain(|p| !(p.tipo == yo.tipo() && p.id == yo.id()));
    by_name(&mut participantes);

    debug!("Directory for {} has {} entries", yo.id(), participantes.len());
    Ok(DirectorioResponse { participantes })
}

pub async fn perfil_publico(
    ctx: &AppContext,
    tipo: TipoParticipante,
    id: &str,
) -> Result<PerfilPublico, ExpoError> {
    let participante = ctx
        .repository()
        .participant(tipo, id)
        .await?
        .filter(Participante::is_confirmado)
        .ok_or_else(|| not_found(format!("{:?} '{}' not found", tipo, id)))?;

    Ok(match &participante {
        Participante::Contacto(c) => PerfilPublico {
            entrada: DirectorioEntry::from_contacto(c, false),
            descripcion: String::new(),
            galeria: Vec::new(),
        },
        Participante::Expositor(e) => PerfilPublico {
            entrada: DirectorioEntry::from_expositor(e, false),
            descripcion: e.descripcion.clone(),
            galeria: e.galeria.clone(),
        },
    })
}

/// Public exhibitor listing for the landing pages.
pub async fn expositores(ctx: &AppContext) -> Result<DirectorioResponse, ExpoError> {
    let mut participantes: Vec<DirectorioEntry> = ctx
        .repository()
        .list::<Expositor>()
        .await?
        .iter()
        .filter(|e| e.estatus == EstatusContacto::Confirmado)
        .map(|e| DirectorioEntry::from_expositor(e, false))
        .collect();
    by_name(&mut participantes);
    Ok(DirectorioResponse { participantes })
}
