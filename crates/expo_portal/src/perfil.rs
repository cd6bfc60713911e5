// --- File: crates/expo_portal/src/perfil.rs ---
//! Profile editing for the signed-in participant.

use chrono::Utc;
use expo_citas::logic::{format_hora, parse_hora, DEFAULT_FIN_MIN, DEFAULT_INICIO_MIN};
use expo_common::models::{
    history_entry, Coleccion, Contacto, DiaDisponible, Disponibilidad, Expositor, Participante,
};
use expo_common::{
    conflict, external_service_error, forbidden, internal_error, not_found, AppContext, ExpoError,
    FieldError,
};
use expo_registro::form::{looks_like_email, ImagenForm};
use expo_registro::service::send_invitation;
use expo_registro::uploads::{decode_image, upload_all, upload_image};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

const OBLIGATORIO: &str = "Este campo es obligatorio";

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PerfilUpdate {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub telefono: Option<String>,
    pub empresa: Option<String>,
    pub puesto: Option<String>,
    /// Exhibitors only.
    pub descripcion: Option<String>,
    /// Exhibitors only.
    pub categoria: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GaleriaRequest {
    pub imagenes: Vec<ImagenForm>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GaleriaDeleteRequest {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GaleriaResponse {
    pub galeria: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LogoResponse {
    pub logo_url: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ColaboradorRequest {
    pub nombre: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ColaboradorResponse {
    pub contacto_id: String,
    pub invitacion: String,
}

fn as_expositor(participante: &Participante) -> Result<&Expositor, ExpoError> {
    match participante {
        Participante::Expositor(expositor) => Ok(expositor),
        Participante::Contacto(_) => Err(forbidden("only exhibitors can do this")),
    }
}

fn storage_prefix(expositor: &Expositor, id: &str) -> String {
    format!("expositores/{}", expositor.uid.as_deref().unwrap_or(id))
}

fn historial_with(participante: &Participante, text: &str) -> Value {
    let existing = match participante {
        Participante::Contacto(c) => &c.historial,
        Participante::Expositor(e) => &e.historial,
    };
    let mut lines: Vec<Value> = existing.iter().cloned().map(Value::String).collect();
    lines.push(Value::String(history_entry(Utc::now(), text)));
    Value::Array(lines)
}

async fn reload(ctx: &AppContext, participante: &Participante) -> Result<Participante, ExpoError> {
    ctx.repository()
        .participant(participante.tipo(), participante.id())
        .await?
        .ok_or_else(|| not_found(format!("participant '{}' not found", participante.id())))
}

/// Collect the fields to write, rejecting blanked-out names and
/// exhibitor-only fields sent by an attendee.
fn perfil_fields(
    participante: &Participante,
    update: &PerfilUpdate,
) -> Result<Map<String, Value>, ExpoError> {
    let mut fields = Map::new();
    let mut errores = Vec::new();

    let comunes = [
        ("nombre", &update.nombre),
        ("apellido", &update.apellido),
        ("telefono", &update.telefono),
        ("empresa", &update.empresa),
        ("puesto", &update.puesto),
    ];
    for (campo, valor) in comunes {
        if let Some(valor) = valor {
            let valor = valor.trim();
            if campo == "nombre" && valor.is_empty() {
                errores.push(FieldError::new(campo, OBLIGATORIO));
                continue;
            }
            fields.insert(campo.to_string(), Value::String(valor.to_string()));
        }
    }

    let solo_expositor = [
        ("descripcion", &update.descripcion),
        ("categoria", &update.categoria),
    ];
    for (campo, valor) in solo_expositor {
        let Some(valor) = valor else { continue };
        match participante {
            Participante::Expositor(_) => {
                fields.insert(campo.to_string(), Value::String(valor.trim().to_string()));
            }
            Participante::Contacto(_) => {
                errores.push(FieldError::new(campo, "Solo aplica a expositores"));
            }
        }
    }

    if errores.is_empty() {
        Ok(fields)
    } else {
        Err(ExpoError::InvalidForm(errores))
    }
}

#[instrument(skip(ctx, participante, update), fields(id = %participante.id()))]
pub async fn update_perfil(
    ctx: &AppContext,
    participante: &Participante,
    update: PerfilUpdate,
) -> Result<Participante, ExpoError> {
    let mut fields = perfil_fields(participante, &update)?;
    if fields.is_empty() {
        return Ok(participante.clone());
    }

    let cambiados: Vec<String> = fields.keys().cloned().collect();
    fields.insert(
        "historial".to_string(),
        historial_with(
            participante,
            &format!("Perfil actualizado: {}", cambiados.join(", ")),
        ),
    );
    ctx.repository()
        .update_fields(participante.tipo().coleccion(), participante.id(), fields)
        .await?;
    info!("Updated profile fields {:?}", cambiados);

    reload(ctx, participante).await
}

fn present(valor: &Option<String>) -> Option<&str> {
    valor.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Check every enabled day and canonicalize its times to "HH:MM".
///
/// A missing or blank bound falls back to the default window for that
/// side, as the slot computation does, and is left out of the stored day.
/// Disabled days are stored as sent.
pub fn validate_disponibilidad(disponibilidad: Disponibilidad) -> Result<Disponibilidad, ExpoError> {
    let mut errores = Vec::new();
    let mut normalizada = Disponibilidad::new();

    for (dia, entrada) in disponibilidad {
        if !entrada.enabled {
            normalizada.insert(dia, entrada);
            continue;
        }

        let inicio_dado = present(&entrada.inicio);
        let fin_dado = present(&entrada.fin);
        let mut bound = |campo: &str, valor: Option<&str>, default: u32| match valor {
            None => Some(default),
            Some(v) => match parse_hora(v) {
                Ok(min) => Some(min),
                Err(e) => {
                    errores.push(FieldError::new(format!("{}.{}", dia, campo), e.to_string()));
                    None
                }
            },
        };
        let inicio = bound("inicio", inicio_dado, DEFAULT_INICIO_MIN);
        let fin = bound("fin", fin_dado, DEFAULT_FIN_MIN);

        if let (Some(inicio), Some(fin)) = (inicio, fin) {
            if inicio >= fin {
                errores.push(FieldError::new(
                    format!("{}.fin", dia),
                    "La hora de fin debe ser posterior a la de inicio",
                ));
            }
            normalizada.insert(
                dia,
                DiaDisponible {
                    enabled: true,
                    inicio: inicio_dado.map(|_| format_hora(inicio)),
                    fin: fin_dado.map(|_| format_hora(fin)),
                },
            );
        }
    }

    if errores.is_empty() {
        Ok(normalizada)
    } else {
        Err(ExpoError::InvalidForm(errores))
    }
}

#[instrument(skip(ctx, participante, disponibilidad), fields(id = %participante.id()))]
pub async fn update_disponibilidad(
    ctx: &AppContext,
    participante: &Participante,
    disponibilidad: Disponibilidad,
) -> Result<Disponibilidad, ExpoError> {
    let disponibilidad = validate_disponibilidad(disponibilidad)?;

    let mut fields = Map::new();
    fields.insert(
        "disponibilidad".to_string(),
        serde_json::to_value(&disponibilidad).map_err(internal_error)?,
    );
    fields.insert(
        "historial".to_string(),
        historial_with(participante, "Disponibilidad actualizada"),
    );
    ctx.repository()
        .update_fields(participante.tipo().coleccion(), participante.id(), fields)
        .await?;

    info!("Stored availability for {} day(s)", disponibilidad.len());
    Ok(disponibilidad)
}

/// Replace the exhibitor logo. The previous object is deleted afterwards;
/// a failed delete only leaves an orphan behind.
#[instrument(skip(ctx, participante, imagen), fields(id = %participante.id()))]
pub async fn upload_logo(
    ctx: &AppContext,
    participante: &Participante,
    imagen: ImagenForm,
) -> Result<LogoResponse, ExpoError> {
    let expositor = as_expositor(participante)?;
    let storage = ctx.services.object_storage();
    let stored = upload_image(
        storage.as_ref(),
        &format!("{}/logo", storage_prefix(expositor, participante.id())),
        &imagen,
    )
    .await?;

    let mut fields = Map::new();
    fields.insert("logoUrl".to_string(), Value::String(stored.url.clone()));
    fields.insert("historial".to_string(), historial_with(participante, "Logo actualizado"));
    ctx.repository()
        .update_fields(Coleccion::Expositores, participante.id(), fields)
        .await?;

    if let Some(anterior) = expositor.logo_url.as_deref().filter(|u| *u != stored.url) {
        if let Err(e) = storage.delete_by_url(anterior).await {
            warn!("Could not delete previous logo {}: {}", anterior, e);
        }
    }

    Ok(LogoResponse {
        logo_url: stored.url,
    })
}

#[instrument(skip(ctx, participante, request), fields(id = %participante.id()))]
pub async fn add_galeria(
    ctx: &AppContext,
    participante: &Participante,
    request: GaleriaRequest,
) -> Result<GaleriaResponse, ExpoError> {
    let expositor = as_expositor(participante)?;
    if request.imagenes.is_empty() {
        return Err(ExpoError::ValidationError("no images sent".to_string()));
    }
    for imagen in &request.imagenes {
        decode_image(imagen)?;
    }

    let storage = ctx.services.object_storage();
    let nuevas = upload_all(
        storage.as_ref(),
        &format!("{}/galeria", storage_prefix(expositor, participante.id())),
        &request.imagenes,
    )
    .await;
    if nuevas.is_empty() {
        return Err(external_service_error("storage", "no image could be stored"));
    }

    let mut galeria = expositor.galeria.clone();
    galeria.extend(nuevas);

    let mut fields = Map::new();
    fields.insert(
        "galeria".to_string(),
        Value::Array(galeria.iter().cloned().map(Value::String).collect()),
    );
    ctx.repository()
        .update_fields(Coleccion::Expositores, participante.id(), fields)
        .await?;

    Ok(GaleriaResponse { galeria })
}

#[instrument(skip(ctx, participante, request), fields(id = %participante.id()))]
pub async fn remove_galeria(
    ctx: &AppContext,
    participante: &Participante,
    request: GaleriaDeleteRequest,
) -> Result<GaleriaResponse, ExpoError> {
    let expositor = as_expositor(participante)?;
    if !expositor.galeria.contains(&request.url) {
        return Err(not_found("image is not part of this gallery"));
    }

    let galeria: Vec<String> = expositor
        .galeria
        .iter()
        .filter(|url| **url != request.url)
        .cloned()
        .collect();

    let mut fields = Map::new();
    fields.insert(
        "galeria".to_string(),
        Value::Array(galeria.iter().cloned().map(Value::String).collect()),
    );
    ctx.repository()
        .update_fields(Coleccion::Expositores, participante.id(), fields)
        .await?;

    if let Err(e) = ctx.services.object_storage().delete_by_url(&request.url).await {
        warn!("Removed {} from the gallery but could not delete it: {}", request.url, e);
    }

    Ok(GaleriaResponse { galeria })
}

/// Invite a collaborator of the signed-in exhibitor. The new contacto
/// completes its registration through the emailed link.
#[instrument(skip(ctx, participante, request), fields(id = %participante.id()))]
pub async fn invite_colaborador(
    ctx: &AppContext,
    participante: &Participante,
    request: ColaboradorRequest,
) -> Result<ColaboradorResponse, ExpoError> {
    let expositor = as_expositor(participante)?;

    let nombre = request.nombre.trim().to_string();
    let email = request.email.trim().to_lowercase();
    let mut errores = Vec::new();
    if nombre.is_empty() {
        errores.push(FieldError::new("nombre", OBLIGATORIO));
    }
    if email.is_empty() {
        errores.push(FieldError::new("email", OBLIGATORIO));
    } else if !looks_like_email(&email) {
        errores.push(FieldError::new("email", "Correo electrónico inválido"));
    }
    if !errores.is_empty() {
        return Err(ExpoError::InvalidForm(errores));
    }

    let repo = ctx.repository();
    if repo.participant_by_email(&email).await?.is_some() {
        return Err(conflict(format!("{} is already registered", email)));
    }

    let contacto = Contacto {
        nombre: nombre.clone(),
        email: email.clone(),
        empresa: expositor.empresa.clone(),
        es_invitado_expositor: true,
        expositor_id: Some(participante.id().to_string()),
        historial: vec![history_entry(
            Utc::now(),
            &format!("Invitado por el expositor {}", expositor.empresa),
        )],
        ..Default::default()
    };
    let contacto_id = repo.add(&contacto).await?;
    let invitacion = send_invitation(ctx, &contacto_id, &nombre, &email).await?;

    if let Err(e) = repo
        .append_history(
            Coleccion::Expositores,
            participante.id(),
            &format!("Colaborador invitado: {}", email),
        )
        .await
    {
        warn!("Could not log collaborator invitation on {}: {}", participante.id(), e);
    }

    info!("Exhibitor {} invited collaborator {}", participante.id(), contacto_id);
    Ok(ColaboradorResponse {
        contacto_id,
        invitacion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use expo_citas::logic::window_for;
    use expo_common::models::Dia;

    fn dia(enabled: bool, inicio: Option<&str>, fin: Option<&str>) -> DiaDisponible {
        DiaDisponible {
            enabled,
            inicio: inicio.map(str::to_string),
            fin: fin.map(str::to_string),
        }
    }

    #[test]
    fn missing_bounds_are_checked_against_the_default_window() {
        let mut map = Disponibilidad::new();
        map.insert(Dia::Viernes, dia(true, Some("17:00"), None));
        map.insert(Dia::Sabado, dia(true, None, Some("8:30")));

        match validate_disponibilidad(map) {
            Err(ExpoError::InvalidForm(fields)) => {
                let campos: Vec<_> = fields.into_iter().map(|f| f.campo).collect();
                assert_eq!(campos, vec!["sabado.fin"]);
            }
            other => panic!("expected InvalidForm, got {:?}", other),
        }
    }

    #[test]
    fn disabled_days_are_kept_verbatim() {
        let mut map = Disponibilidad::new();
        map.insert(Dia::Lunes, dia(false, Some("nope"), None));
        map.insert(Dia::Viernes, dia(true, Some("9:05"), Some("10:00")));

        let normalizada = validate_disponibilidad(map).unwrap();
        assert_eq!(normalizada[&Dia::Lunes], dia(false, Some("nope"), None));
        assert_eq!(normalizada[&Dia::Viernes], dia(true, Some("09:05"), Some("10:00")));
    }

    #[test]
    fn blank_bounds_mean_the_default_window_like_the_slot_logic() {
        let mut map = Disponibilidad::new();
        map.insert(Dia::Viernes, dia(true, Some(""), Some(" 12:00 ")));
        map.insert(Dia::Sabado, dia(true, Some("  "), Some("")));

        let normalizada = validate_disponibilidad(map.clone()).unwrap();
        assert_eq!(normalizada[&Dia::Viernes], dia(true, None, Some("12:00")));
        assert_eq!(normalizada[&Dia::Sabado], dia(true, None, None));

        let viernes = chrono::NaiveDate::from_ymd_opt(2025, 10, 24).unwrap();
        let ventana = Some((DEFAULT_INICIO_MIN, 12 * 60));
        assert_eq!(window_for(Some(&map), viernes).unwrap(), ventana);
        assert_eq!(window_for(Some(&normalizada), viernes).unwrap(), ventana);
    }

    #[test]
    fn attendee_updates_without_exhibitor_fields_are_accepted() {
        let contacto = Participante::Contacto(Contacto {
            id: Some("ana".to_string()),
            ..Default::default()
        });
        let update = PerfilUpdate {
            empresa: Some(" Zeta ".to_string()),
            ..Default::default()
        };
        let fields = perfil_fields(&contacto, &update).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["empresa"], "Zeta");
    }
}
