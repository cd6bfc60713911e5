// --- File: crates/expo_common/src/models.rs ---
//! Domain records as stored in the document database.
//!
//! Field names on the wire are Spanish camelCase; every struct here
//! round-trips through `serde_json` and, from there, through the
//! document store's value encoding.

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// --- Weekly availability ---

/// Weekday key of an availability map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Dia {
    Lunes,
    Martes,
    #[serde(alias = "miércoles")]
    Miercoles,
    Jueves,
    Viernes,
    #[serde(alias = "sábado")]
    Sabado,
    Domingo,
}

impl Dia {
    pub const TODOS: [Dia; 7] = [
        Dia::Lunes,
        Dia::Martes,
        Dia::Miercoles,
        Dia::Jueves,
        Dia::Viernes,
        Dia::Sabado,
        Dia::Domingo,
    ];

    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Mon => Dia::Lunes,
            Weekday::Tue => Dia::Martes,
            Weekday::Wed => Dia::Miercoles,
            Weekday::Thu => Dia::Jueves,
            Weekday::Fri => Dia::Viernes,
            Weekday::Sat => Dia::Sabado,
            Weekday::Sun => Dia::Domingo,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dia::Lunes => "lunes",
            Dia::Martes => "martes",
            Dia::Miercoles => "miercoles",
            Dia::Jueves => "jueves",
            Dia::Viernes => "viernes",
            Dia::Sabado => "sabado",
            Dia::Domingo => "domingo",
        }
    }
}

impl fmt::Display for Dia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One weekday of an availability map. Bounds are "HH:MM".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DiaDisponible {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inicio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fin: Option<String>,
}

pub type Disponibilidad = BTreeMap<Dia, DiaDisponible>;

// --- Participants ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum EstatusContacto {
    #[default]
    Pendiente,
    Confirmado,
}

/// Companion sub-record on a primary attendee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Acompanante {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telefono: String,
}

/// An attendee record. Companions and exhibitor collaborators are also
/// stored as contactos, told apart by their flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Contacto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub apellido: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub empresa: String,
    #[serde(default)]
    pub puesto: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acompanante: Option<Acompanante>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo_confirmacion: Option<String>,
    #[serde(default)]
    pub estatus: EstatusContacto,
    #[serde(default)]
    pub historial: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<BTreeMap<String, DiaDisponible>>))]
    pub disponibilidad: Option<Disponibilidad>,
    #[serde(default)]
    pub es_acompanante: bool,
    #[serde(default)]
    pub es_invitado_expositor: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acompanante_de: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expositor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

/// An exhibitor account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Expositor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub apellido: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub empresa: String,
    #[serde(default)]
    pub puesto: String,
    #[serde(default)]
    pub categoria: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub galeria: Vec<String>,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo_confirmacion: Option<String>,
    #[serde(default)]
    pub estatus: EstatusContacto,
    #[serde(default)]
    pub historial: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<BTreeMap<String, DiaDisponible>>))]
    pub disponibilidad: Option<Disponibilidad>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum TipoParticipante {
    Contacto,
    Expositor,
}

impl TipoParticipante {
    pub fn coleccion(&self) -> Coleccion {
        match self {
            TipoParticipante::Contacto => Coleccion::Contactos,
            TipoParticipante::Expositor => Coleccion::Expositores,
        }
    }
}

/// A participant as referenced from a cita.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ParticipanteRef {
    pub id: String,
    pub tipo: TipoParticipante,
    pub nombre: String,
    pub email: String,
}

impl ParticipanteRef {
    pub fn is(&self, tipo: TipoParticipante, id: &str) -> bool {
        self.tipo == tipo && self.id == id
    }

    pub fn same_as(&self, other: &ParticipanteRef) -> bool {
        self.is(other.tipo, &other.id)
    }
}

/// Either kind of participant, as loaded for the signed-in user or for
/// the counterpart of a cita.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tipo", rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Participante {
    Contacto(Contacto),
    Expositor(Expositor),
}

impl Participante {
    pub fn tipo(&self) -> TipoParticipante {
        match self {
            Participante::Contacto(_) => TipoParticipante::Contacto,
            Participante::Expositor(_) => TipoParticipante::Expositor,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Participante::Contacto(c) => c.id.as_deref().unwrap_or_default(),
            Participante::Expositor(e) => e.id.as_deref().unwrap_or_default(),
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Participante::Contacto(c) => &c.email,
            Participante::Expositor(e) => &e.email,
        }
    }

    pub fn nombre_completo(&self) -> String {
        let (nombre, apellido) = match self {
            Participante::Contacto(c) => (&c.nombre, &c.apellido),
            Participante::Expositor(e) => (&e.nombre, &e.apellido),
        };
        format!("{} {}", nombre, apellido).trim().to_string()
    }

    pub fn estatus(&self) -> EstatusContacto {
        match self {
            Participante::Contacto(c) => c.estatus,
            Participante::Expositor(e) => e.estatus,
        }
    }

    /// Pending records are invitees without an account yet.
    pub fn is_confirmado(&self) -> bool {
        self.estatus() == EstatusContacto::Confirmado
    }

    pub fn disponibilidad(&self) -> Option<&Disponibilidad> {
        match self {
            Participante::Contacto(c) => c.disponibilidad.as_ref(),
            Participante::Expositor(e) => e.disponibilidad.as_ref(),
        }
    }

    pub fn referencia(&self) -> ParticipanteRef {
        ParticipanteRef {
            id: self.id().to_string(),
            tipo: self.tipo(),
            nombre: self.nombre_completo(),
            email: self.email().to_string(),
        }
    }
}

// --- Appointments ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum EstatusCita {
    Pendiente,
    Confirmada,
    Rechazada,
    Reagendada,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Cita {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub fecha: NaiveDate,
    /// "HH:MM"
    pub hora: String,
    #[serde(default)]
    pub tema: String,
    #[serde(default)]
    pub notas: String,
    pub estatus: EstatusCita,
    pub solicitante: ParticipanteRef,
    pub receptor: ParticipanteRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivo_rechazo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reagendada_por: Option<ParticipanteRef>,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub creada_en: DateTime<Utc>,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub actualizada_en: DateTime<Utc>,
}

impl Cita {
    pub fn involves(&self, tipo: TipoParticipante, id: &str) -> bool {
        self.solicitante.is(tipo, id) || self.receptor.is(tipo, id)
    }

    /// The other side of the cita, seen from `tipo`/`id`.
    pub fn counterpart(&self, tipo: TipoParticipante, id: &str) -> Option<&ParticipanteRef> {
        if self.solicitante.is(tipo, id) {
            Some(&self.receptor)
        } else if self.receptor.is(tipo, id) {
            Some(&self.solicitante)
        } else {
            None
        }
    }

    /// Who may accept or reject right now: the receptor of a pending cita,
    /// or whoever did not propose the new time of a rescheduled one.
    pub fn awaiting_response_from(&self) -> Option<&ParticipanteRef> {
        match self.estatus {
            EstatusCita::Pendiente => Some(&self.receptor),
            EstatusCita::Reagendada => match &self.reagendada_por {
                Some(por) if por.same_as(&self.solicitante) => Some(&self.receptor),
                Some(_) => Some(&self.solicitante),
                None => Some(&self.receptor),
            },
            EstatusCita::Confirmada | EstatusCita::Rechazada => None,
        }
    }

    /// Rejected citas free their slot.
    pub fn occupies_slot(&self) -> bool {
        self.estatus != EstatusCita::Rechazada
    }
}

// --- Registration requests ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum EstatusSolicitud {
    #[default]
    Pendiente,
    Aprobada,
    Rechazada,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Solicitud {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
    pub empresa: String,
    pub puesto: String,
    #[serde(default)]
    pub mensaje: String,
    #[serde(default)]
    pub estatus: EstatusSolicitud,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub creada_en: DateTime<Utc>,
}

// --- Collections ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coleccion {
    Contactos,
    Expositores,
    Citas,
    Solicitudes,
}

impl Coleccion {
    pub fn name(&self) -> &'static str {
        match self {
            Coleccion::Contactos => "contactos",
            Coleccion::Expositores => "expositores",
            Coleccion::Citas => "citas",
            Coleccion::Solicitudes => "solicitudes",
        }
    }

    /// Tenant-scoped path, e.g. `empresas/expo-baja/citas`.
    pub fn path(&self, empresa_id: &str) -> String {
        format!("empresas/{}/{}", empresa_id, self.name())
    }
}

/// Records that carry their document id outside the stored fields.
pub trait StoredRecord: Serialize + serde::de::DeserializeOwned {
    const COLECCION: Coleccion;

    fn doc_id(&self) -> Option<&str>;
    fn set_doc_id(&mut self, id: String);
}

macro_rules! impl_stored_record {
    ($ty:ty, $col:expr) => {
        impl StoredRecord for $ty {
            const COLECCION: Coleccion = $col;

            fn doc_id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn set_doc_id(&mut self, id: String) {
                self.id = Some(id);
            }
        }
    };
}

impl_stored_record!(Contacto, Coleccion::Contactos);
impl_stored_record!(Expositor, Coleccion::Expositores);
impl_stored_record!(Cita, Coleccion::Citas);
impl_stored_record!(Solicitud, Coleccion::Solicitudes);

// --- Helpers ---

/// A history line: `"{timestamp} - {text}"`.
pub fn history_entry(at: DateTime<Utc>, text: &str) -> String {
    format!("{} - {}", at.to_rfc3339_opts(SecondsFormat::Secs, true), text)
}

/// Eight uppercase hex characters taken from a random v4 UUID.
pub fn new_confirmation_code() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}
