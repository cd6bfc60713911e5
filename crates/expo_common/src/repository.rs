// --- File: crates/expo_common/src/repository.rs ---
//! Typed access to the tenant's collections on top of a [`DocumentStore`].

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::error::{internal_error, not_found, ExpoError};
use crate::models::{
    history_entry, Cita, Coleccion, Contacto, Expositor, Participante, StoredRecord,
    TipoParticipante,
};
use crate::services::{DocumentStore, Documento};

/// Serialize a record into top-level document fields, without its id.
pub fn to_fields<T: Serialize>(record: &T) -> Result<Map<String, Value>, ExpoError> {
    match serde_json::to_value(record)? {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        other => Err(internal_error(format!(
            "expected a JSON object for a document, got {}",
            other
        ))),
    }
}

fn from_document<T: StoredRecord>(doc: Documento) -> Result<T, ExpoError> {
    let mut record: T = serde_json::from_value(Value::Object(doc.data))?;
    record.set_doc_id(doc.id);
    Ok(record)
}

#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DocumentStore>,
    empresa_id: String,
}

impl Repository {
    pub fn new(store: Arc<dyn DocumentStore>, empresa_id: impl Into<String>) -> Self {
        Self {
            store,
            empresa_id: empresa_id.into(),
        }
    }

    pub fn empresa_id(&self) -> &str {
        &self.empresa_id
    }

    fn path(&self, coleccion: Coleccion) -> String {
        coleccion.path(&self.empresa_id)
    }

    pub async fn get<T: StoredRecord>(&self, id: &str) -> Result<Option<T>, ExpoError> {
        let path = self.path(T::COLECCION);
        match self.store.get(&path, id).await? {
            Some(doc) => Ok(Some(from_document(doc)?)),
            None => Ok(None),
        }
    }

    /// Like [`Repository::get`], but a missing document is a 404.
    pub async fn require<T: StoredRecord>(&self, id: &str) -> Result<T, ExpoError> {
        self.get(id).await?.ok_or_else(|| {
            not_found(format!("{} '{}' not found", T::COLECCION.name(), id))
        })
    }

    pub async fn find_by<T: StoredRecord>(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Vec<T>, ExpoError> {
        let path = self.path(T::COLECCION);
        let value = value.into();
        self.store
            .query_eq(&path, field, &value)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    pub async fn list<T: StoredRecord>(&self) -> Result<Vec<T>, ExpoError> {
        let path = self.path(T::COLECCION);
        self.store
            .list(&path)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Insert a new record and return its generated id.
    pub async fn add<T: StoredRecord>(&self, record: &T) -> Result<String, ExpoError> {
        let path = self.path(T::COLECCION);
        let id = self.store.add(&path, to_fields(record)?).await?;
        debug!("Added {} document {}", T::COLECCION.name(), id);
        Ok(id)
    }

    /// Write every serialized field of `record` over document `id`.
    pub async fn save<T: StoredRecord>(&self, id: &str, record: &T) -> Result<(), ExpoError> {
        let path = self.path(T::COLECCION);
        self.store.update(&path, id, to_fields(record)?).await
    }

    pub async fn update_fields(
        &self,
        coleccion: Coleccion,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), ExpoError> {
        let path = self.path(coleccion);
        self.store.update(&path, id, fields).await
    }

    /// Append a timestamped line to a document's `historial`.
    ///
    /// Read-modify-write; a concurrent append may be lost.
    pub async fn append_history(
        &self,
        coleccion: Coleccion,
        id: &str,
        text: &str,
    ) -> Result<(), ExpoError> {
        let path = self.path(coleccion);
        let doc = self
            .store
            .get(&path, id)
            .await?
            .ok_or_else(|| not_found(format!("{} '{}' not found", coleccion.name(), id)))?;

        let mut historial = match doc.data.get("historial") {
            Some(Value::Array(lines)) => lines.clone(),
            _ => Vec::new(),
        };
        historial.push(Value::String(history_entry(Utc::now(), text)));

        let mut fields = Map::new();
        fields.insert("historial".to_string(), Value::Array(historial));
        self.store.update(&path, id, fields).await
    }

    pub async fn participant(
        &self,
        tipo: TipoParticipante,
        id: &str,
    ) -> Result<Option<Participante>, ExpoError> {
        Ok(match tipo {
            TipoParticipante::Contacto => self.get::<Contacto>(id).await?.map(Participante::Contacto),
            TipoParticipante::Expositor => {
                self.get::<Expositor>(id).await?.map(Participante::Expositor)
            }
        })
    }

    /// Find the participant record for a signed-in email, contactos first.
    pub async fn participant_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Participante>, ExpoError> {
        if let Some(contacto) = self.find_by::<Contacto>("email", email).await?.into_iter().next() {
            return Ok(Some(Participante::Contacto(contacto)));
        }
        Ok(self
            .find_by::<Expositor>("email", email)
            .await?
            .into_iter()
            .next()
            .map(Participante::Expositor))
    }

    /// Every cita the participant is part of, on either side, sorted by
    /// date and time.
    pub async fn citas_for(
        &self,
        tipo: TipoParticipante,
        id: &str,
    ) -> Result<Vec<Cita>, ExpoError> {
        let mut citas = self.find_by::<Cita>("solicitante.id", id).await?;
        citas.extend(self.find_by::<Cita>("receptor.id", id).await?);

        let mut seen = HashSet::new();
        citas.retain(|cita| {
            cita.involves(tipo, id) && seen.insert(cita.id.clone().unwrap_or_default())
        });
        citas.sort_by(|a, b| (a.fecha, &a.hora).cmp(&(b.fecha, &b.hora)));
        Ok(citas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EstatusCita, ParticipanteRef};
    use crate::testing::MemoryDocumentStore;
    use chrono::NaiveDate;

    fn repo() -> Repository {
        Repository::new(Arc::new(MemoryDocumentStore::new()), "expo-test")
    }

    fn referencia(id: &str, tipo: TipoParticipante) -> ParticipanteRef {
        ParticipanteRef {
            id: id.to_string(),
            tipo,
            nombre: id.to_string(),
            email: format!("{}@example.com", id),
        }
    }

    fn cita(solicitante: &str, receptor: &str, hora: &str) -> Cita {
        let now = Utc::now();
        Cita {
            id: None,
            fecha: NaiveDate::from_ymd_opt(2025, 10, 24).unwrap(),
            hora: hora.to_string(),
            tema: String::new(),
            notas: String::new(),
            estatus: EstatusCita::Pendiente,
            solicitante: referencia(solicitante, TipoParticipante::Contacto),
            receptor: referencia(receptor, TipoParticipante::Expositor),
            motivo_rechazo: None,
            reagendada_por: None,
            creada_en: now,
            actualizada_en: now,
        }
    }

    #[tokio::test]
    async fn add_then_get_sets_the_id() {
        let repo = repo();
        let id = repo
            .add(&Contacto {
                nombre: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let contacto: Contacto = repo.require(&id).await.unwrap();
        assert_eq!(contacto.id.as_deref(), Some(id.as_str()));
        assert_eq!(contacto.nombre, "Ana");
    }

    #[tokio::test]
    async fn require_missing_is_not_found() {
        let err = repo().require::<Contacto>("nope").await.unwrap_err();
        assert!(matches!(err, ExpoError::NotFoundError(_)));
    }

    #[tokio::test]
    async fn participant_by_email_checks_both_collections() {
        let repo = repo();
        repo.add(&Expositor {
            email: "stand@acme.mx".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

        let found = repo.participant_by_email("stand@acme.mx").await.unwrap().unwrap();
        assert_eq!(found.tipo(), TipoParticipante::Expositor);
        assert!(repo.participant_by_email("x@y.z").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn citas_for_merges_both_sides_sorted() {
        let repo = repo();
        repo.add(&cita("ana", "acme", "12:00")).await.unwrap();
        repo.add(&cita("luis", "ana", "10:00")).await.unwrap();
        repo.add(&cita("luis", "acme", "11:00")).await.unwrap();

        // "ana" as receptor is an expositor ref here, so only the first
        // cita belongs to contacto "ana".
        let citas = repo.citas_for(TipoParticipante::Contacto, "ana").await.unwrap();
        assert_eq!(citas.len(), 1);
        assert_eq!(citas[0].hora, "12:00");

        let citas = repo.citas_for(TipoParticipante::Expositor, "acme").await.unwrap();
        let horas: Vec<_> = citas.iter().map(|c| c.hora.as_str()).collect();
        assert_eq!(horas, vec!["11:00", "12:00"]);
    }

    #[tokio::test]
    async fn append_history_keeps_previous_lines() {
        let repo = repo();
        let id = repo
            .add(&Contacto {
                historial: vec!["antes".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();

        repo.append_history(Coleccion::Contactos, &id, "Registro confirmado")
            .await
            .unwrap();

        let contacto: Contacto = repo.require(&id).await.unwrap();
        assert_eq!(contacto.historial.len(), 2);
        assert!(contacto.historial[1].ends_with(" - Registro confirmado"));
    }
}
