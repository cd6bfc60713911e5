//! Firestore REST v1 implementation of [`DocumentStore`].

use expo_common::services::{BoxFuture, DocumentStore, Documento};
use expo_common::ExpoError;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, instrument};

use crate::client::{check, FirebaseClient, FirebaseError};
use crate::value::{from_firestore_fields, to_firestore, to_firestore_fields};

const PAGE_SIZE: &str = "300";

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    document: Option<FirestoreDocument>,
}

impl FirestoreDocument {
    fn into_documento(self) -> Result<Documento, FirebaseError> {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Ok(Documento {
            id,
            data: from_firestore_fields(&self.fields)?,
        })
    }
}

/// Field paths with characters outside `[A-Za-z0-9_]` must be quoted.
fn quote_field_path(field: &str) -> String {
    field
        .split('.')
        .map(|segment| {
            let simple = segment
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            if simple {
                segment.to_string()
            } else {
                format!("`{}`", segment.replace('`', "\\`"))
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

#[derive(Clone)]
pub struct FirestoreStore {
    client: FirebaseClient,
}

impl FirestoreStore {
    pub fn new(client: FirebaseClient) -> Self {
        Self { client }
    }

    fn documents_root(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.client.firestore_base(),
            self.client.config.project_id
        )
    }

    #[instrument(skip(self))]
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Documento>, FirebaseError> {
        let url = format!("{}/{}/{}", self.documents_root(), collection, id);
        let response = self
            .client
            .authorized(self.client.http.get(&url))
            .await?
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let doc: FirestoreDocument = check(response).await?.json().await?;
        Ok(Some(doc.into_documento()?))
    }

    #[instrument(skip(self, value))]
    async fn run_query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Documento>, FirebaseError> {
        // runQuery is issued against the parent document of the collection
        let (parent, collection_id) = match collection.rsplit_once('/') {
            Some((parent, id)) => (format!("{}/{}", self.documents_root(), parent), id),
            None => (self.documents_root(), collection),
        };
        let url = format!("{}:runQuery", parent);
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection_id }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": quote_field_path(field) },
                        "op": "EQUAL",
                        "value": to_firestore(value),
                    }
                }
            }
        });

        let response = self
            .client
            .authorized(self.client.http.post(&url))
            .await?
            .json(&body)
            .send()
            .await?;
        let results: Vec<QueryResult> = check(response).await?.json().await?;
        let docs = results
            .into_iter()
            .filter_map(|r| r.document)
            .map(FirestoreDocument::into_documento)
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Query {} == {} matched {} documents", field, value, docs.len());
        Ok(docs)
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<Documento>, FirebaseError> {
        let url = format!("{}/{}", self.documents_root(), collection);
        let mut docs = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self.client.http.get(&url).query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("pageToken", token)]);
            }
            let response = self.client.authorized(request).await?.send().await?;
            let page: ListResponse = check(response).await?.json().await?;
            for doc in page.documents {
                docs.push(doc.into_documento()?);
            }
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(docs)
    }

    #[instrument(skip(self, fields))]
    async fn patch_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), FirebaseError> {
        let url = format!("{}/{}/{}", self.documents_root(), collection, id);
        let mut query: Vec<(&str, String)> = fields
            .keys()
            .map(|k| ("updateMask.fieldPaths", quote_field_path(k)))
            .collect();
        query.push(("currentDocument.exists", "true".to_string()));

        let response = self
            .client
            .authorized(self.client.http.patch(&url).query(&query))
            .await?
            .json(&json!({ "fields": to_firestore_fields(&fields) }))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn create_document(
        &self,
        collection: &str,
        data: Map<String, Value>,
    ) -> Result<String, FirebaseError> {
        let url = format!("{}/{}", self.documents_root(), collection);
        let response = self
            .client
            .authorized(self.client.http.post(&url))
            .await?
            .json(&json!({ "fields": to_firestore_fields(&data) }))
            .send()
            .await?;
        let doc: FirestoreDocument = check(response).await?.json().await?;
        let created = doc.into_documento()?;
        debug!("Created document {}/{}", collection, created.id);
        Ok(created.id)
    }
}

impl DocumentStore for FirestoreStore {
    fn get<'a>(&'a self, collection: &'a str, id: &'a str) -> BoxFuture<'a, Option<Documento>> {
        Box::pin(async move { self.get_document(collection, id).await.map_err(ExpoError::from) })
    }

    fn query_eq<'a>(
        &'a self,
        collection: &'a str,
        field: &'a str,
        value: &'a Value,
    ) -> BoxFuture<'a, Vec<Documento>> {
        Box::pin(async move {
            self.run_query(collection, field, value)
                .await
                .map_err(ExpoError::from)
        })
    }

    fn list<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Vec<Documento>> {
        Box::pin(async move { self.list_documents(collection).await.map_err(ExpoError::from) })
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        fields: Map<String, Value>,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            self.patch_document(collection, id, fields)
                .await
                .map_err(ExpoError::from)
        })
    }

    fn add<'a>(&'a self, collection: &'a str, data: Map<String, Value>) -> BoxFuture<'a, String> {
        Box::pin(async move {
            self.create_document(collection, data)
                .await
                .map_err(ExpoError::from)
        })
    }
}
