//! Firebase Storage REST v0 implementation of [`ObjectStorage`].

use expo_common::services::{BoxFuture, ObjectStorage, StoredObject};
use expo_common::ExpoError;
use reqwest::{header::CONTENT_TYPE, Url};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::client::{check, FirebaseClient, FirebaseError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    name: String,
    #[serde(default)]
    download_tokens: Option<String>,
}

#[derive(Clone)]
pub struct FirebaseStorage {
    client: FirebaseClient,
}

impl FirebaseStorage {
    pub fn new(client: FirebaseClient) -> Self {
        Self { client }
    }

    fn bucket(&self) -> &str {
        &self.client.config.storage_bucket
    }

    /// `{base}/b/{bucket}/o/{path}` with the object path as one encoded
    /// segment (`logos/a.png` becomes `logos%2Fa.png`).
    fn object_url(&self, path: &str) -> Result<Url, FirebaseError> {
        let mut url = Url::parse(self.client.storage_base())
            .map_err(|e| FirebaseError::ConfigError(format!("storage url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| FirebaseError::ConfigError("storage url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["b", self.bucket(), "o", path]);
        Ok(url)
    }

    /// Public download URL for an uploaded object.
    pub fn download_url(&self, path: &str, token: Option<&str>) -> Result<String, FirebaseError> {
        let mut url = self.object_url(path)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("alt", "media");
            if let Some(token) = token {
                query.append_pair("token", token);
            }
        }
        Ok(url.to_string())
    }

    /// The object endpoint behind a download URL from this bucket: the same
    /// URL without its `alt`/`token` query.
    fn object_url_from_download(&self, download_url: &str) -> Result<Url, FirebaseError> {
        let mut url = Url::parse(download_url)
            .map_err(|e| FirebaseError::DecodeError(format!("bad download url: {}", e)))?;
        let belongs_to_bucket = url
            .path_segments()
            .map(|segments| {
                let segments: Vec<&str> = segments.collect();
                segments
                    .windows(4)
                    .any(|w| w[0] == "b" && w[1] == self.bucket() && w[2] == "o" && !w[3].is_empty())
            })
            .unwrap_or(false);
        if !belongs_to_bucket {
            return Err(FirebaseError::DecodeError(format!(
                "not an object of this bucket: {}",
                download_url
            )));
        }
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload_object(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredObject, FirebaseError> {
        let mut url = Url::parse(self.client.storage_base())
            .map_err(|e| FirebaseError::ConfigError(format!("storage url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| FirebaseError::ConfigError("storage url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["b", self.bucket(), "o"]);
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", path);

        let response = self
            .client
            .authorized(self.client.http.post(url))
            .await?
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        let uploaded: UploadResponse = check(response).await?.json().await?;
        let token = uploaded
            .download_tokens
            .as_deref()
            .and_then(|t| t.split(',').next());
        let url = self.download_url(&uploaded.name, token)?;
        info!("Uploaded {}", uploaded.name);
        Ok(StoredObject {
            path: uploaded.name,
            url,
        })
    }

    async fn delete_object(&self, download_url: &str) -> Result<(), FirebaseError> {
        let url = self.object_url_from_download(download_url)?;
        let response = self
            .client
            .authorized(self.client.http.delete(url.clone()))
            .await?
            .send()
            .await?;
        check(response).await?;
        info!("Deleted {}", url);
        Ok(())
    }
}

impl ObjectStorage for FirebaseStorage {
    fn upload<'a>(
        &'a self,
        path: &'a str,
        content_type: &'a str,
        bytes: Vec<u8>,
    ) -> BoxFuture<'a, StoredObject> {
        Box::pin(async move {
            self.upload_object(path, content_type, bytes)
                .await
                .map_err(ExpoError::from)
        })
    }

    fn delete_by_url<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move { self.delete_object(url).await.map_err(ExpoError::from) })
    }
}
