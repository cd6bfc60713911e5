// --- File: crates/expo_registro/src/uploads.rs ---
//! Base64 image uploads for exhibitor logos and galleries.

use base64::{engine::general_purpose::STANDARD, Engine};
use expo_common::services::{ObjectStorage, StoredObject};
use expo_common::ExpoError;
use tracing::warn;
use uuid::Uuid;

use crate::error::RegistroError;
use crate::form::ImagenForm;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Request body cap for routes carrying base64 images: a logo plus eight
/// gallery images at the decoded cap, with room for the other form fields.
pub const IMAGE_BODY_LIMIT: usize = 9 * (MAX_IMAGE_BYTES.div_ceil(3) * 4) + 64 * 1024;

/// Decoded image bytes and their content type.
#[derive(Debug, PartialEq)]
pub struct Imagen {
    pub content_type: String,
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

/// Raster formats only; SVG can carry script and is served publicly.
fn extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// Accepts plain base64 or a `data:image/...;base64,` URL.
pub fn decode_image(form: &ImagenForm) -> Result<Imagen, RegistroError> {
    let (declared, payload) = match form.data.trim().strip_prefix("data:") {
        Some(rest) => {
            let (meta, payload) = rest
                .split_once(',')
                .ok_or_else(|| RegistroError::InvalidImage("malformed data URL".to_string()))?;
            let mime = meta.strip_suffix(";base64").ok_or_else(|| {
                RegistroError::InvalidImage("data URL is not base64".to_string())
            })?;
            (Some(mime.to_string()), payload)
        }
        None => (None, form.data.trim()),
    };

    let content_type = form
        .content_type
        .clone()
        .or(declared)
        .unwrap_or_else(|| "image/jpeg".to_string())
        .to_lowercase();
    let extension = extension(&content_type).ok_or_else(|| {
        RegistroError::InvalidImage(format!("unsupported content type {}", content_type))
    })?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| RegistroError::InvalidImage(e.to_string()))?;
    if bytes.is_empty() {
        return Err(RegistroError::InvalidImage("empty image".to_string()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(RegistroError::InvalidImage(format!(
            "image exceeds {} bytes",
            MAX_IMAGE_BYTES
        )));
    }

    Ok(Imagen {
        content_type,
        extension,
        bytes,
    })
}

/// Decode and store one image under `{prefix}/{random}.{ext}`.
pub async fn upload_image(
    storage: &dyn ObjectStorage,
    prefix: &str,
    form: &ImagenForm,
) -> Result<StoredObject, ExpoError> {
    let imagen = decode_image(form)?;
    let path = format!(
        "{}/{}.{}",
        prefix.trim_end_matches('/'),
        Uuid::new_v4().simple(),
        imagen.extension
    );
    storage
        .upload(&path, &imagen.content_type, imagen.bytes)
        .await
}

/// Upload every image, skipping (and logging) the ones that fail.
pub async fn upload_all(
    storage: &dyn ObjectStorage,
    prefix: &str,
    forms: &[ImagenForm],
) -> Vec<String> {
    let mut urls = Vec::with_capacity(forms.len());
    for (i, form) in forms.iter().enumerate() {
        match upload_image(storage, prefix, form).await {
            Ok(stored) => urls.push(stored.url),
            Err(e) => warn!("Skipping image {} under {}: {}", i, prefix, e),
        }
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use expo_common::testing::MemoryStorage;

    fn png() -> ImagenForm {
        ImagenForm {
            data: format!("data:image/png;base64,{}", STANDARD.encode([0x89, b'P', b'N', b'G'])),
            content_type: None,
        }
    }

    #[test]
    fn data_urls_carry_their_type() {
        let imagen = decode_image(&png()).unwrap();
        assert_eq!(imagen.content_type, "image/png");
        assert_eq!(imagen.bytes, vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn non_images_and_garbage_are_refused() {
        let pdf = ImagenForm {
            data: STANDARD.encode(b"%PDF"),
            content_type: Some("application/pdf".to_string()),
        };
        assert!(decode_image(&pdf).is_err());

        let svg = ImagenForm {
            data: STANDARD.encode(b"<svg onload=\"alert(1)\"/>"),
            content_type: Some("image/svg+xml".to_string()),
        };
        assert!(decode_image(&svg).is_err());

        let garbage = ImagenForm {
            data: "not base64 !!".to_string(),
            content_type: None,
        };
        assert!(decode_image(&garbage).is_err());
    }

    #[tokio::test]
    async fn failed_uploads_are_skipped() {
        let storage = MemoryStorage::new();
        let bad = ImagenForm {
            data: "%%%".to_string(),
            content_type: None,
        };
        let urls = upload_all(&storage, "expositores/e1/galeria", &[png(), bad, png()]).await;
        assert_eq!(urls.len(), 2);
        assert_eq!(storage.len(), 2);
        assert!(urls.iter().all(|u| u.ends_with(".png")));
    }
}
