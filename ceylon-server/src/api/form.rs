//! Admin form payloads
//!
//! Create/update endpoints accept either `multipart/form-data` (text fields,
//! file fields, JSON-encoded nested arrays) or a plain JSON object.
//! [`FormPayload`] normalizes both into one field map plus uploaded files.
//! Field names ending in `[]` are stored without the suffix.

use std::collections::BTreeMap;
use std::str::FromStr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Query, Request};
use http::request::Parts;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::services::ImageStore;
use crate::utils::{AppError, AppResult, ErrorCode};

/// One uploaded file part
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct FormPayload {
    fields: BTreeMap<String, Value>,
    files: Vec<UploadedFile>,
}

fn normalize_key(name: &str) -> String {
    name.strip_suffix("[]").unwrap_or(name).to_string()
}

impl<S> FromRequest<S> for FormPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?;
            Self::from_multipart(multipart).await
        } else {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| AppError::validation(format!("Invalid JSON body: {}", e.body_text())))?;
            Self::from_json(value)
        }
    }
}

impl FormPayload {
    pub fn from_json(value: Value) -> AppResult<Self> {
        let Value::Object(map) = value else {
            return Err(AppError::validation("Request body must be a JSON object"));
        };
        Ok(Self {
            fields: map
                .into_iter()
                .map(|(k, v)| (normalize_key(&k), v))
                .collect(),
            files: Vec::new(),
        })
    }

    async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?
        {
            let key = normalize_key(field.name().unwrap_or_default());
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
                    // Browsers send an empty part for an untouched file input
                    if file_name.is_empty() && data.is_empty() {
                        continue;
                    }
                    form.files.push(UploadedFile {
                        field: key,
                        file_name,
                        data,
                    });
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
                    form.push_value(key, Value::String(text));
                }
            }
        }

        Ok(form)
    }

    /// Repeated keys collect into an array
    fn push_value(&mut self, key: String, value: Value) {
        match self.fields.get_mut(&key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.fields.insert(key, value);
            }
        }
    }

    fn scalar(&self, key: &str) -> Option<&Value> {
        match self.fields.get(key)? {
            Value::Array(items) => items.first(),
            other => Some(other),
        }
    }

    /// Trimmed text value; `None` when missing or blank
    pub fn text(&self, key: &str) -> Option<String> {
        let text = match self.scalar(key)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    /// Parsed number; blank counts as missing
    pub fn number<T: FromStr>(&self, key: &str) -> AppResult<Option<T>> {
        let invalid = || {
            AppError::with_message(ErrorCode::InvalidFormat, format!("{key} must be a number"))
        };
        match self.scalar(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid()),
            Some(Value::Number(n)) => {
                if let Ok(v) = n.to_string().parse() {
                    return Ok(Some(v));
                }
                // 3.0 for an integer field
                n.as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .and_then(|f| format!("{}", f as i64).parse().ok())
                    .map(Some)
                    .ok_or_else(invalid)
            }
            Some(_) => Err(invalid()),
        }
    }

    /// String list from a JSON array, a JSON-encoded array, repeated fields or
    /// a comma-separated value
    pub fn list(&self, key: &str) -> AppResult<Vec<String>> {
        let items = match self.fields.get(key) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(values)) => values.iter().filter_map(value_text).collect(),
            Some(Value::String(s)) => {
                let s = s.trim();
                if s.starts_with('[') {
                    serde_json::from_str::<Vec<String>>(s).map_err(|e| {
                        AppError::with_message(
                            ErrorCode::InvalidFormat,
                            format!("{key} must be a list of strings: {e}"),
                        )
                    })?
                } else {
                    s.split(',').map(str::to_string).collect()
                }
            }
            Some(other) => value_text(other).into_iter().collect(),
        };
        Ok(items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }

    /// Checkbox-style flag
    pub fn flag(&self, key: &str) -> bool {
        match self.scalar(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().is_some_and(|v| v != 0),
            Some(Value::String(s)) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "1" | "on" | "yes"
            ),
            _ => false,
        }
    }

    /// Structured value; multipart carries it JSON-encoded in a text field
    pub fn json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let parsed = match self.fields.get(key) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
            Some(Value::String(s)) => serde_json::from_str(s),
            Some(other) => serde_json::from_value(other.clone()),
        };
        parsed
            .map(Some)
            .map_err(|e| {
                AppError::with_message(ErrorCode::InvalidFormat, format!("{key} is not valid: {e}"))
            })
    }

    pub fn files(&self, key: &str) -> impl Iterator<Item = &UploadedFile> {
        self.files.iter().filter(move |f| f.field == key)
    }

    /// Validate every file under `key` without writing anything
    pub fn check_images(&self, key: &str, store: &ImageStore) -> AppResult<()> {
        for file in self.files(key) {
            store.check(Some(&file.file_name), &file.data)?;
        }
        Ok(())
    }

    /// Validate and store every file under `key`, in upload order
    pub async fn store_images(&self, key: &str, store: &ImageStore) -> AppResult<Vec<String>> {
        self.store_first_images(key, usize::MAX, store).await
    }

    /// Store at most `limit` files under `key`. All of them are validated
    /// first, so a bad file leaves nothing behind.
    pub async fn store_first_images(
        &self,
        key: &str,
        limit: usize,
        store: &ImageStore,
    ) -> AppResult<Vec<String>> {
        self.check_images(key, store)?;
        let mut paths = Vec::new();
        for file in self.files(key).take(limit) {
            let stored = store.store(Some(&file.file_name), &file.data).await?;
            paths.push(stored.path);
        }
        Ok(paths)
    }
}

/// JSON body whose rejection renders as an [`AppError`]
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(format!("Invalid JSON body: {}", e.body_text())))?;
        Ok(Self(value))
    }
}

/// Query string whose rejection renders as an [`AppError`]
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                AppError::with_message(
                    ErrorCode::InvalidFormat,
                    format!("Invalid query string: {}", e.body_text()),
                )
            })?;
        Ok(Self(value))
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;
    use shared::models::Highlight;

    #[test]
    fn test_json_accessors() {
        let form = FormPayload::from_json(json!({
            "name": "  Ella ",
            "rating": 4.5,
            "seats": 9.0,
            "featured": true,
            "categories": ["Hills", " ", "Trains"],
            "highlights": [{"name": "Little Adam's Peak"}],
        }))
        .unwrap();

        assert_eq!(form.text("name").as_deref(), Some("Ella"));
        assert_eq!(form.number::<f64>("rating").unwrap(), Some(4.5));
        assert_eq!(form.number::<u32>("seats").unwrap(), Some(9));
        assert!(form.flag("featured"));
        assert_eq!(form.list("categories").unwrap(), vec!["Hills", "Trains"]);
        let highlights: Vec<Highlight> = form.json("highlights").unwrap().unwrap();
        assert_eq!(highlights[0].name, "Little Adam's Peak");
        assert!(form.text("missing").is_none());
    }

    #[test]
    fn test_string_encodings() {
        let form = FormPayload::from_json(json!({
            "amenities": "Pool, Spa,,WiFi",
            "features": "[\"A/C\",\"Driver\"]",
            "price": "abc",
            "duration": "",
        }))
        .unwrap();

        assert_eq!(form.list("amenities").unwrap(), vec!["Pool", "Spa", "WiFi"]);
        assert_eq!(form.list("features").unwrap(), vec!["A/C", "Driver"]);
        assert!(form.number::<f64>("price").is_err());
        assert_eq!(form.number::<u32>("duration").unwrap(), None);
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(FormPayload::from_json(json!([1, 2])).is_err());
    }

    #[tokio::test]
    async fn test_multipart_fields_and_files() {
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nGalle Fort\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"categories[]\"\r\n\r\nHeritage\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"categories[]\"\r\n\r\nBeach\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"images[]\"; filename=\"fort.png\"\r\nContent-Type: image/png\r\n\r\nPNGDATA\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"highlightImages[]\"; filename=\"\"\r\nContent-Type: application/octet-stream\r\n\r\n\r\n\
             --{b}--\r\n",
            b = boundary
        );
        let req = Request::builder()
            .method("POST")
            .header(
                http::header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let form = FormPayload::from_request(req, &()).await.unwrap();
        assert_eq!(form.text("name").as_deref(), Some("Galle Fort"));
        assert_eq!(form.list("categories").unwrap(), vec!["Heritage", "Beach"]);

        let files: Vec<_> = form.files("images").collect();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "fort.png");
        assert_eq!(&files[0].data[..], b"PNGDATA");
        assert_eq!(form.files("highlightImages").count(), 0);
    }
}
