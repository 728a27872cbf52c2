//! Request body extraction
//!
//! Issue bodies arrive either as URL-encoded forms or as JSON objects. Both
//! are flattened into [`FieldParams`]. A request without one of those content
//! types carries no fields.

use crate::filter::FieldParams;
use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Body fields of a create, update or delete request
#[derive(Debug, Clone, Default)]
pub struct BodyFields(pub FieldParams);

impl<S> FromRequest<S> for BodyFields
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(object) = Json::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(json_to_params(object)))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(form) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(form.into()))
        } else {
            if !content_type.is_empty() {
                tracing::debug!(
                    content_type = %content_type,
                    "Ignoring body with unsupported content type"
                );
            }
            Ok(Self::default())
        }
    }
}

/// Flatten a JSON object into string parameters
///
/// Scalars are stringified and `null` becomes an empty string. Nested arrays
/// and objects are not issue fields and are dropped.
fn json_to_params(object: Map<String, Value>) -> FieldParams {
    object
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    tracing::debug!(key = %key, "Dropping non-scalar body field");
                    return None;
                }
            };
            Some((key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    async fn extract(content_type: Option<&str>, body: &str) -> FieldParams {
        let mut builder = Request::builder().method("PUT").uri("/api/issues/p");
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();

        BodyFields::from_request(request, &()).await.unwrap().0
    }

    #[tokio::test]
    async fn test_form_body() {
        let params = extract(
            Some("application/x-www-form-urlencoded"),
            "_id=abc&created_by=Rotimi+A&open=false",
        )
        .await;
        assert_eq!(params.get("_id"), Some("abc"));
        assert_eq!(params.get("created_by"), Some("Rotimi A"));
        assert_eq!(params.get("open"), Some("false"));
    }

    #[tokio::test]
    async fn test_json_body() {
        let params = extract(
            Some("application/json; charset=utf-8"),
            r#"{"_id":"abc","open":false,"assigned_to":null,"labels":["x"],"count":3}"#,
        )
        .await;
        assert_eq!(params.get("_id"), Some("abc"));
        assert_eq!(params.get("open"), Some("false"));
        assert_eq!(params.get("assigned_to"), Some(""));
        assert_eq!(params.get("count"), Some("3"));
        assert!(!params.contains("labels"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_empty() {
        let params = extract(None, "").await;
        assert!(params.is_empty());

        let params = extract(Some("text/plain"), "_id=abc").await;
        assert!(params.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_rejected() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/issues/p")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let result = BodyFields::from_request(request, &()).await;
        assert!(result.is_err());
    }
}
