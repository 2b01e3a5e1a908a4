use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::utils::error::AppError;

/// Set by the authentication gateway in front of this service.
pub const ORGANIZER_HEADER: &str = "x-organizer-id";

/// The authenticated organizer making the request. This service only
/// compares it against event ownership; it never authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrganizerPrincipal(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for OrganizerPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ORGANIZER_HEADER)
            .ok_or_else(|| AppError::AuthError("Organizer identity is required".to_string()))?
            .to_str()
            .map_err(|_| AppError::AuthError("Organizer identity is malformed".to_string()))?;

        let id = Uuid::parse_str(raw.trim())
            .map_err(|_| AppError::AuthError("Organizer identity is malformed".to_string()))?;

        Ok(Self(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<OrganizerPrincipal, AppError> {
        let mut builder = Request::builder().uri("/organizer/events");
        if let Some(value) = header {
            builder = builder.header(ORGANIZER_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        OrganizerPrincipal::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_reads_organizer_header() {
        let id = Uuid::new_v4();
        let principal = extract(Some(&id.to_string())).await.unwrap();
        assert_eq!(principal, OrganizerPrincipal(id));
    }

    #[tokio::test]
    async fn test_missing_or_malformed_header_is_auth_error() {
        assert!(matches!(extract(None).await, Err(AppError::AuthError(_))));
        assert!(matches!(
            extract(Some("organizer-7")).await,
            Err(AppError::AuthError(_))
        ));
    }
}
