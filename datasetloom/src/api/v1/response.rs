//! # V1 API Response Envelope & Error Contract
//!
//! Every v1 endpoint returns an [`ApiResponse<T>`] envelope with three
//! optional top-level fields:
//!
//! ```json
//! {
//!   "data": { ... },                                   // present on success
//!   "meta": { "total": 42, "page": 1, "hasMore": false }, // optional pagination
//!   "error": { "code": "not_found", "message": "..." } // present on error
//! }
//! ```
//!
//! ## ID Formats
//!
//! Documents, chunks, questions, chats and messages all use 21-character
//! nanoids unless the client supplied its own chat or message id.
//!
//! ## Pagination
//!
//! Chunk listings are offset-paginated (`page`, `limit`) and report
//! `total`/`totalPages`. Chat listings are cursor-paginated with
//! `startingAfter`/`endingBefore` chat ids and report `hasMore`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::LoomError;
use crate::models::Pagination;

/// Machine-readable error code included in every error response.
///
/// Serialized as a snake_case string on the wire (e.g. `"invalid_request"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed request, failed validation, or an operation that is not
    /// allowed in the current state. HTTP 400.
    InvalidRequest,
    /// Missing or invalid API key. HTTP 401.
    Unauthorized,
    /// The requested resource does not exist. HTTP 404.
    NotFound,
    /// The chunk preview was never created or has expired. HTTP 409.
    StaleCache,
    /// An unexpected server-side error occurred. HTTP 500.
    InternalError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::StaleCache => StatusCode::CONFLICT,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest => write!(f, "invalid_request"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::NotFound => write!(f, "not_found"),
            Self::StaleCache => write!(f, "stale_cache"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

/// Structured error payload within the API envelope.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    pub code: ErrorCode,
    /// Human-readable description. Internal details are never included.
    pub message: String,
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_more: Option<bool>,
}

impl ResponseMeta {
    pub fn has_more(has_more: bool) -> Self {
        Self {
            has_more: Some(has_more),
            ..Default::default()
        }
    }
}

impl From<Pagination> for ResponseMeta {
    fn from(p: Pagination) -> Self {
        Self {
            total: Some(u64::from(p.total_items)),
            page: Some(p.current_page),
            limit: Some(p.limit),
            total_pages: Some(p.total_pages),
            has_more: Some(p.current_page < p.total_pages),
        }
    }
}

/// Canonical v1 API response envelope.
///
/// On success `data` is present and `error` is absent; on error the reverse.
/// The HTTP status comes from the error code, or from the constructor used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// HTTP 200.
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            meta: None,
            error: None,
            status: StatusCode::OK,
        }
    }

    pub fn success_with_meta(data: T, meta: ResponseMeta) -> Self {
        Self {
            data: Some(data),
            meta: Some(meta),
            error: None,
            status: StatusCode::OK,
        }
    }

    /// HTTP 201.
    pub fn created(data: T) -> Self {
        Self {
            data: Some(data),
            meta: None,
            error: None,
            status: StatusCode::CREATED,
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        let status = code.status();
        Self {
            data: None,
            meta: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
            status,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        match serde_json::to_value(&self) {
            Ok(body) => (status, Json(body)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response body");
                let body = serde_json::json!({
                    "error": {
                        "code": "internal_error",
                        "message": "An internal error occurred"
                    }
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl<T: Serialize> From<LoomError> for ApiResponse<T> {
    /// Internal error details are **never** sent to the client; they are
    /// logged and replaced by a generic message.
    fn from(err: LoomError) -> Self {
        match err {
            LoomError::NotFound(msg) => ApiResponse::error(ErrorCode::NotFound, msg),
            LoomError::Validation(msg) | LoomError::InvalidOperation(msg) => {
                ApiResponse::error(ErrorCode::InvalidRequest, msg)
            }
            LoomError::StaleCache(msg) => ApiResponse::error(ErrorCode::StaleCache, msg),
            LoomError::Json(e) => {
                ApiResponse::error(ErrorCode::InvalidRequest, format!("Invalid JSON: {e}"))
            }
            internal @ (LoomError::Database(_)
            | LoomError::Transaction { .. }
            | LoomError::Io(_)
            | LoomError::Internal(_)) => {
                tracing::error!(error = %internal, "Internal error mapped to v1 response");
                ApiResponse::error(ErrorCode::InternalError, "An internal error occurred")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn success_response_serializes_without_error() {
        let resp = ApiResponse::success("hello");
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["data"], "hello");
        assert!(json.get("error").is_none());
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn error_response_serializes_without_data() {
        let resp = ApiResponse::<()>::error(ErrorCode::NotFound, "gone");
        let json = serde_json::to_value(&resp).expect("serialize");
        assert!(json.get("data").is_none());
        assert_eq!(json["error"]["code"], "not_found");
        assert_eq!(json["error"]["message"], "gone");
    }

    #[test]
    fn offset_meta_from_pagination() {
        let meta = ResponseMeta::from(Pagination::new(2, 10, 25));
        let json = serde_json::to_value(&meta).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "total": 25,
                "page": 2,
                "limit": 10,
                "totalPages": 3,
                "hasMore": true
            })
        );
    }

    #[test]
    fn cursor_meta_only_has_more() {
        let json = serde_json::to_value(ResponseMeta::has_more(false)).expect("serialize");
        assert_eq!(json, serde_json::json!({ "hasMore": false }));
    }

    #[test]
    fn error_code_status_mapping() {
        assert_eq!(ErrorCode::InvalidRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::StaleCache.status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::InternalError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_code_serializes_snake_case() {
        let json = serde_json::to_value(&ErrorCode::StaleCache).expect("serialize");
        assert_eq!(json, "stale_cache");
        assert_eq!(ErrorCode::InvalidRequest.to_string(), "invalid_request");
    }

    #[test]
    fn created_response_has_201_status() {
        let resp = ApiResponse::created("new-resource");
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[test]
    fn invalid_operation_maps_to_invalid_request() {
        let resp: ApiResponse<()> = LoomError::InvalidOperation("self merge".into()).into();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.error.as_ref().expect("error").code,
            ErrorCode::InvalidRequest
        );
    }

    #[test]
    fn transaction_error_does_not_leak() {
        let resp: ApiResponse<()> = LoomError::in_transaction(
            "merge",
            LoomError::Internal("secret debug info".into()),
        )
        .into();
        let err = resp.error.as_ref().expect("error");
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, "An internal error occurred");
    }
}
