use crate::config::PaginationConfig;
use crate::errors::ServiceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::Validate;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input
        .validate()
        .map_err(|e| ServiceError::ValidationError(format!("Validation failed: {}", e)))
}

/// Pagination parameters for list operations
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    /// Falls back to the configured default page size when omitted
    pub per_page: Option<u64>,
}

fn default_page() -> u64 {
    1
}

impl PaginationParams {
    /// Clamps to the configured window so a single request cannot pull a
    /// whole table.
    pub fn clamped(&self, limits: &PaginationConfig) -> (u64, u64) {
        let per_page = self
            .per_page
            .unwrap_or(limits.default_per_page)
            .clamp(1, limits.max_per_page);
        (self.page.max(1), per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_first_page_of_twenty() {
        let params = PaginationParams::default();
        assert_eq!(params.clamped(&PaginationConfig::default()), (1, 20));
    }

    #[test]
    fn failed_input_validation_is_a_service_validation_error() {
        #[derive(Validate)]
        struct NamedInput {
            #[validate(length(min = 1))]
            name: String,
        }

        // must yield the handlers' error type directly so `?` propagates it
        fn check(input: &NamedInput) -> Result<(), ServiceError> {
            validate_input(input)?;
            Ok(())
        }

        let err = check(&NamedInput {
            name: String::new(),
        })
        .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn clamping_bounds_page_and_per_page() {
        let params = PaginationParams {
            page: 0,
            per_page: Some(100_000),
        };
        assert_eq!(params.clamped(&PaginationConfig::default()), (1, 100));
    }

    #[test]
    fn configured_limits_drive_the_clamp() {
        let limits = PaginationConfig {
            default_per_page: 5,
            max_per_page: 25,
        };
        let params = PaginationParams {
            page: 2,
            per_page: None,
        };
        assert_eq!(params.clamped(&limits), (2, 5));

        let params = PaginationParams {
            page: 2,
            per_page: Some(80),
        };
        assert_eq!(params.clamped(&limits), (2, 25));
    }
}
