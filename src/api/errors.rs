use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use crate::errors::CtemError;

/// A [`CtemError`] plus whether the caller asked for the variant trace.
#[derive(Debug)]
pub struct ApiError {
    pub error: CtemError,
    pub diagnostic: bool,
}

impl ApiError {
    pub fn new(error: CtemError, diagnostic: bool) -> Self {
        Self { error, diagnostic }
    }
}

impl From<CtemError> for ApiError {
    fn from(error: CtemError) -> Self {
        Self::new(error, false)
    }
}

fn status_for(error: &CtemError) -> StatusCode {
    match error {
        CtemError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        CtemError::Auth(_)
        | CtemError::Transport(_)
        | CtemError::Timeout(_)
        | CtemError::Schema(_)
        | CtemError::AdapterExhausted { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = status_for(&self.error);
        let mut body = json!({
            "error": self.error.to_string(),
            "error_type": self.error.classify().error_type,
        });
        if self.diagnostic {
            body["_diagnostic"] = json!(true);
            if let Some(tried) = self.error.tried() {
                body["tried"] = json!(tried);
            }
        }

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for CtemError {
    fn into_response(self) -> axum::response::Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::VariantAttempt;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&CtemError::InvalidRequest("op_id required".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&CtemError::Auth("mint".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(&CtemError::Config("missing url".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_exhausted_error_response_status() {
        let last = CtemError::Schema("Cannot query field".into());
        let err = CtemError::AdapterExhausted {
            operation: "hosts_page".into(),
            tried: vec![VariantAttempt::failed("v1_hosts_page", &last)],
            last: Box::new(last),
        };
        let response = ApiError::new(err, true).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
