// HTTP mapping for the core error taxonomy

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use evento_contracts::ErrorBody;
use evento_core::EventoError;

/// Wrapper so core errors can be returned straight out of handlers with `?`
pub struct ApiError(pub EventoError);

impl From<EventoError> for ApiError {
    fn from(err: EventoError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            EventoError::EventNotFound(_)
            | EventoError::StudentNotFound(_)
            | EventoError::CoordinatorNotFound(_)
            | EventoError::NotificationNotFound(_) => StatusCode::NOT_FOUND,
            EventoError::Conflict(_) => StatusCode::CONFLICT,
            EventoError::NotAuthorized(_) => StatusCode::FORBIDDEN,
            EventoError::Validation(_) => StatusCode::BAD_REQUEST,
            EventoError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = ErrorBody {
            error: self.0.code().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evento_core::Conflict;
    use uuid::Uuid;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            ApiError(EventoError::EventNotFound(Uuid::nil())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(Conflict::AlreadyRegistered.into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError(EventoError::not_authorized("nope")).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError(EventoError::validation("bad rating")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(EventoError::internal("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
