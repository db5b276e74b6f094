use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gemini_gateway::GatewayError;
use tactician_core::advisor::AdvisorError;
use tactician_core::TacticianError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 404 Not Found errors
// ---------------------------------------------------------------------------

/// Private sentinel error type used to carry an explicit HTTP 404 through
/// the `anyhow::Error` chain without touching the `TacticianError` enum.
#[derive(Debug)]
struct NotFoundError(String);

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotFoundError {}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(TacticianError::MissingField(msg.into()).into())
    }

    /// Construct a 404 Not Found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(NotFoundError(msg.into()).into())
    }
}

fn advisor_status(e: &AdvisorError) -> StatusCode {
    match e {
        AdvisorError::NothingDetected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AdvisorError::EmptyReply | AdvisorError::MalformedReply(_) | AdvisorError::NotAnArray => {
            StatusCode::BAD_GATEWAY
        }
    }
}

fn tactician_status(e: &TacticianError) -> StatusCode {
    match e {
        TacticianError::NotInitialized => StatusCode::BAD_REQUEST,
        TacticianError::TacticNotFound(_) | TacticianError::MatchNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        TacticianError::DuplicateTactic(_) => StatusCode::CONFLICT,
        TacticianError::InvalidTacticFile(_)
        | TacticianError::InvalidMatchFile(_)
        | TacticianError::MissingField(_)
        | TacticianError::InvalidSquad(_)
        | TacticianError::InvalidEdit(_)
        | TacticianError::InvalidImage(_)
        | TacticianError::UnknownTheme(_) => StatusCode::BAD_REQUEST,
        TacticianError::NotEnoughMatches { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        TacticianError::ConfirmationRequired(_) => StatusCode::PRECONDITION_REQUIRED,
        TacticianError::QuotaExceeded { .. } => StatusCode::INSUFFICIENT_STORAGE,
        TacticianError::Advisor(a) => advisor_status(a),
        TacticianError::Io(_) | TacticianError::Yaml(_) | TacticianError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(n) = self.0.downcast_ref::<NotFoundError>() {
            let body = serde_json::json!({ "error": n.0.clone() });
            return (StatusCode::NOT_FOUND, axum::Json(body)).into_response();
        } else if let Some(e) = self.0.downcast_ref::<TacticianError>() {
            tactician_status(e)
        } else if let Some(e) = self.0.downcast_ref::<AdvisorError>() {
            advisor_status(e)
        } else if let Some(e) = self.0.downcast_ref::<GatewayError>() {
            match e {
                GatewayError::MissingApiKey(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::warn!(%status, error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
