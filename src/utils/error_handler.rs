use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    import::ImportError,
    models::{ErrorResponse, GenericResponse},
    otp::OtpError,
};

#[derive(Debug)]
pub enum AppError {
    BadRequestErr(String),
    NotFound(String),
    Auth(String),
    Forbidden(String),
    Otp(OtpError),
    Import(ImportError),
    AnyError(anyhow::Error),
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self::AnyError(err.into())
    }
}

fn generic(status: StatusCode, msg: String) -> Response {
    let response = GenericResponse {
        success: false,
        message: msg,
    };
    (status, Json(response)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequestErr(msg) => {
                tracing::debug!("Bad request: {}", msg);
                generic(StatusCode::BAD_REQUEST, msg)
            }
            Self::NotFound(msg) => {
                tracing::debug!("Not Found: {}", msg);
                generic(StatusCode::NOT_FOUND, msg)
            }
            Self::Auth(msg) => {
                tracing::debug!("Unauthorized: {}", msg);
                generic(StatusCode::UNAUTHORIZED, msg)
            }
            Self::Forbidden(msg) => {
                tracing::debug!("Forbidden: {}", msg);
                generic(StatusCode::FORBIDDEN, msg)
            }
            Self::Otp(err) => {
                tracing::debug!("Otp verification failed: {:?}", err);
                let response = ErrorResponse {
                    success: false,
                    error: err.to_string(),
                };
                (StatusCode::BAD_REQUEST, Json(response)).into_response()
            }
            Self::Import(err) => {
                tracing::debug!("Import rejected: {}", err);
                generic(StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::AnyError(err) => {
                let msg = format!("Something went wrong: {err}");
                tracing::error!("{msg}");
                generic(StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        }
    }
}
