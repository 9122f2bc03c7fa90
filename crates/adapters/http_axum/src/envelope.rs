//! Success response shape shared by every endpoint.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// `{ "message": ..., "data": ... }`, with absent fields omitted.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Possible successful responses.
pub enum Reply<T> {
    Ok(Envelope<T>),
    Created(Envelope<T>),
    NoContent,
}

impl<T> Reply<T> {
    pub fn data(data: T) -> Self {
        Self::Ok(Envelope {
            message: None,
            data: Some(data),
        })
    }

    pub fn created(message: &'static str, data: T) -> Self {
        Self::Created(Envelope {
            message: Some(message),
            data: Some(data),
        })
    }

    pub fn with_message(message: &'static str, data: T) -> Self {
        Self::Ok(Envelope {
            message: Some(message),
            data: Some(data),
        })
    }
}

impl Reply<()> {
    pub fn message(message: &'static str) -> Self {
        Self::Ok(Envelope {
            message: Some(message),
            data: None,
        })
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(body) => Json(body).into_response(),
            Self::Created(body) => (StatusCode::CREATED, Json(body)).into_response(),
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}
