//! Response envelope shared by every endpoint.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// The `{code, msg, data}` body returned by every API route.
///
/// `code` always equals the HTTP status of the response.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub code: u16,
    pub msg: String,
    pub data: Option<T>,
}

/// Successful API response carrying `data`.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    msg: String,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 response with the default message.
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            msg: "success".to_string(),
            data,
        }
    }

    /// 200 response with a custom message.
    pub fn with_msg(data: T, msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            msg: msg.into(),
            data,
        }
    }

    /// Response with data under a non-200 status.
    pub fn with_status(status: StatusCode, data: T, msg: impl Into<String>) -> Self {
        Self {
            status,
            msg: msg.into(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            code: self.status.as_u16(),
            msg: self.msg,
            data: Some(self.data),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Envelope with no data, used for errors.
pub(crate) fn empty_envelope(status: StatusCode, msg: String) -> Response {
    let body: Envelope<()> = Envelope {
        code: status.as_u16(),
        msg,
        data: None,
    };
    (status, Json(body)).into_response()
}
