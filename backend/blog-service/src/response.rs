/// Uniform JSON response envelope
///
/// `{ "success": bool, "statusCode": u16, "data": T | null, "message": string }`
use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub status_code: u16,
    pub data: Option<T>,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            success: status.is_success(),
            status_code: status.as_u16(),
            data: Some(data),
            message: message.into(),
        }
    }

    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: status.as_u16(),
            data: None,
            message: message.into(),
        }
    }
}

/// 200 OK with `data`
pub fn ok<T: Serialize>(data: T, message: &str) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::new(StatusCode::OK, data, message))
}

/// 201 Created with `data`
pub fn created<T: Serialize>(data: T, message: &str) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse::new(StatusCode::CREATED, data, message))
}
