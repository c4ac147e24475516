use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde_json::{Value, json};

use crate::config::service_name;

/// Build the `{ success, message, httpStatusCode, service, ... }` envelope.
/// Keys of `payload` (which must be a JSON object) are merged in at the top level.
pub fn envelope(status: StatusCode, message: &str, payload: Value) -> HttpResponse {
    let mut body = json!({
        "success": true,
        "message": message,
        "httpStatusCode": status.as_u16(),
        "service": service_name(),
    });

    if let (Some(body), Value::Object(extra)) = (body.as_object_mut(), payload) {
        body.extend(extra);
    }

    HttpResponse::build(status).json(body)
}

pub fn ok(message: &str, payload: Value) -> HttpResponse {
    envelope(StatusCode::OK, message, payload)
}

pub fn created(message: &str, payload: Value) -> HttpResponse {
    envelope(StatusCode::CREATED, message, payload)
}
