//! Maps a core [`ErrorKind`] to the HTTP response every handler returns
//! on failure, using the status codes the kind itself already knows
//! (spec §7's propagation policy).

use actix_web::HttpResponse;

use crate::error::ErrorKind;

pub fn err_response(err: ErrorKind) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err.status_code() {
        400 => HttpResponse::BadRequest().json(body),
        401 => HttpResponse::Unauthorized().json(body),
        403 => HttpResponse::Forbidden().json(body),
        404 => HttpResponse::NotFound().json(body),
        409 => HttpResponse::Conflict().json(body),
        422 => HttpResponse::UnprocessableEntity().json(body),
        503 => HttpResponse::ServiceUnavailable().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}
