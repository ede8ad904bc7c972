//! Response helpers shared by the page handlers.
//!
//! Pages answer with a JSON template context on success and `302 Found` after
//! a successful form submission.

use actix_web::HttpResponse;
use actix_web::http::header;
use serde::Serialize;

/// `200 OK` with `context` as the JSON body.
pub fn render<T: Serialize>(context: &T) -> HttpResponse {
    HttpResponse::Ok().json(context)
}

/// `302 Found` to `location`.
pub fn redirect(location: impl Into<String>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.into()))
        .finish()
}
