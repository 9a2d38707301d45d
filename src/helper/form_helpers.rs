use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use url::form_urlencoded;

/// Parses URL-encoded form data from bytes, rejecting bodies that are not UTF-8.
pub fn parse_form(form_bytes: &web::Bytes) -> Result<HashMap<String, String>, HttpResponse> {
    let body = std::str::from_utf8(form_bytes)
        .map_err(|_| HttpResponse::BadRequest().body("Invalid UTF-8 in request body."))?;
    Ok(form_urlencoded::parse(body.as_bytes()).into_owned().collect())
}

/// A trimmed, non-empty form field.
pub fn form_field(form: &HashMap<String, String>, name: &str) -> Option<String> {
    form.get(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
