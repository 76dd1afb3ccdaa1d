use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::models::normalize_email;
use crate::routes::error::ApiError;

/// Header naming the student a request is made on behalf of
pub const REQUESTER_HEADER: &str = "X-User-Email";

/// Request-scoped identity of the calling student
///
/// Extracted from [`REQUESTER_HEADER`], trimmed and lower-cased. There is no
/// password check; the email alone identifies the student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester(String);

impl Requester {
    pub fn email(&self) -> &str {
        &self.0
    }
}

impl FromRequest for Requester {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let requester = req
            .headers()
            .get(REQUESTER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(normalize_email)
            .filter(|email| !email.is_empty())
            .map(Requester)
            .ok_or(ApiError::MissingRequester);

        ready(requester)
    }
}
