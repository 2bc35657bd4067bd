use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};

use crate::config::Config;
use crate::error::AppError;

/// Proof that the request carried `Authorization: Bearer <ADMIN_TOKEN>`.
///
/// Add it as a handler argument to guard an endpoint. When no admin token is
/// configured every request is rejected.
#[derive(Debug, Clone, Copy)]
pub struct AdminToken;

impl FromRequest for AdminToken {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(check_admin_token(req))
    }
}

fn check_admin_token(req: &HttpRequest) -> Result<AdminToken, AppError> {
    let expected = req
        .app_data::<Data<Config>>()
        .and_then(|config| config.admin_token.clone())
        .ok_or_else(|| AppError::Unauthorized("no admin token".to_string()))?;

    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("no token header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("invalid token header".to_string()))?;

    if token.trim() != expected {
        return Err(AppError::Unauthorized("invalid token".to_string()));
    }

    Ok(AdminToken)
}
