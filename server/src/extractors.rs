use async_trait::async_trait;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use std::convert::Infallible;
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::error::AppError;

/// `Json` whose rejections render through `AppError` as validation errors.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// The trusted id of the calling user.
///
/// An upstream layer may attach a `CallerId` to the request extensions;
/// otherwise the state's `IdentitySource` is asked. Missing identity is a 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for CallerId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(caller) = parts.extensions.get::<CallerId>() {
            return Ok(*caller);
        }

        state
            .identity
            .caller_id(parts)
            .map(CallerId)
            .ok_or_else(|| AppError::AuthError("Caller identity required".to_string()))
    }
}

/// `scheme://host` the client used to reach us, for building absolute
/// URLs to uploaded files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicOrigin(pub String);

impl PublicOrigin {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl FromRequestParts<AppState> for PublicOrigin {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let scheme = first_value(&parts.headers, "x-forwarded-proto").unwrap_or("http");
        let host = first_value(&parts.headers, "x-forwarded-host")
            .or_else(|| first_value(&parts.headers, header::HOST.as_str()))
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| format!("localhost:{}", state.config.port));

        Ok(Self(format!("{scheme}://{host}")))
    }
}

fn first_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
