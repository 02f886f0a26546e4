//! Caller identity. Authentication happens upstream (a gateway or an auth
//! layer); this service only consumes the id it asserts.

use axum::http::request::Parts;
use axum::http::HeaderName;
use uuid::Uuid;

const FALLBACK_HEADER: &str = "x-user-id";

/// Yields the trusted caller id for a request, if one was asserted.
pub trait IdentitySource: Send + Sync {
    fn caller_id(&self, parts: &Parts) -> Option<Uuid>;
}

/// Trusts a UUID in a fixed request header set by the fronting gateway.
pub struct TrustedHeaderIdentity {
    header: HeaderName,
}

impl TrustedHeaderIdentity {
    pub fn new(header: &str) -> Self {
        let header = HeaderName::try_from(header).unwrap_or_else(|e| {
            tracing::warn!("Invalid caller id header '{}' ({}), using {}", header, e, FALLBACK_HEADER);
            HeaderName::from_static(FALLBACK_HEADER)
        });

        Self { header }
    }
}

impl IdentitySource for TrustedHeaderIdentity {
    fn caller_id(&self, parts: &Parts) -> Option<Uuid> {
        let value = parts.headers.get(&self.header)?.to_str().ok()?;
        Uuid::parse_str(value.trim()).ok()
    }
}
