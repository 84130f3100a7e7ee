//! Client address extraction.

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, Extensions, HeaderMap},
};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

/// Placeholder used when no address can be determined.
pub const UNKNOWN_IP: &str = "unknown";

/// Parse an address and render it in canonical form.
///
/// IPv4-mapped IPv6 addresses collapse to plain IPv4 and IPv6 is
/// lowercased and compressed, so every spelling of one host compares equal.
pub fn canonical_ip(raw: &str) -> Option<String> {
    raw.trim()
        .parse::<IpAddr>()
        .ok()
        .map(|ip| ip.to_canonical().to_string())
}

/// Resolve the client address.
///
/// Order: first hop of `X-Forwarded-For`, then `X-Real-IP`, then the
/// socket address. Header values that are not addresses are skipped.
pub fn client_ip(headers: &HeaderMap, extensions: &Extensions) -> String {
    if let Some(ip) = headers
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(canonical_ip)
    {
        return ip;
    }

    if let Some(ip) = headers
        .get("X-Real-IP")
        .and_then(|v| v.to_str().ok())
        .and_then(canonical_ip)
    {
        return ip;
    }

    if let Some(ConnectInfo(addr)) = extensions.get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_canonical().to_string();
    }

    UNKNOWN_IP.to_string()
}

/// Extractor for the client address.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(client_ip(&parts.headers, &parts.extensions)))
    }
}
