//! Client IP extraction for click events.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Returns the client IP for a request.
///
/// With `behind_proxy`, the first entry of `X-Forwarded-For` wins, then
/// `X-Real-IP`; otherwise, and as a fallback, the socket peer address.
/// Header values are taken as sent, without validation.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let real_ip = || {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        if let Some(ip) = forwarded.or_else(real_ip) {
            return ip.to_string();
        }
    }

    peer.ip().to_string()
}
