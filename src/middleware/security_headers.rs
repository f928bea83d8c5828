//! Security-related response headers, applied to every response
//! (API JSON and locally served uploads alike).

use axum::Router;
use axum::http::header::{HeaderName, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

fn if_not_present(name: &'static str, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    )
}

/// Apply common security headers to all responses.
pub fn apply<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        // Clickjacking protection (legacy + modern)
        .layer(if_not_present("x-frame-options", "DENY"))
        .layer(if_not_present(
            "content-security-policy",
            "frame-ancestors 'none'",
        ))
        // Uploaded files must not be sniffed into HTML
        .layer(if_not_present("x-content-type-options", "nosniff"))
        .layer(if_not_present("referrer-policy", "no-referrer"))
        .layer(if_not_present(
            "permissions-policy",
            "camera=(), microphone=(), geolocation=()",
        ))
}
