//! Scheme and host detection for the shareable secret URL.
//!
//! Display-only: nothing here affects how secrets are stored.

use axum::http::{HeaderMap, Uri};
use axum_extra::headers::{HeaderMapExt, Host};

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Work out whether the client reached us over HTTPS.
///
/// A request URI that already carries `https` wins. Otherwise the first
/// `X-Forwarded-Proto` value is used, but only when the proxy is trusted.
pub fn request_scheme(headers: &HeaderMap, uri: &Uri, trust_forwarded_proto: bool) -> &'static str {
    if uri.scheme_str() == Some("https") {
        return "https";
    }

    if trust_forwarded_proto {
        let forwarded = headers
            .get(X_FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim);
        if forwarded.is_some_and(|proto| proto.eq_ignore_ascii_case("https")) {
            return "https";
        }
    }

    "http"
}

/// Host as the client addressed it, falling back to the URI authority and
/// then to `fallback`.
pub fn request_host(headers: &HeaderMap, uri: &Uri, fallback: &str) -> String {
    if let Some(host) = headers.typed_get::<Host>() {
        return host.to_string();
    }
    uri.authority()
        .map(|a| a.to_string())
        .unwrap_or_else(|| fallback.to_string())
}

/// Build `<scheme>://<host>/secret/<token>`.
pub fn secret_url(scheme: &str, host: &str, token: &str) -> String {
    format!("{}://{}/secret/{}", scheme, host, token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn test_plain_request_is_http() {
        let uri: Uri = "/api/secret".parse().unwrap();
        assert_eq!(request_scheme(&HeaderMap::new(), &uri, true), "http");
    }

    #[test]
    fn test_https_uri_is_https() {
        let uri: Uri = "https://example.com/api/secret".parse().unwrap();
        assert_eq!(request_scheme(&HeaderMap::new(), &uri, false), "https");
    }

    #[test]
    fn test_forwarded_proto() {
        let uri: Uri = "/api/secret".parse().unwrap();
        assert_eq!(
            request_scheme(&headers(&[("x-forwarded-proto", "https")]), &uri, true),
            "https"
        );
        assert_eq!(
            request_scheme(&headers(&[("x-forwarded-proto", "HTTPS, http")]), &uri, true),
            "https"
        );
        assert_eq!(
            request_scheme(&headers(&[("x-forwarded-proto", "http, https")]), &uri, true),
            "http"
        );
    }

    #[test]
    fn test_forwarded_proto_ignored_when_untrusted() {
        let uri: Uri = "/api/secret".parse().unwrap();
        assert_eq!(
            request_scheme(&headers(&[("x-forwarded-proto", "https")]), &uri, false),
            "http"
        );
    }

    #[test]
    fn test_request_host() {
        let uri: Uri = "/api/secret".parse().unwrap();
        assert_eq!(
            request_host(&headers(&[("host", "secrets.example.com:8443")]), &uri, "0.0.0.0:8080"),
            "secrets.example.com:8443"
        );
        assert_eq!(request_host(&HeaderMap::new(), &uri, "0.0.0.0:8080"), "0.0.0.0:8080");

        let absolute: Uri = "http://proxy.local/api/secret".parse().unwrap();
        assert_eq!(request_host(&HeaderMap::new(), &absolute, "0.0.0.0:8080"), "proxy.local");
    }

    #[test]
    fn test_secret_url() {
        assert_eq!(
            secret_url("https", "example.com", "abc123"),
            "https://example.com/secret/abc123"
        );
    }
}
