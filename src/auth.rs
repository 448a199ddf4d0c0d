//! HTTP Basic Authentication for the admin panel

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, Response, StatusCode},
    middleware::Next,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Username for the admin panel (None = auth disabled)
    pub username: Option<String>,
    /// Password for the admin panel
    pub password: Option<String>,
}

/// Non-blank, trimmed env value
fn credential_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AuthConfig {
    /// ADMIN_USERNAME and ADMIN_PASSWORD; auth is on only when both are set
    pub fn from_env() -> Self {
        match (credential_env("ADMIN_USERNAME"), credential_env("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => {
                tracing::info!("Admin authentication enabled");
                Self {
                    username: Some(username),
                    password: Some(password),
                }
            }
            (None, None) => {
                tracing::warn!("Admin authentication DISABLED - anyone can open the admin panel");
                Self::disabled()
            }
            _ => {
                tracing::warn!(
                    "Only one of ADMIN_USERNAME / ADMIN_PASSWORD is set; admin authentication DISABLED"
                );
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self {
            username: None,
            password: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Check a username/password pair; always true while auth is off
    pub fn validate(&self, username: &str, password: &str) -> bool {
        let (Some(expected_user), Some(expected_pass)) = (&self.username, &self.password) else {
            return true;
        };
        let user_ok = constant_time_eq(expected_user.as_bytes(), username.as_bytes());
        let pass_ok = constant_time_eq(expected_pass.as_bytes(), password.as_bytes());
        user_ok & pass_ok
    }

    /// Check a request's `Authorization: Basic ...` header
    fn authorizes(&self, request: &Request<Body>) -> bool {
        request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(basic_credentials)
            .is_some_and(|(username, password)| self.validate(&username, &password))
    }
}

/// Byte comparison whose timing does not depend on where the inputs differ
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Decode `Basic <base64(user:pass)>` into its parts
fn basic_credentials(header_value: &str) -> Option<(String, String)> {
    let encoded = header_value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn query_param_equals(request: &Request<Body>, key: &str, expected: &str) -> bool {
    request.uri().query().is_some_and(|query| {
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .any(|(k, v)| k == key && v == expected)
    })
}

fn unauthorized(realm: &str) -> Response<Body> {
    let mut response = Response::new(Body::from("Unauthorized"));
    *response.status_mut() = StatusCode::UNAUTHORIZED;
    if let Ok(value) = format!("Basic realm=\"{}\"", realm).parse() {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, value);
    }
    response
}

/// Middleware for HTTP Basic Authentication on admin routes
pub async fn admin_auth_middleware(
    State(auth_config): State<Arc<AuthConfig>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    if !auth_config.is_enabled() || auth_config.authorizes(&request) {
        return next.run(request).await;
    }
    unauthorized("Quest Venture Admin")
}

/// Middleware to require HTTP Basic Auth for admin WebSocket connections.
///
/// Without it anyone could connect to `/ws?role=admin` and drive the workspace.
pub async fn admin_ws_auth_middleware(
    State(auth_config): State<Arc<AuthConfig>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let is_admin_ws =
        request.uri().path() == "/ws" && query_param_equals(&request, "role", "admin");

    if !is_admin_ws {
        return next.run(request).await;
    }

    if !auth_config.is_enabled() {
        tracing::warn!(
            "Admin WebSocket requested but admin authentication is DISABLED; set ADMIN_USERNAME and ADMIN_PASSWORD"
        );
        return next.run(request).await;
    }

    if auth_config.authorizes(&request) {
        return next.run(request).await;
    }
    unauthorized("Quest Venture Admin (WebSocket)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn admin_secret() -> AuthConfig {
        AuthConfig {
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
        }
    }

    fn request(uri: &str, authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_role_query_detection() {
        let req = request("/ws?x=1&role=admin", None);
        assert!(query_param_equals(&req, "role", "admin"));
        assert!(!query_param_equals(&req, "role", "participant"));
        assert!(!query_param_equals(&request("/ws", None), "role", "admin"));
        assert!(!query_param_equals(&request("/ws?role", None), "role", "admin"));
    }

    #[test]
    fn test_disabled_accepts_anything() {
        let config = AuthConfig::disabled();
        assert!(!config.is_enabled());
        assert!(config.validate("whoever", "whatever"));

        let half = AuthConfig {
            username: Some("admin".to_string()),
            password: None,
        };
        assert!(!half.is_enabled());
    }

    #[test]
    fn test_enabled_checks_both_parts() {
        let config = admin_secret();
        assert!(config.is_enabled());
        assert!(config.validate("admin", "secret"));
        assert!(!config.validate("admin", "Secret"));
        assert!(!config.validate("root", "secret"));
        assert!(!config.validate("", ""));
    }

    #[test]
    fn test_basic_credentials() {
        // admin:secret
        assert_eq!(
            basic_credentials("Basic YWRtaW46c2VjcmV0"),
            Some(("admin".to_string(), "secret".to_string()))
        );
        // user:pa:ss keeps the colon in the password
        assert_eq!(
            basic_credentials("Basic dXNlcjpwYTpzcw=="),
            Some(("user".to_string(), "pa:ss".to_string()))
        );
        assert_eq!(basic_credentials("Bearer abc"), None);
        assert_eq!(basic_credentials("Basic !!!"), None);
    }

    #[test]
    fn test_authorizes_request() {
        let config = admin_secret();
        assert!(config.authorizes(&request("/admin", Some("Basic YWRtaW46c2VjcmV0"))));
        assert!(!config.authorizes(&request("/admin", Some("Basic dXNlcjpwYTpzcw=="))));
        assert!(!config.authorizes(&request("/admin", None)));
    }

    #[test]
    fn test_byte_comparison() {
        assert!(constant_time_eq(b"velitt", b"velitt"));
        assert!(!constant_time_eq(b"velitt", b"velitT"));
        assert!(!constant_time_eq(b"velitt", b"velit"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    #[serial]
    fn test_from_env_requires_both() {
        std::env::set_var("ADMIN_USERNAME", "admin");
        std::env::remove_var("ADMIN_PASSWORD");
        assert!(!AuthConfig::from_env().is_enabled());

        std::env::set_var("ADMIN_PASSWORD", " secret ");
        let config = AuthConfig::from_env();
        assert!(config.is_enabled());
        assert!(config.validate("admin", "secret"));

        std::env::set_var("ADMIN_USERNAME", "   ");
        assert!(!AuthConfig::from_env().is_enabled());

        std::env::remove_var("ADMIN_USERNAME");
        std::env::remove_var("ADMIN_PASSWORD");
    }
}
