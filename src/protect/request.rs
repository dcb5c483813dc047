use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, Request};
use axum::http::{header, HeaderMap};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Headers never forwarded to the decision service
const REDACTED_HEADERS: [&str; 3] = ["authorization", "cookie", "set-cookie"];

/// What the decision service gets to see about one request
#[derive(Debug, Clone, Serialize)]
pub struct RequestDetails {
    pub id: Uuid,
    pub ip: Option<IpAddr>,
    pub method: String,
    pub host: Option<String>,
    pub path: String,
    pub user_agent: Option<String>,
    pub headers: BTreeMap<String, String>,
}

impl RequestDetails {
    pub fn from_request(request: &Request) -> Self {
        let headers = request.headers();
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        Self {
            id: Uuid::new_v4(),
            ip: peer.or_else(|| forwarded_for(headers)),
            method: request.method().to_string(),
            host: header_str(headers, header::HOST.as_str()),
            path: request.uri().path().to_string(),
            user_agent: header_str(headers, header::USER_AGENT.as_str()),
            headers: headers
                .iter()
                .filter(|(name, _)| !REDACTED_HEADERS.contains(&name.as_str()))
                .filter_map(|(name, value)| {
                    value.to_str().ok().map(|v| (name.to_string(), v.to_string()))
                })
                .collect(),
        }
    }

    /// SHA-256 over the configured characteristics, hex encoded.
    /// Unknown characteristics contribute nothing.
    pub fn fingerprint(&self, characteristics: &[String]) -> String {
        let mut hasher = Sha256::new();
        for characteristic in characteristics {
            let value = match characteristic.as_str() {
                "ip.src" => self.ip.map(|ip| ip.to_string()),
                "http.host" => self.host.clone(),
                "http.method" => Some(self.method.clone()),
                "http.path" => Some(self.path.clone()),
                other => {
                    tracing::debug!("ignoring unknown characteristic: {}", other);
                    None
                }
            };
            if let Some(value) = value {
                hasher.update(characteristic.as_bytes());
                hasher.update(b"=");
                hasher.update(value.as_bytes());
                hasher.update(b";");
            }
        }
        format!("{:x}", hasher.finalize())
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|ip| ip.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request() -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/api/products?x=1")
            .header("host", "shop.local")
            .header("user-agent", "curl/8.0")
            .header("cookie", "session=abc")
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn collects_request_details() {
        let details = RequestDetails::from_request(&request());
        assert_eq!(details.method, "POST");
        assert_eq!(details.path, "/api/products");
        assert_eq!(details.host.as_deref(), Some("shop.local"));
        assert_eq!(details.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(details.ip, Some("203.0.113.7".parse().unwrap()));
        assert!(!details.headers.contains_key("cookie"));
    }

    #[test]
    fn peer_address_takes_precedence() {
        let mut req = request();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        let details = RequestDetails::from_request(&req);
        assert_eq!(details.ip, Some("127.0.0.1".parse().unwrap()));
    }

    #[test]
    fn fingerprint_depends_only_on_characteristics() {
        let a = RequestDetails::from_request(&request());
        let mut b = a.clone();
        b.path = "/other".to_string();
        let chars = vec!["ip.src".to_string()];
        assert_eq!(a.fingerprint(&chars), b.fingerprint(&chars));
        assert_eq!(a.fingerprint(&chars).len(), 64);

        b.ip = Some("198.51.100.1".parse().unwrap());
        assert_ne!(a.fingerprint(&chars), b.fingerprint(&chars));
    }
}
