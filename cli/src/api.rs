// Client side of the contact API
//
// `folio submit` and `folio status` talk to a running `folio serve` over
// HTTP instead of touching the store, which only lives inside the server
// process.

use anyhow::{Context, Result};
use folio_core::{Acknowledgment, NewContactMessage};
use hyper::{Body, Method, Request, Uri};

pub const CONTACT_PATH: &str = "/api/contact";

/// Base URL of a server running locally with the given port.
pub fn local_server_url(port: u16) -> String {
    format!("http://127.0.0.1:{}", port)
}

// Check if a server is accepting connections
pub async fn is_api_available(server: &str) -> bool {
    let Some((host, port)) = server_endpoint(server) else {
        return false;
    };

    tokio::net::TcpStream::connect((host.as_str(), port)).await.is_ok()
}

/// Host and port to dial for `server`, using the scheme's default port.
fn server_endpoint(server: &str) -> Option<(String, u16)> {
    let uri = server.parse::<Uri>().ok()?;
    let host = uri.host()?.to_string();
    let port = match (uri.port_u16(), uri.scheme_str()) {
        (Some(port), _) => port,
        (None, Some("https")) => 443,
        (None, _) => 80,
    };
    Some((host, port))
}

/// Post a contact form and return the server's acknowledgment.
///
/// Failure acknowledgments are returned as `Ok`; only transport problems and
/// unparseable responses are errors.
pub async fn submit_contact_via_api(
    server: &str,
    payload: &NewContactMessage,
) -> Result<Acknowledgment> {
    let client = hyper::Client::new();

    let json = serde_json::to_string(payload)?;
    let req = Request::builder()
        .method(Method::POST)
        .uri(format!("{}{}", server.trim_end_matches('/'), CONTACT_PATH))
        .header("content-type", "application/json")
        .body(Body::from(json))?;

    let resp = client
        .request(req)
        .await
        .with_context(|| format!("Failed to reach {}", server))?;

    let status = resp.status();
    let body_bytes = hyper::body::to_bytes(resp.into_body()).await?;

    match serde_json::from_slice::<Acknowledgment>(&body_bytes) {
        Ok(ack) => Ok(ack),
        Err(_) => {
            let body = String::from_utf8_lossy(&body_bytes);
            anyhow::bail!("Unexpected response with status {}: {}", status, body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::service::{make_service_fn, service_fn};
    use hyper::{Response, Server, StatusCode};
    use std::convert::Infallible;
    use std::net::SocketAddr;

    // Serves a fixed status and body for every request
    async fn spawn_fixed_server(status: StatusCode, body: &'static str) -> SocketAddr {
        let make_svc = make_service_fn(move |_conn| async move {
            Ok::<_, Infallible>(service_fn(move |req: Request<Body>| async move {
                assert_eq!(req.uri().path(), CONTACT_PATH);
                Ok::<_, Infallible>(
                    Response::builder()
                        .status(status)
                        .header("content-type", "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
            }))
        });

        let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_svc);
        let addr = server.local_addr();
        tokio::spawn(server);
        addr
    }

    fn payload() -> NewContactMessage {
        NewContactMessage::new("Ana", "ana@x.com", "Hi")
    }

    #[tokio::test]
    async fn test_submit_accepted() {
        let body = r#"{"success":true,"message":"Message sent successfully. We'll get back to you soon!"}"#;
        let addr = spawn_fixed_server(StatusCode::CREATED, body).await;

        let ack = submit_contact_via_api(&local_server_url(addr.port()), &payload())
            .await
            .unwrap();
        assert_eq!(ack, Acknowledgment::accepted());
    }

    #[tokio::test]
    async fn test_submit_failure_ack_is_ok() {
        let body = r#"{"success":false,"error":"Failed to send message. Please try again later."}"#;
        let addr = spawn_fixed_server(StatusCode::INTERNAL_SERVER_ERROR, body).await;

        let ack = submit_contact_via_api(&local_server_url(addr.port()), &payload())
            .await
            .unwrap();
        assert_eq!(ack, Acknowledgment::failed());
    }

    #[tokio::test]
    async fn test_submit_garbage_response_is_error() {
        let addr = spawn_fixed_server(StatusCode::BAD_GATEWAY, "upstream down").await;

        let err = submit_contact_via_api(&local_server_url(addr.port()), &payload())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_server_endpoint_default_ports() {
        assert_eq!(
            server_endpoint("https://folio.example.com"),
            Some(("folio.example.com".to_string(), 443))
        );
        assert_eq!(
            server_endpoint("http://folio.example.com"),
            Some(("folio.example.com".to_string(), 80))
        );
        assert_eq!(
            server_endpoint("https://127.0.0.1:8443"),
            Some(("127.0.0.1".to_string(), 8443))
        );
        assert_eq!(server_endpoint("/api/contact"), None);
    }

    #[tokio::test]
    async fn test_availability() {
        let addr = spawn_fixed_server(StatusCode::OK, "{}").await;
        assert!(is_api_available(&local_server_url(addr.port())).await);
        assert!(!is_api_available("not a url").await);
    }
}
