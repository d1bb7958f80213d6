//! Blocking HTTP listener for the score API

use std::io::Read;

use thiserror::Error;

use super::routes::{self, Method};
use super::store::UserStore;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

fn method_of(method: &tiny_http::Method) -> Method {
    match method {
        tiny_http::Method::Get => Method::Get,
        tiny_http::Method::Post => Method::Post,
        tiny_http::Method::Put => Method::Put,
        _ => Method::Other,
    }
}

/// Bind `addr` and answer requests one at a time until the process exits
pub fn serve<S: UserStore>(addr: &str, store: &mut S) -> Result<(), ServerError> {
    let server = tiny_http::Server::http(addr).map_err(|source| ServerError::Bind {
        addr: addr.to_string(),
        source,
    })?;
    log::info!("Score API listening on http://{}", addr);

    for mut request in server.incoming_requests() {
        let method = method_of(request.method());
        let target = request.url().to_string();

        let mut body = String::new();
        let response = match request.as_reader().read_to_string(&mut body) {
            Ok(_) => routes::handle(store, method, &target, &body),
            Err(e) => routes::ApiError::Validation {
                message: "Unreadable request body".to_string(),
                details: Some(e.to_string()),
            }
            .into_response(),
        };
        log::debug!("{:?} {} -> {}", method, target, response.status);

        let mut reply = tiny_http::Response::from_string(response.body.to_string())
            .with_status_code(response.status);
        if let Ok(header) = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
            reply = reply.with_header(header);
        }
        if let Err(e) = request.respond(reply) {
            log::warn!("Failed to send response: {}", e);
        }
    }

    Ok(())
}
