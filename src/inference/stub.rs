//! In-process stand-in for a hosted model endpoint, used by the client tests.

use actix_web::{http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

pub struct StubEndpoint {
    pub url: String,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl StubEndpoint {
    /// Starts a server on an ephemeral port answering every request with
    /// `status`, `content_type` and `body`. Must run inside an actix runtime.
    pub fn start(status: u16, content_type: &'static str, body: Vec<u8>) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = received.clone();
        let status = StatusCode::from_u16(status).unwrap();

        let server = HttpServer::new(move || {
            let log = log.clone();
            let body = body.clone();
            App::new().default_service(web::to(move |req: HttpRequest, payload: web::Bytes| {
                let log = log.clone();
                let body = body.clone();
                async move {
                    log.lock().unwrap().push(ReceivedRequest {
                        authorization: req
                            .headers()
                            .get("authorization")
                            .and_then(|value| value.to_str().ok())
                            .map(String::from),
                        body: serde_json::from_slice(&payload).unwrap_or(serde_json::Value::Null),
                    });
                    HttpResponse::build(status)
                        .content_type(content_type)
                        .body(body)
                }
            }))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        Self {
            url: format!("http://{}/models/stub", addr),
            received,
        }
    }

    pub fn requests(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }
}

/// A URL nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/models/gone", addr)
}
