//! A loopback stand-in for the WaterSync API.
//!
//! The mock answers a fixed script of responses in order and records every
//! request it receives so tests can assert on paths, queries, headers and
//! bodies.

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl Canned {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", "application/json".to_string())],
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub url: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or_default()
    }

    pub fn query(&self) -> Vec<(String, String)> {
        let url = reqwest::Url::parse(&format!("http://localhost{}", self.url))
            .expect("request target is a valid path");
        url.query_pairs().into_owned().collect()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

pub struct MockApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    handle: JoinHandle<()>,
}

impl MockApi {
    /// Serves `script` one response per incoming request, then stops.
    pub fn start(script: Vec<Canned>) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind loopback server");
        let addr = server.server_addr().to_ip().expect("ip listener");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        let handle = std::thread::spawn(move || {
            for canned in script {
                let Ok(mut request) = server.recv() else {
                    return;
                };
                let mut body = String::new();
                request.as_reader().read_to_string(&mut body).unwrap();
                let authorization = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Authorization"))
                    .map(|h| h.value.as_str().to_string());
                recorded.lock().unwrap().push(Recorded {
                    method: request.method().as_str().to_string(),
                    url: request.url().to_string(),
                    authorization,
                    body,
                });

                let mut response = tiny_http::Response::from_data(canned.body.into_bytes())
                    .with_status_code(tiny_http::StatusCode::from(canned.status));
                for (name, value) in &canned.headers {
                    response = response.with_header(
                        tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()).unwrap(),
                    );
                }
                request.respond(response).unwrap();
            }
        });

        Self {
            base_url: format!("http://{addr}/api"),
            requests,
            handle,
        }
    }

    /// Waits for the script to be served and returns what was received.
    pub fn finish(self) -> Vec<Recorded> {
        self.handle.join().expect("mock server thread");
        let requests = self.requests.lock().unwrap();
        requests.clone()
    }
}
