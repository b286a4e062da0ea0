//! Mock REST backend served by tiny_http on an ephemeral port.

#![allow(dead_code)]

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use netdeck::HttpRepository;
use reqwest::Url;
use tiny_http::{Header, Response, Server};

/// A request as the mock backend received it.
#[derive(Debug, Clone, PartialEq)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub body: String,
}

pub struct MockBackend {
    pub base_url: Url,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl MockBackend {
    /// Serves every request with `handler(method, path, body) -> (status, body)`.
    pub fn start<F>(handler: F) -> MockBackend
    where
        F: Fn(&str, &str, &str) -> (u16, String) + Send + 'static,
    {
        let server = Server::http("127.0.0.1:0").expect("bind mock backend");
        let addr = server.server_addr().to_ip().expect("tcp listener");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();

        thread::spawn(move || {
            for mut request in server.incoming_requests() {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let method = request.method().to_string().to_uppercase();
                let path = request.url().to_owned();
                let (status, reply) = handler(&method, &path, &body);
                log.lock().unwrap().push(Seen { method, path, body });

                let response = Response::from_string(reply)
                    .with_status_code(status)
                    .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
                let _ = request.respond(response);
            }
        });

        MockBackend { base_url: Url::parse(&format!("http://{addr}")).unwrap(), seen }
    }

    pub fn repository(&self) -> HttpRepository {
        HttpRepository::new(self.base_url.clone()).unwrap()
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

/// Base URL on which nothing is listening.
pub fn refused_url() -> Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}")).unwrap()
}
