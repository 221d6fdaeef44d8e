//! In-process Paratranz API stand-in serving canned JSON responses.
//!
//! Shared by the client and CLI integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::thread;

use tiny_http::{Header, Request, Response, Server};

type Routes = Arc<Mutex<HashMap<String, VecDeque<(u16, String)>>>>;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub authorization: Option<String>,
}

pub struct MockServer {
    pub base_url: String,
    routes: Routes,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {
    pub fn start() -> Self {
        let server = Server::http("127.0.0.1:0").expect("bind mock server");
        let port = server
            .server_addr()
            .to_ip()
            .map(|a| a.port())
            .expect("mock server listens on an IP address");
        let routes: Routes = Arc::default();
        let requests: Arc<Mutex<Vec<Recorded>>> = Arc::default();

        let (r, q) = (routes.clone(), requests.clone());
        thread::spawn(move || {
            for request in server.incoming_requests() {
                respond(request, &r, &q);
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{port}/api"),
            routes,
            requests,
        }
    }

    /// Queue responses for `path` (relative to `/api`). The last response
    /// repeats once the queue is drained.
    pub fn route(&self, path: &str, responses: &[(u16, &str)]) -> &Self {
        self.routes.lock().unwrap().insert(
            format!("/api{path}"),
            responses.iter().map(|(s, b)| (*s, b.to_string())).collect(),
        );
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self, path: &str) -> usize {
        let full = format!("/api{path}");
        self.requests().iter().filter(|r| r.path == full).count()
    }
}

fn respond(request: Request, routes: &Routes, requests: &Mutex<Vec<Recorded>>) {
    let path = request.url().to_string();
    let authorization = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Authorization"))
        .map(|h| h.value.to_string());
    requests.lock().unwrap().push(Recorded {
        path: path.clone(),
        authorization,
    });

    let (status, body) = {
        let mut routes = routes.lock().unwrap();
        match routes.get_mut(&path) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap(),
            None => (404, r#"{"message":"not found"}"#.to_string()),
        }
    };
    let response = Response::from_string(body)
        .with_status_code(status)
        .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
    let _ = request.respond(response);
}
