//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed bodies by path. Unknown paths get 404. Optionally answers the
//! first N requests with 503 to exercise the retry policy.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

pub struct JsonServer {
    /// Base URL without trailing slash, e.g. `http://127.0.0.1:12345/v2`.
    pub base_url: String,
    routes: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    hits: Arc<AtomicUsize>,
}

impl JsonServer {
    pub fn start(routes: &[(&str, &str)]) -> Self {
        Self::start_flaky(routes, 0)
    }

    /// Like `start`, but the first `failures` requests are answered with 503.
    pub fn start_flaky(routes: &[(&str, &str)], failures: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let map: HashMap<String, Vec<u8>> = routes
            .iter()
            .map(|(p, b)| (format!("/v2/{p}"), b.as_bytes().to_vec()))
            .collect();
        let routes = Arc::new(Mutex::new(map));
        let hits = Arc::new(AtomicUsize::new(0));
        let remaining_failures = Arc::new(AtomicUsize::new(failures));

        let (r, h) = (Arc::clone(&routes), Arc::clone(&hits));
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let (r, h, f) = (Arc::clone(&r), Arc::clone(&h), Arc::clone(&remaining_failures));
                thread::spawn(move || handle(stream, &r, &h, &f));
            }
        });
        JsonServer {
            base_url: format!("http://127.0.0.1:{port}/v2"),
            routes,
            hits,
        }
    }

    /// Replace (or add) the body served at `path`.
    pub fn set(&self, path: &str, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(format!("/v2/{path}"), body.as_bytes().to_vec());
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &Mutex<HashMap<String, Vec<u8>>>,
    hits: &AtomicUsize,
    remaining_failures: &AtomicUsize,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    hits.fetch_add(1, Ordering::SeqCst);

    let fail = remaining_failures
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    let body = routes.lock().unwrap().get(&path).cloned();
    let (status, body) = match (fail, body) {
        (true, _) => ("503 Service Unavailable", Vec::new()),
        (false, Some(b)) => ("200 OK", b),
        (false, None) => ("404 Not Found", b"not found".to_vec()),
    };
    let head = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
}
