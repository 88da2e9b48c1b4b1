use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tracing::{trace, warn};

/// A request received by [`StubBackendServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Path without the leading slash (e.g. `show_ad`).
    pub path: String,
    /// Header map with lower-cased names.
    pub headers: HashMap<String, String>,
    /// Body parsed as JSON, `Null` if it was not JSON.
    pub body: Value,
}

#[derive(Clone)]
struct Reply {
    status: u16,
    body: String,
}

#[derive(Default)]
struct StubState {
    routes: HashMap<String, Reply>,
    requests: Vec<RecordedRequest>,
}

/// Minimal HTTP/1.1 server on loopback that answers configured paths with
/// canned JSON and records every request. Unknown paths get `404`.
pub struct StubBackendServer {
    addr: SocketAddr,
    state: Arc<Mutex<StubState>>,
    task: JoinHandle<()>,
}

impl StubBackendServer {
    /// Bind an ephemeral port and start serving on the current runtime.
    pub async fn start() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind stub backend")?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(StubState::default()));

        let accept_state = Arc::clone(&state);
        let task = tokio::spawn(async move {
            loop {
                let (stream, peer) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(err) => {
                        warn!(%err, "Stub backend accept failed");
                        continue;
                    }
                };
                let state = Arc::clone(&accept_state);
                tokio::spawn(async move {
                    if let Err(err) = serve(stream, state).await {
                        warn!(%peer, "Stub backend connection failed: {err:#}");
                    }
                });
            }
        });

        Ok(Self { addr, state, task })
    }

    /// Base URL to hand to the client under test.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer `path` with `status` and a raw body.
    pub fn respond(&self, path: &str, status: u16, body: impl Into<String>) {
        self.lock().routes.insert(
            path.trim_start_matches('/').to_string(),
            Reply {
                status,
                body: body.into(),
            },
        );
    }

    /// Answer `path` with `200` and `value` as JSON.
    pub fn respond_json(&self, path: &str, value: &Value) {
        self.respond(path, 200, value.to_string());
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Requests received on `path`.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        let path = path.trim_start_matches('/');
        self.lock()
            .requests
            .iter()
            .filter(|req| req.path == path)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for StubBackendServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(stream: TcpStream, state: Arc<Mutex<StubState>>) -> Result<()> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().context("missing method")?.to_string();
    let target = parts.next().context("missing request target")?;
    let path = target.trim_start_matches('/').to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let length: usize = headers
        .get("content-length")
        .map(|v| v.parse::<usize>())
        .transpose()
        .context("invalid content-length")?
        .unwrap_or(0);
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).await?;
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);

    trace!(%method, %path, "stub backend request");

    let reply = {
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
        state.requests.push(RecordedRequest {
            method,
            path: path.clone(),
            headers,
            body,
        });
        state.routes.get(&path).cloned().unwrap_or(Reply {
            status: 404,
            body: r#"{"error":"not found"}"#.to_string(),
        })
    };

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reason_phrase(reply.status),
        reply.body.len(),
        reply.body
    );
    let mut stream = reader.into_inner();
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

/// Base URL of a loopback port nothing listens on.
pub fn unreachable_base_url() -> Result<String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}
