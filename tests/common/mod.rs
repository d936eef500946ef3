//! Shared utilities for integration testing against a mock node.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A decoded JSON-RPC request as seen by the mock node.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: String,
    pub params: Value,
    pub authorization: Option<String>,
}

/// What the mock node answers.
#[allow(dead_code)]
pub enum MockReply {
    Result(Value),
    Error { code: i64, message: String },
}

/// Shared log of every request the mock node received.
pub type RequestLog = Arc<Mutex<Vec<MockRequest>>>;

#[allow(dead_code)]
pub fn methods(log: &RequestLog) -> Vec<String> {
    log.lock().unwrap().iter().map(|r| r.method.clone()).collect()
}

/// Start a mock JSON-RPC node on an ephemeral port.
pub async fn start_mock_rpc<F>(handler: F) -> SocketAddr
where
    F: Fn(&MockRequest) -> MockReply + Send + Sync + 'static,
{
    start_mock_rpc_at("127.0.0.1:0".parse().unwrap(), handler).await
}

/// Start a mock JSON-RPC node on `addr`.
pub async fn start_mock_rpc_at<F>(addr: SocketAddr, handler: F) -> SocketAddr
where
    F: Fn(&MockRequest) -> MockReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind(addr).await.unwrap();
    let local = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        let _ = serve(socket, handler).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    local
}

/// Reserve a port that nothing listens on (yet).
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn serve<F>(mut socket: TcpStream, handler: Arc<F>) -> std::io::Result<()>
where
    F: Fn(&MockRequest) -> MockReply,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut content_length = 0usize;
    let mut authorization = None;
    for line in head.lines().skip(1) {
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                "authorization" => authorization = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let end = (header_end + content_length).min(buf.len());
    let body: Value = serde_json::from_slice(&buf[header_end..end]).unwrap_or(Value::Null);
    let request = MockRequest {
        method: body["method"].as_str().unwrap_or_default().to_string(),
        params: body["params"].clone(),
        authorization,
    };

    let (status, payload) = match handler(&request) {
        MockReply::Result(result) => (
            "200 OK",
            json!({ "result": result, "error": null, "id": body["id"] }),
        ),
        MockReply::Error { code, message } => (
            "500 Internal Server Error",
            json!({ "result": null, "error": { "code": code, "message": message }, "id": body["id"] }),
        ),
    };

    let text = payload.to_string();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        text.len(),
        text
    );
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await?;
    Ok(())
}
