//! Minimal HTTP/1.1 stub used to exercise the client without the real site.

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

#[derive(Clone)]
pub(crate) enum Reply {
    Respond { status: u16, body: String },
    /// Accept the connection and never answer
    Stall,
}

impl Reply {
    pub(crate) fn json(status: u16, body: &str) -> Self {
        Reply::Respond {
            status,
            body: body.to_owned(),
        }
    }
}

pub(crate) struct StubServer {
    pub base_url: String,
    /// Request heads (request line and headers) in arrival order
    pub requests: mpsc::UnboundedReceiver<String>,
}

pub(crate) async fn spawn(reply: Reply) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let reply = reply.clone();
            let tx = tx.clone();
            tokio::spawn(handle(socket, reply, tx));
        }
    });
    StubServer {
        base_url: format!("http://{}", addr),
        requests: rx,
    }
}

/// URL of a port nothing listens on.
pub(crate) async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn handle(mut socket: TcpStream, reply: Reply, tx: mpsc::UnboundedSender<String>) {
    let head = read_head(&mut socket).await;
    let _ = tx.send(head);
    match reply {
        Reply::Stall => tokio::time::sleep(Duration::from_secs(60)).await,
        Reply::Respond { status, body } => {
            let resp = format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(resp.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    }
}

async fn read_head(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") && buf.len() < 64 * 1024 {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
