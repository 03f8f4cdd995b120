//! Minimal HTTP/1.1 stub used by the integration tests.

#![allow(dead_code)]

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    sync::mpsc,
};

/// A canned response served to every incoming request.
pub struct StubServer {
    pub url: String,
    requests: mpsc::UnboundedReceiver<String>,
}

impl StubServer {
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let request = read_head(&mut socket).await;
                let request_line = request.lines().next().unwrap_or_default().to_string();
                let _ = tx.send(request_line);

                let response = format!(
                    "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { url: format!("http://{addr}/"), requests: rx }
    }

    /// Request line (`GET /path?query HTTP/1.1`) of the next received request.
    pub async fn next_request(&mut self) -> String {
        self.requests.recv().await.expect("stub server received a request")
    }
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}
