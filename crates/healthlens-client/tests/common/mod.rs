//! Minimal HTTP stub for exercising the client against a real socket.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    _handle: JoinHandle<()>,
}

impl StubServer {
    /// Serve the canned `(status, body)` responses in order, one per connection.
    pub async fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        let handle = tokio::spawn(async move {
            for (status, body) in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let raw = read_request(&mut socket).await;
                recorded.lock().unwrap().push(raw);

                let response = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
            _handle: handle,
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        let Some(header_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let headers = text[..header_end].to_ascii_lowercase();
        let body_len = buf.len() - (header_end + 4);

        if let Some(len) = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
        {
            if body_len >= len {
                break;
            }
        } else if headers.contains("transfer-encoding: chunked") {
            if text.ends_with("0\r\n\r\n") {
                break;
            }
        } else {
            break;
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

pub fn series_body(points: usize, decomposition_len: Option<usize>) -> String {
    let timeseries: Vec<String> = (0..points)
        .map(|i| {
            format!(
                r#"{{"timestamp":"2024-01-{:02}T00:00:00","value":{}}}"#,
                i + 1,
                60.0 + i as f64
            )
        })
        .collect();

    let decomposition = match decomposition_len {
        Some(len) => {
            let values: Vec<String> = (0..len).map(|i| format!("{}.5", i)).collect();
            let joined = values.join(",");
            format!(
                r#"{{"trend":[{0}],"seasonal":[{0}],"residual":[{0}]}}"#,
                joined
            )
        }
        None => "null".to_string(),
    };

    format!(
        r#"{{"metric":"HeartRate","timeseries":[{}],"decomposition":{}}}"#,
        timeseries.join(","),
        decomposition
    )
}
