use crux_http::protocol::{HttpHeader, HttpRequest, HttpResult};
use garage_panel::config::DeviceConfig;
use garage_panel::http_client::{DeviceTransport, ReqwestTransport};
use garage_panel_core::{ImageKind, UploadOperation, UploadOutput};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Request as seen by the mock device
struct Received {
    request_line: String,
    headers: Vec<String>,
    body: Vec<u8>,
}

// Integration tests for ReqwestTransport against a mock device
async fn start_mock_device(
    status: u16,
    response_body: &'static str,
) -> (String, mpsc::UnboundedReceiver<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock device");
    let address = listener.local_addr().expect("failed to get local address");
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let tx = tx.clone();

            tokio::spawn(async move {
                let mut reader = BufReader::new(&mut stream);
                let mut request_line = String::new();
                if reader.read_line(&mut request_line).await.is_err() {
                    return;
                }

                // Read HTTP headers
                let mut headers = Vec::new();
                let mut content_length = 0;
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).await.is_err() {
                        return;
                    }
                    if line.trim().is_empty() {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        if name.eq_ignore_ascii_case("content-length") {
                            content_length = value.trim().parse().unwrap_or(0);
                        }
                    }
                    headers.push(line.trim().to_string());
                }

                let mut body = vec![0; content_length];
                if reader.read_exact(&mut body).await.is_err() {
                    return;
                }

                let _ = tx.send(Received {
                    request_line: request_line.trim().to_string(),
                    headers,
                    body,
                });

                let http_response = format!(
                    "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response_body.len(),
                    response_body
                );
                let _ = stream.write_all(http_response.as_bytes()).await;
            });
        }
    });

    (format!("http://{address}"), rx)
}

fn transport(url: &str) -> ReqwestTransport {
    ReqwestTransport::new(&DeviceConfig {
        url: url.to_string(),
        timeout: Duration::from_secs(5),
        upload_path: "/update".to_string(),
    })
    .expect("failed to create transport")
}

fn request(method: &str, path: &str, body: &str) -> HttpRequest {
    let headers = if body.is_empty() {
        Vec::new()
    } else {
        vec![HttpHeader {
            name: "Content-Type".to_string(),
            value: "application/json".to_string(),
        }]
    };

    HttpRequest {
        method: method.to_string(),
        url: format!("http://device{path}"),
        headers,
        body: body.as_bytes().to_vec(),
    }
}

#[tokio::test]
async fn get_is_sent_to_the_configured_device() {
    let (url, mut received) = start_mock_device(200, r#"{"doorOne":"open"}"#).await;

    let result = transport(&url)
        .execute(request("GET", "/api/doorStatus", ""))
        .await;

    let HttpResult::Ok(response) = result else {
        panic!("expected a response, got {result:?}");
    };
    assert_eq!(response.status, 200);
    assert_eq!(response.body, br#"{"doorOne":"open"}"#.to_vec());

    let seen = received.recv().await.expect("request reached the device");
    assert_eq!(seen.request_line, "GET /api/doorStatus HTTP/1.1");
}

#[tokio::test]
async fn post_forwards_json_body() {
    let (url, mut received) = start_mock_device(200, "{}").await;
    let body = r#"{"web":{"username":"admin","password":"secret"}}"#;

    let result = transport(&url)
        .execute(request("POST", "/api/config", body))
        .await;

    assert!(matches!(result, HttpResult::Ok(_)));
    let seen = received.recv().await.expect("request reached the device");
    assert_eq!(seen.request_line, "POST /api/config HTTP/1.1");
    assert_eq!(seen.body, body.as_bytes());
    assert!(seen
        .headers
        .iter()
        .any(|h| h.eq_ignore_ascii_case("content-type: application/json")));
}

#[tokio::test]
async fn error_status_is_a_response() {
    let (url, _received) = start_mock_device(500, r#"{"error":"bad ssid"}"#).await;

    let result = transport(&url)
        .execute(request("POST", "/api/config", "{}"))
        .await;

    let HttpResult::Ok(response) = result else {
        panic!("expected a response, got {result:?}");
    };
    assert_eq!(response.status, 500);
    assert_eq!(response.body, br#"{"error":"bad ssid"}"#.to_vec());
}

#[tokio::test]
async fn unreachable_device_is_a_transport_error() {
    // bind and drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().expect("address");
    drop(listener);

    let result = transport(&format!("http://{address}"))
        .execute(request("POST", "/api/door1", ""))
        .await;

    assert!(matches!(result, HttpResult::Err(_)));
}

#[tokio::test]
async fn upload_posts_multipart_form() {
    let (url, mut received) = start_mock_device(200, "").await;
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("firmware.bin");
    std::fs::write(&file, b"\x00\x01image").expect("write image");

    let output = transport(&url)
        .upload(UploadOperation {
            kind: ImageKind::Firmware,
            file: file.display().to_string(),
        })
        .await;

    assert_eq!(output, UploadOutput::Completed { status: 200 });
    let seen = received.recv().await.expect("upload reached the device");
    assert_eq!(seen.request_line, "POST /update HTTP/1.1");
    let body = String::from_utf8_lossy(&seen.body);
    assert!(body.contains(r#"name="firmware""#));
    assert!(body.contains(r#"filename="firmware.bin""#));
}

#[tokio::test]
async fn upload_of_missing_file_fails_without_request() {
    let transport = transport("http://127.0.0.1:9");

    let output = transport
        .upload(UploadOperation {
            kind: ImageKind::Filesystem,
            file: "/nonexistent/littlefs.bin".to_string(),
        })
        .await;

    let UploadOutput::Failed { message } = output else {
        panic!("expected failure, got {output:?}");
    };
    assert!(message.contains("littlefs.bin"));
}
