//! Wire-format checks against a one-shot local HTTP responder.

use std::sync::Arc;

use denoiser_client::{ClientConfig, DenoiseClient};
use denoiser_core::{
    Completion, CookieString, DenoiseRequest, DenoiseSession, DenoiseTransport, MediaHandle,
    PlaybackError, RequestState, SubmitError,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

const WAV_OK: &[u8] = b"HTTP/1.1 200 OK\r\n\
Content-Type: audio/wav\r\n\
Content-Disposition: attachment; filename=take_denoised.wav\r\n\
Content-Length: 8\r\n\
Connection: close\r\n\r\n\
RIFF\x00\x01\xfe\xff";

const SERVER_ERROR: &[u8] = b"HTTP/1.1 500 Internal Server Error\r\n\
Content-Type: text/plain\r\n\
Content-Length: 14\r\n\
Connection: close\r\n\r\n\
File not found";

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

async fn read_request(socket: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = find(&buf, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            if head.contains("transfer-encoding: chunked") {
                if buf.ends_with(b"0\r\n\r\n") {
                    break;
                }
                continue;
            }
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + len {
                break;
            }
        }
    }
    buf
}

/// Accept one connection, capture the request, answer with `response`.
async fn serve_once(response: &'static [u8]) -> (String, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });
    (format!("http://{addr}"), handle)
}

fn request(token: Option<&str>) -> DenoiseRequest {
    DenoiseRequest {
        file_name: "take.wav".to_string(),
        audio: Arc::from(&b"noisy-bytes"[..]),
        csrf_token: token.map(str::to_string),
    }
}

#[tokio::test]
async fn test_post_shape_and_success_body() {
    let (base, server) = serve_once(WAV_OK).await;
    let client = DenoiseClient::new(ClientConfig::new(base)).unwrap();

    let response = client.send(request(Some("tok123"))).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, b"RIFF\x00\x01\xfe\xff");
    assert_eq!(response.content_type.as_deref(), Some("audio/wav"));
    assert_eq!(
        response.content_disposition.as_deref(),
        Some("attachment; filename=take_denoised.wav")
    );

    let raw = server.await.unwrap();
    let text = String::from_utf8_lossy(&raw);
    let head_end = find(&raw, b"\r\n\r\n").unwrap();
    let head = text[..head_end].to_lowercase();

    assert!(head.starts_with("post /api/denoise/ http/1.1"), "{head}");
    assert!(head.contains("x-csrftoken: tok123"), "{head}");
    assert!(head.contains("content-type: multipart/form-data; boundary="), "{head}");
    assert!(text.contains("name=\"audio_file\"; filename=\"take.wav\""), "{text}");
    assert!(find(&raw, b"noisy-bytes").is_some());
}

#[tokio::test]
async fn test_no_token_no_header() {
    let (base, server) = serve_once(WAV_OK).await;
    let client = DenoiseClient::new(ClientConfig::new(base)).unwrap();

    client.send(request(None)).await.unwrap();
    let raw = server.await.unwrap();
    let head_end = find(&raw, b"\r\n\r\n").unwrap();
    let head = String::from_utf8_lossy(&raw[..head_end]).to_lowercase();
    assert!(!head.contains("x-csrftoken"), "{head}");
}

#[tokio::test]
async fn test_audio_sent_whole_with_length() {
    let (base, server) = serve_once(WAV_OK).await;
    let client = DenoiseClient::new(ClientConfig::new(base)).unwrap();
    let audio: Arc<[u8]> = (0..=255u8).cycle().take(70_000).collect::<Vec<_>>().into();

    let sent = DenoiseRequest {
        file_name: "long.wav".to_string(),
        audio: audio.clone(),
        csrf_token: None,
    };
    client.send(sent).await.unwrap();

    let raw = server.await.unwrap();
    let head_end = find(&raw, b"\r\n\r\n").unwrap();
    let head = String::from_utf8_lossy(&raw[..head_end]).to_lowercase();
    assert!(head.contains("content-length:"), "{head}");
    assert!(!head.contains("transfer-encoding: chunked"), "{head}");
    assert!(find(&raw[head_end..], &audio).is_some());
    // The caller's buffer is still the selected input
    assert_eq!(audio.len(), 70_000);
    assert_eq!(audio[256], 0);
}

#[tokio::test]
async fn test_server_error_is_a_response() {
    let (base, server) = serve_once(SERVER_ERROR).await;
    let client = DenoiseClient::new(ClientConfig::new(base)).unwrap();

    let response = client.send(request(None)).await.unwrap();
    assert_eq!(response.status, 500);
    assert_eq!(response.status_text, "Internal Server Error");
    assert!(response.body.is_empty());
    server.await.unwrap();
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = DenoiseClient::new(ClientConfig::new(format!("http://{addr}"))).unwrap();
    assert!(client.send(request(None)).await.is_err());
}

struct Silent;

impl MediaHandle for Silent {
    fn play(&self) -> Result<(), PlaybackError> {
        Ok(())
    }
    fn pause(&self) -> Result<(), PlaybackError> {
        Ok(())
    }
    fn is_paused(&self) -> bool {
        true
    }
}

#[tokio::test]
async fn test_session_over_http() {
    let (base, server) = serve_once(WAV_OK).await;
    let client = DenoiseClient::new(ClientConfig::new(base)).unwrap();
    let cookies = CookieString::new("sessionid=s; csrftoken=from-cookie");

    let mut session: DenoiseSession<Silent> = DenoiseSession::new();
    session.select_file("take.wav", b"noisy-bytes".to_vec());
    let done = session.submit(&client, &cookies).await.unwrap();

    assert_eq!(done, Completion::Succeeded);
    assert_eq!(session.request_state(), RequestState::Succeeded);
    let result = session.result().unwrap();
    assert_eq!(result.bytes, b"RIFF\x00\x01\xfe\xff");
    assert_eq!(result.suggested_name.as_deref(), Some("take_denoised.wav"));

    let raw = server.await.unwrap();
    let head = String::from_utf8_lossy(&raw).to_lowercase();
    assert!(head.contains("x-csrftoken: from-cookie"));
}

#[tokio::test]
async fn test_session_failure_over_http() {
    let (base, server) = serve_once(SERVER_ERROR).await;
    let client = DenoiseClient::new(ClientConfig::new(base)).unwrap();

    let mut session: DenoiseSession<Silent> = DenoiseSession::new();
    session.select_file("take.wav", b"noisy-bytes".to_vec());
    let done = session.submit(&client, &CookieString::default()).await.unwrap();

    assert_eq!(
        done,
        Completion::Failed(SubmitError::Server {
            status: 500,
            status_text: "Internal Server Error".into()
        })
    );
    assert!(session.result().is_none());
    assert_eq!(session.request_state(), RequestState::Failed);
    server.await.unwrap();
}
