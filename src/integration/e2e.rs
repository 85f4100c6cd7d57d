//! End-to-end tests over a real socket

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use super::fixtures::{video_bytes, TestServer};
use crate::auth::TokenAccess;

fn header<'a>(response: &'a reqwest::Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).map(|v| v.to_str().unwrap())
}

#[tokio::test]
async fn test_concrete_scenarios() {
    let data = video_bytes(1000);
    let server = TestServer::start(&[("movie.mp4", data.as_slice())], 1024).await;
    let client = reqwest::Client::new();
    let url = server.url("/api/stream/movie.mp4");

    let response = client.get(&url).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(header(&response, "accept-ranges"), Some("bytes"));
    assert_eq!(header(&response, "content-length"), Some("1000"));
    assert_eq!(response.bytes().await.unwrap().as_ref(), &data[..]);

    let response = client
        .get(&url)
        .header("Range", "bytes=200-299")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 206);
    assert_eq!(header(&response, "content-range"), Some("bytes 200-299/1000"));
    assert_eq!(header(&response, "content-length"), Some("100"));
    assert_eq!(response.bytes().await.unwrap().as_ref(), &data[200..300]);

    let response = client
        .get(&url)
        .header("Range", "bytes=900-2000")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 206);
    assert_eq!(header(&response, "content-range"), Some("bytes 900-999/1000"));
    assert_eq!(header(&response, "content-length"), Some("100"));

    let response = client
        .get(&url)
        .header("Range", "bytes=1000-1100")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 416);
    assert_eq!(header(&response, "content-range"), Some("bytes */1000"));
    assert!(response.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_large_file_streams_in_bounded_chunks() {
    let data = video_bytes(8 * 1024 * 1024 + 17);
    // 64 KiB chunks against an 8 MiB file
    let server = TestServer::start(&[("big.mkv", data.as_slice())], 64).await;

    let response = reqwest::get(server.url("/api/stream/big.mkv")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(header(&response, "content-type"), Some("video/x-matroska"));

    let received = response.bytes().await.unwrap();
    assert_eq!(received.len(), data.len());
    assert!(received.as_ref() == data.as_slice());

    let metrics = &server.state.metrics;
    assert_eq!(metrics.streams_completed(), 1);
    assert_eq!(metrics.bytes_sent(), data.len() as u64);
}

#[tokio::test]
async fn test_client_disconnect_is_not_an_error() {
    let data = video_bytes(32 * 1024 * 1024);
    let server = TestServer::start(&[("long.mp4", data.as_slice())], 64).await;

    {
        let mut socket = TcpStream::connect(server.addr).await.unwrap();
        socket
            .write_all(b"GET /api/stream/long.mp4 HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        let mut buf = vec![0u8; 4096];
        let n = socket.read(&mut buf).await.unwrap();
        assert!(String::from_utf8_lossy(&buf[..n]).starts_with("HTTP/1.1 200"));
        // Dropped here with most of the body unread
    }

    let metrics = server.state.metrics.clone();
    tokio::time::timeout(Duration::from_secs(10), async move {
        while metrics.client_disconnects() == 0 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("server should notice the disconnect");

    assert_eq!(server.state.metrics.streams_completed(), 0);
    assert_eq!(server.state.metrics.error_count("io"), 0);

    // The server keeps serving other requests
    let response = reqwest::Client::new()
        .get(server.url("/api/stream/long.mp4"))
        .header("Range", "bytes=-10")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 206);
    assert_eq!(response.bytes().await.unwrap().as_ref(), &data[data.len() - 10..]);
}

#[tokio::test]
async fn test_concurrent_streams_are_independent() {
    let data = Arc::new(video_bytes(256 * 1024));
    let server = TestServer::start(&[("shared.webm", data.as_slice())], 4).await;
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for i in 0..16u64 {
        let client = client.clone();
        let url = server.url("/api/stream/shared.webm");
        let data = data.clone();
        tasks.push(tokio::spawn(async move {
            let start = i * 9_973;
            let end = start + 20_000 + i * 1_000;
            let response = client
                .get(&url)
                .header("Range", format!("bytes={}-{}", start, end))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status().as_u16(), 206);
            let body = response.bytes().await.unwrap();
            assert_eq!(body.as_ref(), &data[start as usize..=end as usize]);
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(server.state.metrics.streams_completed(), 16);
}

#[tokio::test]
async fn test_token_via_query_for_video_element() {
    let data = video_bytes(2048);
    let gate = TokenAccess::new().grant("player-token", ["clip.mp4"]);
    let server = TestServer::start_with_auth(&[("clip.mp4", data.as_slice())], 1, Arc::new(gate)).await;
    let client = reqwest::Client::new();

    let denied = client
        .get(server.url("/api/stream/clip.mp4?token=wrong"))
        .send()
        .await
        .unwrap();
    assert_eq!(denied.status().as_u16(), 403);

    let allowed = client
        .get(server.url("/api/stream/clip.mp4?token=player-token"))
        .header("Range", "bytes=1024-")
        .send()
        .await
        .unwrap();
    assert_eq!(allowed.status().as_u16(), 206);
    assert_eq!(header(&allowed, "content-range"), Some("bytes 1024-2047/2048"));
    assert_eq!(allowed.bytes().await.unwrap().as_ref(), &data[1024..]);
}
