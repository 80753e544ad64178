//! Integration tests for the session composition layer against
//! in-process mock servers.
//!
//! The push side is a one-shot WebSocket server that delivers scripted
//! frames; the REST side serves a scripted sequence of responses, one
//! connection per request. Both bind ephemeral loopback ports.

use std::time::Duration;

use futures::SinkExt;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tubescribe_core::types::{ProcessingStatus, VideoRecord};
use tubescribe_session::config::SessionConfig;
use tubescribe_session::session::SyncSession;

/// Bind a one-shot WebSocket server that sends `frames` to the first
/// client and then holds the connection open. Returns the `ws://` URL.
async fn spawn_push(frames: Vec<String>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        for frame in frames {
            if ws.send(Message::Text(frame)).await.is_err() {
                return;
            }
        }
        tokio::time::sleep(Duration::from_secs(30)).await;
        let _ = ws.close(None).await;
    });

    format!("ws://{addr}/ws")
}

/// Bind an HTTP server that answers a scripted sequence of requests.
///
/// Each script entry is `(request_line_substring, json_body)`: the
/// server accepts one connection per entry, asserts the request line
/// matches, and responds `200` with the body. `Connection: close`
/// forces the client to open a fresh connection per request, keeping
/// the script order aligned with the session's sequential calls.
/// Returns the base API URL.
async fn spawn_api(script: Vec<(&'static str, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        for (expected, body) in script {
            let (mut stream, _) = listener.accept().await.unwrap();

            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
                if head.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let head = String::from_utf8_lossy(&head);
            let request_line = head.lines().next().unwrap_or("").to_string();
            assert!(
                request_line.contains(expected),
                "expected request matching {expected:?}, got {request_line:?}"
            );

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
        }
    });

    format!("http://{addr}/api")
}

fn config(api_url: String, ws_url: String) -> SessionConfig {
    SessionConfig {
        api_url,
        ws_url,
        reconnect_attempts: 2,
        reconnect_delay_secs: 1,
    }
}

fn video_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "youtube_url": format!("https://youtu.be/{id}"),
        "title": format!("Video {id}"),
        "status": "queued",
        "progress": 0,
        "created_at": "2026-01-10T12:00:00Z",
        "updated_at": "2026-01-10T12:00:00Z"
    })
}

fn video_list(ids: &[i64]) -> String {
    let records: Vec<_> = ids.iter().map(|id| video_json(*id)).collect();
    serde_json::Value::Array(records).to_string()
}

fn progress_frame(id: i64, step: &str, progress: i32) -> String {
    json!({
        "type": "video_progress",
        "data": {
            "video_id": id,
            "status": "processing",
            "current_step": step,
            "progress": progress
        }
    })
    .to_string()
}

fn find(records: &[VideoRecord], id: i64) -> &VideoRecord {
    records
        .iter()
        .find(|r| r.id == id)
        .unwrap_or_else(|| panic!("record {id} missing from view"))
}

/// Poll `predicate` against the session until it holds or the deadline
/// passes.
async fn wait_for<'a, F, Fut>(session: &'a SyncSession, mut predicate: F)
where
    F: FnMut(&'a SyncSession) -> Fut,
    Fut: std::future::Future<Output = bool> + 'a,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if predicate(session).await {
            return;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached within deadline"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn remove_prunes_the_buffered_patch_with_the_record() {
    let ws_url = spawn_push(vec![progress_frame(2, "Transcribing audio...", 50)]).await;
    let api_url = spawn_api(vec![
        ("/api/videos HTTP", video_list(&[1, 2])),
        ("/api/videos/2 HTTP", "{}".to_string()),
        ("/api/videos HTTP", video_list(&[1, 2])),
    ])
    .await;

    let session = SyncSession::connect(&config(api_url, ws_url));
    session.refresh(None).await.unwrap();

    // The patch for video 2 is buffered and shows through the view.
    wait_for(&session, |s| async move {
        let view = s.merged_view().await;
        view.len() == 2 && find(&view, 2).status == ProcessingStatus::Processing
    })
    .await;

    session.remove(2).await.unwrap();
    assert!(!session.merged_view().await.iter().any(|r| r.id == 2));

    // A stale server view still lists video 2 on the next refresh; the
    // pruned patch must not resurface on it.
    session.refresh(None).await.unwrap();
    let view = session.merged_view().await;
    let reappeared = find(&view, 2);
    assert_eq!(reappeared.status, ProcessingStatus::Queued);
    assert_eq!(reappeared.progress, Some(0));

    session.shutdown().await;
}

#[tokio::test]
async fn filtered_refresh_keeps_patches_for_out_of_scope_records() {
    let ws_url = spawn_push(vec![progress_frame(99, "Summarizing...", 80)]).await;
    let api_url = spawn_api(vec![
        ("/api/videos HTTP", video_list(&[99])),
        ("/api/videos?category_id=1", video_list(&[1])),
        ("/api/videos HTTP", video_list(&[1, 99])),
    ])
    .await;

    let session = SyncSession::connect(&config(api_url, ws_url));
    session.refresh(None).await.unwrap();

    wait_for(&session, |s| async move {
        find(&s.merged_view().await, 99).progress == Some(80)
    })
    .await;

    // A category-scoped reload drops 99 from the snapshot but must not
    // evict its buffered patch.
    session.refresh(Some(1)).await.unwrap();
    assert!(!session.merged_view().await.iter().any(|r| r.id == 99));

    // Back to the full collection: the patch is still there. It was
    // delivered exactly once, so eviction would have lost it for good.
    session.refresh(None).await.unwrap();
    let view = session.merged_view().await;
    assert_eq!(find(&view, 99).progress, Some(80));
    assert_eq!(find(&view, 99).status, ProcessingStatus::Processing);

    session.shutdown().await;
}

#[tokio::test]
async fn unfiltered_refresh_evicts_patches_for_absent_ids() {
    let ws_url = spawn_push(vec![progress_frame(99, "Summarizing...", 80)]).await;
    let api_url = spawn_api(vec![
        ("/api/videos HTTP", video_list(&[99])),
        ("/api/videos HTTP", video_list(&[1])),
        ("/api/videos HTTP", video_list(&[1, 99])),
    ])
    .await;

    let session = SyncSession::connect(&config(api_url, ws_url));
    session.refresh(None).await.unwrap();

    wait_for(&session, |s| async move {
        find(&s.merged_view().await, 99).progress == Some(80)
    })
    .await;

    // Video 99 is gone from the full snapshot: the applied unfiltered
    // reload evicts its buffered patch.
    session.refresh(None).await.unwrap();
    assert!(!session.merged_view().await.iter().any(|r| r.id == 99));

    // When it reappears later the old patch is no longer overlaid.
    session.refresh(None).await.unwrap();
    let view = session.merged_view().await;
    assert_eq!(find(&view, 99).status, ProcessingStatus::Queued);
    assert_eq!(find(&view, 99).progress, Some(0));

    session.shutdown().await;
}
