//! Status text sources

use atc_speech_core::{FileWatchFeed, LineFeed};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tokio::time::timeout;

fn temp_status_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "atc_speech_feed_{}_{}",
        name,
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join("statusbar.txt")
}

async fn next(rx: &mut mpsc::Receiver<String>) -> Option<String> {
    timeout(Duration::from_millis(500), rx.recv()).await.ok().flatten()
}

#[tokio::test]
async fn line_feed_skips_blank_lines_and_ends_at_eof() {
    let input: &[u8] = b"UAL45: request lower\r\n\n   \nDAL12: runway 9c in sight\n";
    let (tx, mut rx) = mpsc::channel(8);
    let handle = LineFeed::new(BufReader::new(input)).start(tx);

    assert_eq!(next(&mut rx).await.as_deref(), Some("UAL45: request lower"));
    assert_eq!(
        next(&mut rx).await.as_deref(),
        Some("DAL12: runway 9c in sight")
    );
    handle.await.unwrap();
    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn line_feed_stops_when_receiver_is_gone() {
    let input: &[u8] = b"a: 1\nb: 2\nc: 3\n";
    let (tx, rx) = mpsc::channel(1);
    drop(rx);

    let handle = LineFeed::new(BufReader::new(input)).start(tx);
    timeout(Duration::from_millis(500), handle)
        .await
        .expect("feed should stop")
        .unwrap();
}

#[tokio::test]
async fn file_feed_reports_each_rewrite() {
    let path = temp_status_file("changes");
    std::fs::write(&path, "UAL45: request lower\n").unwrap();

    let (tx, mut rx) = mpsc::channel(8);
    let handle = FileWatchFeed::new(&path, Duration::from_millis(10)).start(tx);

    assert_eq!(next(&mut rx).await.as_deref(), Some("UAL45: request lower"));

    // Nothing new until the file is touched
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err());

    // A cleared status bar is swallowed, the same text after it is new again
    std::fs::write(&path, "").unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err());
    std::fs::write(&path, "UAL45: request lower").unwrap();
    assert_eq!(next(&mut rx).await.as_deref(), Some("UAL45: request lower"));

    std::fs::write(&path, "DAL12: with you").unwrap();
    assert_eq!(next(&mut rx).await.as_deref(), Some("DAL12: with you"));

    handle.abort();
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn file_feed_repeats_a_message_written_twice() {
    let path = temp_status_file("repeat");
    std::fs::write(&path, "UAL45: fly heading 270.").unwrap();

    let (tx, mut rx) = mpsc::channel(8);
    let handle = FileWatchFeed::new(&path, Duration::from_millis(10)).start(tx);
    assert_eq!(
        next(&mut rx).await.as_deref(),
        Some("UAL45: fly heading 270.")
    );

    tokio::time::sleep(Duration::from_millis(50)).await;
    std::fs::write(&path, "UAL45: fly heading 270.").unwrap();
    assert_eq!(
        next(&mut rx).await.as_deref(),
        Some("UAL45: fly heading 270.")
    );

    handle.abort();
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn file_feed_waits_for_the_file_to_appear() {
    let path = temp_status_file("missing");
    let _ = std::fs::remove_file(&path);

    let (tx, mut rx) = mpsc::channel(8);
    let handle = FileWatchFeed::new(&path, Duration::from_millis(10)).start(tx);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err());

    std::fs::write(&path, "AAL7: cleared for takeoff").unwrap();
    assert_eq!(
        next(&mut rx).await.as_deref(),
        Some("AAL7: cleared for takeoff")
    );

    handle.abort();
    let _ = std::fs::remove_file(&path);
}
