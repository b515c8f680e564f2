use mitra_relay::error::AppError;
use mitra_relay::services::session_manager::{
    ChatMessage, GREETING, Mood, Sender, SessionManager,
};
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test]
async fn basic_session_flow() {
    let mgr = SessionManager::new(Duration::from_secs(60));
    let sid = mgr.create_session().await;
    assert!(!sid.is_empty());

    let history = mgr.get_history(&sid).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].text, GREETING);

    let len = mgr
        .append_message(&sid, ChatMessage::new(Sender::User, "hello", Some(Mood::Neutral)))
        .await;
    assert_eq!(len, 2);
    assert!(mgr.remove_session(&sid).await);
    assert!(mgr.get_history(&sid).await.is_none());
}

#[tokio::test]
async fn test_history_keeps_append_order() {
    let mgr = SessionManager::new(Duration::from_secs(60));
    let sid = mgr.create_session().await;

    for text in ["one", "two", "three"] {
        mgr.append_message(&sid, ChatMessage::new(Sender::User, text, None))
            .await;
    }

    let texts: Vec<String> = mgr
        .get_history(&sid)
        .await
        .unwrap()
        .into_iter()
        .skip(1)
        .map(|m| m.text)
        .collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn test_ensure_session_is_idempotent() {
    let mgr = SessionManager::new(Duration::from_secs(60));
    mgr.ensure_session("browser-tab").await;
    mgr.append_message("browser-tab", ChatMessage::new(Sender::User, "hi", None))
        .await;
    mgr.ensure_session("browser-tab").await;

    assert_eq!(mgr.len().await, 1);
    assert_eq!(mgr.get_history("browser-tab").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_session_expiration() {
    let mgr = SessionManager::new(Duration::from_millis(10));
    let sid = mgr.create_session().await;

    // Wait for expiration
    sleep(Duration::from_millis(20)).await;

    let removed_count = mgr.purge_expired().await;
    assert_eq!(removed_count, 1, "Should have removed 1 expired session");
    assert!(
        !mgr.remove_session(&sid).await,
        "Session should already be gone"
    );
    assert!(mgr.is_empty().await);
}

#[tokio::test]
async fn test_single_relay_slot_per_session() {
    let mgr = SessionManager::new(Duration::from_secs(60));
    let sid = mgr.create_session().await;
    let other = mgr.create_session().await;

    let permit = mgr.try_acquire_relay(&sid).await;
    assert!(permit.is_ok());
    assert!(matches!(
        mgr.try_acquire_relay(&sid).await,
        Err(AppError::Busy { .. })
    ));

    // Other sessions are unaffected.
    assert!(mgr.try_acquire_relay(&other).await.is_ok());

    drop(permit);
    assert!(mgr.try_acquire_relay(&sid).await.is_ok());
}

#[tokio::test]
async fn test_no_relay_slot_for_unknown_session() {
    let mgr = SessionManager::new(Duration::from_secs(60));
    assert!(matches!(
        mgr.try_acquire_relay("missing").await,
        Err(AppError::SessionNotFound(_))
    ));
}

#[tokio::test]
async fn test_ensure_session_keeps_active_session_alive() {
    let mgr = SessionManager::new(Duration::from_millis(40));
    let sid = mgr.create_session().await;

    sleep(Duration::from_millis(25)).await;
    mgr.ensure_session(&sid).await;
    sleep(Duration::from_millis(25)).await;

    // 50ms since creation but only 25ms since the last touch.
    assert_eq!(mgr.purge_expired().await, 0);
    assert!(mgr.try_acquire_relay(&sid).await.is_ok());
}
