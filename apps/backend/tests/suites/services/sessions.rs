use std::time::Duration;

use quiz_backend::db::require_db;
use quiz_backend::services::SessionService;
use quiz_backend::AppError;
use time::OffsetDateTime;

use crate::support::build_test_state;
use crate::support::factory::create_player;

#[tokio::test]
async fn open_find_and_close() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = SessionService::new();
    let now = OffsetDateTime::now_utc();

    let player = create_player(db, "sid").await?;
    let session = service
        .open_session(db, player.id, now, Duration::from_secs(60))
        .await?;
    assert_eq!(session.player_id, player.id);
    assert!(session.expires_at > now);

    let found = service.find_active(db, &session.id, now).await?;
    assert_eq!(found.map(|s| s.id), Some(session.id.clone()));

    service.close_session(db, &session.id).await?;
    assert!(service.find_active(db, &session.id, now).await?.is_none());

    // Closing twice is fine.
    service.close_session(db, &session.id).await?;
    Ok(())
}

#[tokio::test]
async fn expired_sessions_are_inactive_and_purged() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = SessionService::new();
    let now = OffsetDateTime::now_utc();

    let player = create_player(db, "old").await?;
    let expired = service
        .open_session(db, player.id, now - time::Duration::hours(3), Duration::from_secs(3600))
        .await?;
    let fresh = service
        .open_session(db, player.id, now, Duration::from_secs(3600))
        .await?;

    assert!(service.find_active(db, &expired.id, now).await?.is_none());
    assert_eq!(service.purge_expired(db, now).await?, 1);
    assert!(service.find_active(db, &fresh.id, now).await?.is_some());
    Ok(())
}
