use std::time::Duration;

use quiz_backend::db::require_db;
use quiz_backend::errors::ErrorCode;
use quiz_backend::repos::{answers, reservations};
use quiz_backend::services::{PlayerPatch, PlayerService, SessionService};
use quiz_backend::AppError;
use quiz_test_support::unique_helpers::unique_nickname;
use time::OffsetDateTime;

use crate::support::build_test_state;
use crate::support::factory::{
    create_admin, create_answer, create_live_question, create_player, create_reservation,
};

#[tokio::test]
async fn signup_then_login_round_trip() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = PlayerService::new();
    let nickname = unique_nickname("tia");

    let player = service
        .signup(db, &nickname, "tia@example.test", "hunter22", "hunter22")
        .await?;
    assert!(player.is_active);
    assert!(!player.is_admin);
    assert_ne!(player.password_hash, "hunter22");

    let logged_in = service.authenticate(db, &nickname, "hunter22").await?;
    assert_eq!(logged_in.id, player.id);
    Ok(())
}

#[tokio::test]
async fn signup_with_mismatched_passwords_writes_nothing() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = PlayerService::new();

    for (p1, p2) in [("one", "two"), ("", ""), ("same", "")] {
        let err = service
            .signup(db, "uma", "uma@example.test", p1, p2)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::PasswordMismatch);
    }
    assert!(service.list_players(db).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn nickname_is_required_and_unique() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = PlayerService::new();

    let err = service
        .create_user(db, "   ", "x@example.test", "pw")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NicknameRequired);

    let existing = create_player(db, "vic").await?;
    let err = service
        .create_user(db, &existing.nickname, "y@example.test", "pw")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NicknameTaken);
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_indistinguishable() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = PlayerService::new();
    let nickname = unique_nickname("wes");

    let player = service
        .create_user(db, &nickname, "wes@example.test", "right")
        .await?;

    let wrong_password = service.authenticate(db, &nickname, "wrong").await.unwrap_err();
    let unknown = service.authenticate(db, "nobody", "right").await.unwrap_err();
    assert_eq!(wrong_password.code(), ErrorCode::InvalidCredentials);
    assert_eq!(unknown.code(), ErrorCode::InvalidCredentials);

    service
        .update_player(
            db,
            player.id,
            PlayerPatch {
                is_active: Some(false),
                ..PlayerPatch::default()
            },
        )
        .await?;
    let inactive = service.authenticate(db, &nickname, "right").await.unwrap_err();
    assert_eq!(inactive.code(), ErrorCode::InvalidCredentials);
    Ok(())
}

#[tokio::test]
async fn superuser_is_admin() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let admin = PlayerService::new()
        .create_superuser(db, &unique_nickname("root"), "root@example.test", "pw")
        .await?;
    assert!(admin.is_admin);
    Ok(())
}

#[tokio::test]
async fn admin_rights_can_be_granted_but_not_revoked() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = PlayerService::new();

    let player = create_player(db, "xan").await?;
    let promoted = service
        .update_player(
            db,
            player.id,
            PlayerPatch {
                is_admin: Some(true),
                ..PlayerPatch::default()
            },
        )
        .await?;
    assert!(promoted.is_admin);

    let err = service
        .update_player(
            db,
            player.id,
            PlayerPatch {
                is_admin: Some(false),
                ..PlayerPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AdminDemotionForbidden);
    Ok(())
}

#[tokio::test]
async fn online_players_exclude_admins_and_expired_sessions() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let sessions = SessionService::new();
    let now = OffsetDateTime::now_utc();
    let hour = Duration::from_secs(3600);

    let online = create_player(db, "yan").await?;
    let stale = create_player(db, "zed").await?;
    let admin = create_admin(db, "boss").await?;
    create_player(db, "never").await?;

    sessions.open_session(db, online.id, now, hour).await?;
    sessions
        .open_session(db, stale.id, now - time::Duration::hours(2), hour)
        .await?;
    sessions.open_session(db, admin.id, now, hour).await?;

    let listed = PlayerService::new().get_online_players(db, now).await?;
    let ids: Vec<i64> = listed.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![online.id]);
    Ok(())
}

#[tokio::test]
async fn deleting_a_player_cascades() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = PlayerService::new();

    let question = create_live_question(db, "Cascade?").await?;
    let player = create_player(db, "gone").await?;
    let reservation = create_reservation(db, question.id, player.id, true).await?;
    let answer = create_answer(db, question.id, player.id, "yes").await?;

    service.delete_player(db, player.id).await?;

    assert!(reservations::find_by_id(db, reservation.id).await?.is_none());
    assert!(answers::find_by_id(db, answer.id).await?.is_none());
    let err = service.get_player(db, player.id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PlayerNotFound);

    let err = service.delete_player(db, player.id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PlayerNotFound);
    Ok(())
}
