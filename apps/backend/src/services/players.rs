//! Player accounts: creation, signup, login and presence.

use sea_orm::ConnectionTrait;
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::adapters::players_sea::{PlayerCreate, PlayerUpdate};
use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::repos::players::{self, Player};

/// Admin console edit. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerPatch {
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub is_admin: Option<bool>,
}

pub struct PlayerService;

impl PlayerService {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_user<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        nickname: &str,
        email: &str,
        password: &str,
    ) -> Result<Player, AppError> {
        self.create(conn, nickname, email, password, false).await
    }

    pub async fn create_superuser<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        nickname: &str,
        email: &str,
        password: &str,
    ) -> Result<Player, AppError> {
        self.create(conn, nickname, email, password, true).await
    }

    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        nickname: &str,
        email: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<Player, AppError> {
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::NicknameRequired,
                "Users must have a nickname.",
            )
            .into());
        }

        let hash = hash_password(password)?;
        let mut dto = PlayerCreate::new(nickname, email.trim(), hash);
        if is_admin {
            dto = dto.admin();
        }

        let player = players::create_player(conn, dto).await?;
        info!(
            player_id = player.id,
            nickname = %player.nickname,
            is_admin = player.is_admin,
            "Player created"
        );
        Ok(player)
    }

    /// Self-service registration. Nothing is written unless both passwords match.
    pub async fn signup<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        nickname: &str,
        email: &str,
        password1: &str,
        password2: &str,
    ) -> Result<Player, AppError> {
        if password1.is_empty() || password2.is_empty() || password1 != password2 {
            return Err(DomainError::validation(
                ValidationKind::PasswordMismatch,
                "Passwords don't match",
            )
            .into());
        }

        self.create_user(conn, nickname, email, password1).await
    }

    /// Unknown nickname, wrong password and inactive account are indistinguishable to the caller.
    pub async fn authenticate<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        nickname: &str,
        password: &str,
    ) -> Result<Player, AppError> {
        let invalid = || AppError::unauthorized(ErrorCode::InvalidCredentials, "Invalid nickname or password");

        let Some(player) = players::find_by_nickname(conn, nickname.trim()).await? else {
            debug!(nickname = %Redacted(nickname), "Login for unknown nickname");
            return Err(invalid());
        };

        if !verify_password(password, &player.password_hash)? {
            debug!(player_id = player.id, "Login with wrong password");
            return Err(invalid());
        }

        if !player.is_active {
            warn!(player_id = player.id, "Login refused for inactive player");
            return Err(invalid());
        }

        Ok(player)
    }

    /// Non-admin players holding an unexpired session.
    pub async fn get_online_players<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        now: OffsetDateTime,
    ) -> Result<Vec<Player>, AppError> {
        Ok(players::find_online(conn, now).await?)
    }

    pub async fn update_player<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        patch: PlayerPatch,
    ) -> Result<Player, AppError> {
        let existing = self.get_player(conn, id).await?;

        if existing.is_admin && patch.is_admin == Some(false) {
            return Err(DomainError::validation(
                ValidationKind::AdminDemotionForbidden,
                "Admin rights cannot be revoked",
            )
            .into());
        }

        let mut dto = PlayerUpdate::new(id);
        if let Some(nickname) = patch.nickname {
            let nickname = nickname.trim().to_string();
            if nickname.is_empty() {
                return Err(DomainError::validation(
                    ValidationKind::NicknameRequired,
                    "Users must have a nickname.",
                )
                .into());
            }
            dto = dto.with_nickname(nickname);
        }
        if let Some(email) = patch.email {
            dto = dto.with_email(email.trim().to_string());
        }
        if let Some(is_active) = patch.is_active {
            dto = dto.with_is_active(is_active);
        }
        if let Some(is_admin) = patch.is_admin {
            dto = dto.with_is_admin(is_admin);
        }

        let player = players::update_player(conn, dto).await?;
        if player.is_admin && !existing.is_admin {
            info!(player_id = id, "Admin rights granted");
        }
        Ok(player)
    }

    /// Removes the player together with their reservations, answers and sessions.
    pub async fn delete_player<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<(), AppError> {
        if !players::delete_player(conn, id).await? {
            return Err(player_not_found(id).into());
        }
        info!(player_id = id, "Player deleted");
        Ok(())
    }

    pub async fn list_players<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<Player>, AppError> {
        Ok(players::list_players(conn).await?)
    }

    pub async fn get_player<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Player, AppError> {
        players::find_by_id(conn, id)
            .await?
            .ok_or_else(|| player_not_found(id).into())
    }
}

impl Default for PlayerService {
    fn default() -> Self {
        Self::new()
    }
}

fn player_not_found(id: i64) -> DomainError {
    DomainError::not_found(NotFoundKind::Player, format!("Player {id} not found"))
}
