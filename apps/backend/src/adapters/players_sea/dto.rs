//! DTOs for players_sea adapter.

/// DTO for creating a new player.
#[derive(Debug, Clone)]
pub struct PlayerCreate {
    pub nickname: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

impl PlayerCreate {
    pub fn new(
        nickname: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            nickname: nickname.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            is_admin: false,
        }
    }

    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }
}

/// DTO for a partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct PlayerUpdate {
    pub id: i64,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub is_admin: Option<bool>,
}

impl PlayerUpdate {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn with_is_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = Some(is_admin);
        self
    }
}
