//! DTOs for sessions_sea adapter.

use time::OffsetDateTime;

#[derive(Debug, Clone)]
pub struct SessionCreate {
    pub id: String,
    pub player_id: i64,
    pub expires_at: OffsetDateTime,
}
