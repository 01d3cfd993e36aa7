//! DTOs for reservations_sea adapter.

#[derive(Debug, Clone)]
pub struct ReservationCreate {
    pub question_id: i64,
    pub player_id: i64,
    pub approved: bool,
}

impl ReservationCreate {
    pub fn new(question_id: i64, player_id: i64) -> Self {
        Self {
            question_id,
            player_id,
            approved: false,
        }
    }

    pub fn approved(mut self, approved: bool) -> Self {
        self.approved = approved;
        self
    }
}
