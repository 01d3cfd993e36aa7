//! Reservation race: players queue up, the admin approves one.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::{debug, info};

use super::questions::question_not_found;
use crate::adapters::reservations_sea::ReservationCreate;
use crate::domain::status_after_reservation_saved;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::reservations::{self, Reservation};
use crate::repos::{players, questions};

/// Where a player stands once the admin has (or has not) picked a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReservationOutcome {
    Won { reservation_id: i64 },
    Lost { approved_player: String },
    Pending,
}

pub struct ReservationService;

impl ReservationService {
    pub fn new() -> Self {
        Self
    }

    /// Inserts unconditionally and re-derives the question status.
    pub async fn create_reservation<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        question_id: i64,
        player_id: i64,
    ) -> Result<Reservation, AppError> {
        questions::find_by_id(conn, question_id)
            .await?
            .ok_or_else(|| question_not_found(question_id))?;

        let reservation = reservations::create_reservation(
            conn,
            ReservationCreate::new(question_id, player_id),
        )
        .await?;
        apply_save_rule(conn, &reservation).await?;

        info!(
            reservation_id = reservation.id,
            question_id,
            player_id,
            "Reservation created"
        );
        Ok(reservation)
    }

    /// A player's first reservation on a question is recorded; later ones return it unchanged.
    pub async fn reserve_if_first<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        question_id: i64,
        player_id: i64,
    ) -> Result<(Reservation, bool), AppError> {
        if reservations::count_for(conn, question_id, player_id).await? == 0 {
            let reservation = self
                .create_reservation(conn, question_id, player_id)
                .await?;
            return Ok((reservation, true));
        }

        let existing = reservations::find_first_for(conn, question_id, player_id)
            .await?
            .ok_or_else(|| reservation_not_found_for(question_id))?;
        debug!(
            reservation_id = existing.id,
            question_id, player_id, "Reservation already held"
        );
        Ok((existing, false))
    }

    /// A second approval on the same question fails on the partial unique index.
    pub async fn set_approved<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        reservation_id: i64,
        approved: bool,
    ) -> Result<Reservation, AppError> {
        self.get_reservation(conn, reservation_id).await?;
        let reservation = reservations::set_approved(conn, reservation_id, approved).await?;
        apply_save_rule(conn, &reservation).await?;
        Ok(reservation)
    }

    pub async fn steer<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        question_id: i64,
        player_id: i64,
    ) -> Result<ReservationOutcome, AppError> {
        questions::find_by_id(conn, question_id)
            .await?
            .ok_or_else(|| question_not_found(question_id))?;

        let Some(approved) = reservations::find_approved_for_question(conn, question_id).await?
        else {
            return Ok(ReservationOutcome::Pending);
        };

        if approved.player_id == player_id {
            return Ok(ReservationOutcome::Won {
                reservation_id: approved.id,
            });
        }

        let winner = players::find_by_id(conn, approved.player_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Player,
                    format!("Player {} not found", approved.player_id),
                )
            })?;
        Ok(ReservationOutcome::Lost {
            approved_player: winner.nickname,
        })
    }

    pub async fn list_reservations<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        question_id: Option<i64>,
    ) -> Result<Vec<Reservation>, AppError> {
        Ok(reservations::list_reservations(conn, question_id).await?)
    }

    pub async fn get_reservation<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Reservation, AppError> {
        reservations::find_by_id(conn, id).await?.ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Reservation,
                format!("Reservation {id} not found"),
            )
            .into()
        })
    }
}

impl Default for ReservationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Question status follows the reservation that was just written.
async fn apply_save_rule<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    reservation: &Reservation,
) -> Result<(), AppError> {
    let target = status_after_reservation_saved(reservation.approved);
    let before = questions::find_by_id(conn, reservation.question_id)
        .await?
        .ok_or_else(|| question_not_found(reservation.question_id))?;
    if before.status != target {
        questions::update_status(conn, reservation.question_id, target).await?;
        info!(
            question_id = reservation.question_id,
            reservation_id = reservation.id,
            from = ?before.status,
            to = ?target,
            "Question status follows reservation"
        );
    }
    Ok(())
}

fn reservation_not_found_for(question_id: i64) -> DomainError {
    DomainError::not_found(
        NotFoundKind::Reservation,
        format!("No reservation on question {question_id}"),
    )
}
