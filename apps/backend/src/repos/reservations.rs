//! Reservation repository functions for domain layer.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::adapters::reservations_sea::{self as reservations_adapter, ReservationCreate};
use crate::entities::reservations;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reservation {
    pub id: i64,
    pub question_id: i64,
    pub player_id: i64,
    pub approved: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub reserved_at: OffsetDateTime,
}

pub async fn create_reservation<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ReservationCreate,
) -> Result<Reservation, DomainError> {
    let reservation = reservations_adapter::create(conn, dto).await?;
    Ok(Reservation::from(reservation))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Reservation>, DomainError> {
    let reservation = reservations_adapter::find_by_id(conn, id).await?;
    Ok(reservation.map(Reservation::from))
}

pub async fn count_for<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    question_id: i64,
    player_id: i64,
) -> Result<u64, DomainError> {
    Ok(reservations_adapter::count_for(conn, question_id, player_id).await?)
}

pub async fn find_first_for<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    question_id: i64,
    player_id: i64,
) -> Result<Option<Reservation>, DomainError> {
    let reservation = reservations_adapter::find_first_for(conn, question_id, player_id).await?;
    Ok(reservation.map(Reservation::from))
}

pub async fn find_approved_for_question<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    question_id: i64,
) -> Result<Option<Reservation>, DomainError> {
    let reservation = reservations_adapter::find_approved_for_question(conn, question_id).await?;
    Ok(reservation.map(Reservation::from))
}

pub async fn set_approved<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    approved: bool,
) -> Result<Reservation, DomainError> {
    let reservation = reservations_adapter::set_approved(conn, id, approved).await?;
    Ok(Reservation::from(reservation))
}

pub async fn list_reservations<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    question_id: Option<i64>,
) -> Result<Vec<Reservation>, DomainError> {
    let rows = reservations_adapter::list(conn, question_id).await?;
    Ok(rows.into_iter().map(Reservation::from).collect())
}

impl From<reservations::Model> for Reservation {
    fn from(model: reservations::Model) -> Self {
        Self {
            id: model.id,
            question_id: model.question_id,
            player_id: model.player_id,
            approved: model.approved,
            reserved_at: model.reserved_at,
        }
    }
}
