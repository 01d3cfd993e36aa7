//! SeaORM adapters. Functions here speak `sea_orm::DbErr`; the repos layer
//! turns that into `DomainError`.

pub mod answers_sea;
pub mod players_sea;
pub mod questions_sea;
pub mod reservations_sea;
pub mod sessions_sea;
