use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKey, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Players {
    Table,
    Id,
    Nickname,
    Email,
    PasswordHash,
    IsActive,
    IsAdmin,
    DateJoined,
}

#[derive(Iden)]
enum Questions {
    Table,
    Id,
    QuestionText,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum Reservations {
    Table,
    Id,
    QuestionId,
    PlayerId,
    Approved,
    ReservedAt,
}

#[derive(Iden)]
enum Answers {
    Table,
    Id,
    QuestionId,
    PlayerId,
    AnswerText,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum PlayerSessions {
    Table,
    Id,
    PlayerId,
    CreatedAt,
    ExpiresAt,
}

/// At most one approved reservation per question. Partial indexes are not
/// expressible through the index builder on every backend, so this one is raw
/// SQL valid for both postgres and sqlite.
const CREATE_ONE_APPROVED_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS \
     ux_reservations_one_approved ON reservations (question_id) WHERE approved";
const DROP_ONE_APPROVED_INDEX: &str = "DROP INDEX IF EXISTS ux_reservations_one_approved";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ---- players ----
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Players::Nickname).string().not_null())
                    .col(
                        ColumnDef::new(Players::Email)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Players::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Players::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Players::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Players::DateJoined)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_players_nickname")
                    .table(Players::Table)
                    .col(Players::Nickname)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ---- questions ----
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Questions::QuestionText).text().not_null())
                    .col(
                        ColumnDef::new(Questions::Status)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Questions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_questions_status_created_at")
                    .table(Questions::Table)
                    .col(Questions::Status)
                    .col(Questions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ---- reservations ----
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(Reservations::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::Approved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Reservations::ReservedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_question_id")
                            .from(Reservations::Table, Reservations::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_player_id")
                            .from(Reservations::Table, Reservations::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Not unique: a (question, player) pair may hold several rows.
        manager
            .create_index(
                Index::create()
                    .name("ix_reservations_question_player")
                    .table(Reservations::Table)
                    .col(Reservations::QuestionId)
                    .col(Reservations::PlayerId)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(CREATE_ONE_APPROVED_INDEX)
            .await?;

        // ---- answers ----
        manager
            .create_table(
                Table::create()
                    .table(Answers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Answers::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Answers::QuestionId).big_integer().not_null())
                    .col(ColumnDef::new(Answers::PlayerId).big_integer().not_null())
                    .col(ColumnDef::new(Answers::AnswerText).text().not_null())
                    .col(
                        ColumnDef::new(Answers::Status)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Answers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_answers_question_id")
                            .from(Answers::Table, Answers::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_answers_player_id")
                            .from(Answers::Table, Answers::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_answers_question")
                    .table(Answers::Table)
                    .col(Answers::QuestionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ---- player_sessions ----
        manager
            .create_table(
                Table::create()
                    .table(PlayerSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlayerSessions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PlayerSessions::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlayerSessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlayerSessions::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_sessions_player_id")
                            .from(PlayerSessions::Table, PlayerSessions::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_player_sessions_player_id")
                    .table(PlayerSessions::Table)
                    .col(PlayerSessions::PlayerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_player_sessions_expires_at")
                    .table(PlayerSessions::Table)
                    .col(PlayerSessions::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // reverse order; indexes go with their tables
        manager
            .drop_table(
                Table::drop()
                    .table(PlayerSessions::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Answers::Table).if_exists().to_owned())
            .await?;

        manager
            .get_connection()
            .execute_unprepared(DROP_ONE_APPROVED_INDEX)
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .table(Reservations::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Questions::Table).if_exists().to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Players::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
