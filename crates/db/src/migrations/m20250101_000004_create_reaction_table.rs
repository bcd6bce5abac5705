//! Create reaction table migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reaction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reaction::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reaction::UserId).integer().not_null())
                    .col(ColumnDef::new(Reaction::EntityType).string_len(16).not_null())
                    .col(ColumnDef::new(Reaction::EntityId).integer().not_null())
                    .col(ColumnDef::new(Reaction::Vote).string_len(8).not_null())
                    .col(
                        ColumnDef::new(Reaction::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reaction_user")
                            .from(Reaction::Table, Reaction::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, entity_type, entity_id) - one reaction per user per entity
        manager
            .create_index(
                Index::create()
                    .name("idx_reaction_user_entity")
                    .table(Reaction::Table)
                    .col(Reaction::UserId)
                    .col(Reaction::EntityType)
                    .col(Reaction::EntityId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (entity_type, entity_id) - counting reactions on an entity
        manager
            .create_index(
                Index::create()
                    .name("idx_reaction_entity")
                    .table(Reaction::Table)
                    .col(Reaction::EntityType)
                    .col(Reaction::EntityId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reaction::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Reaction {
    Table,
    Id,
    UserId,
    EntityType,
    EntityId,
    Vote,
    CreatedAt,
}
