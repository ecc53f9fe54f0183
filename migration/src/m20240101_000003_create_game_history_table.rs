use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GameHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameHistory::Player1).string().not_null())
                    .col(ColumnDef::new(GameHistory::Player2).string().null())
                    .col(ColumnDef::new(GameHistory::Word).string().not_null())
                    .col(ColumnDef::new(GameHistory::Winner).string().null())
                    .col(ColumnDef::new(GameHistory::GameMode).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create indexes for per-player history lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_game_history_player1")
                    .table(GameHistory::Table)
                    .col(GameHistory::Player1)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_history_player2")
                    .table(GameHistory::Table)
                    .col(GameHistory::Player2)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GameHistory {
    Table,
    Id,
    Player1,
    Player2,
    Word,
    Winner,
    GameMode,
}
