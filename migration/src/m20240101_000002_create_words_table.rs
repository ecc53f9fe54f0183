use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Words::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Words::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Words::Word).string().not_null())
                    .col(ColumnDef::new(Words::Category).string().not_null())
                    .col(ColumnDef::new(Words::Hint).string().null())
                    .to_owned(),
            )
            .await?;

        // Word draws filter by category
        manager
            .create_index(
                Index::create()
                    .name("idx_words_category")
                    .table(Words::Table)
                    .col(Words::Category)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Words::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Words {
    Table,
    Id,
    Word,
    Category,
    Hint,
}
