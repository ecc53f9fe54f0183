use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "game_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub player1: String,
    pub player2: Option<String>,
    pub word: String,
    pub winner: Option<String>,
    pub game_mode: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
