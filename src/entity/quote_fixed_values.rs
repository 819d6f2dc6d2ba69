use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quote_fixed_values")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub quote_id: Uuid,
    pub value_type: String,
    pub description: String,
    pub quantity: i32,
    pub unit_value: i64,
    pub total: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
