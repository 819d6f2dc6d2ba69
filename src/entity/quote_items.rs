use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quote_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub quote_id: Uuid,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub pricing_mode: String,
    pub unit: String,
    pub item_type: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub total: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
