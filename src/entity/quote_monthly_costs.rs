use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quote_monthly_costs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub quote_id: Uuid,
    pub cost_type: String,
    pub description: String,
    pub monthly_value: i64,
    pub required: bool,
    pub total: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
