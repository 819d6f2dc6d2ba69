use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "logbook_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub crane_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub entry_date: Date,
    pub kind: String,
    pub description: String,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
