use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "timesheet_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub employee_id: Uuid,
    pub entry_date: Date,
    pub clock_in: Option<Time>,
    pub lunch_out: Option<Time>,
    pub lunch_in: Option<Time>,
    pub clock_out: Option<Time>,
    pub worked_hours: f64,
    pub overtime_hours: f64,
    pub status: String,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub observations: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
