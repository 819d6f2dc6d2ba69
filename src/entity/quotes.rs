use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quotes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub number: String,
    pub kind: String,
    pub client_id: Uuid,
    pub site_name: Option<String>,
    pub site_address: Option<String>,
    pub site_type: Option<String>,
    pub equipment: Option<String>,
    pub initial_height: Option<String>,
    pub final_height: Option<String>,
    pub boom_length: Option<String>,
    pub max_load: Option<String>,
    pub tip_load: Option<String>,
    pub lease_months: i32,
    pub estimated_start: Option<Date>,
    pub valid_until: Date,
    pub payment_conditions: Option<String>,
    pub notes: Option<String>,
    pub total: i64,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Clients,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
