use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::stock::{StockStatus, stock_status},
    entity,
};

fn clock(value: Option<NaiveTime>) -> Option<String> {
    value.map(|t| t.format("%H:%M").to_string())
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<entity::categories::Model> for Category {
    fn from(m: entity::categories::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            status: m.status,
            created_at: m.created_at.into(),
        }
    }
}

/// Stock snapshot of one product.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct StockLevel {
    pub available: i32,
    pub reserved: i32,
    pub total_value: i64,
    pub status: StockStatus,
    pub last_movement_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Uuid,
    pub unit: String,
    pub unit_price: i64,
    pub min_stock: i32,
    pub max_stock: Option<i32>,
    pub location: Option<String>,
    pub status: String,
    pub stock: StockLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn from_parts(
        m: entity::products::Model,
        level: Option<entity::stock_levels::Model>,
    ) -> Self {
        let (available, reserved, total_value, last_movement_at) = match level {
            Some(level) => (
                level.available,
                level.reserved,
                level.total_value,
                level.last_movement_at.map(Into::into),
            ),
            None => (0, 0, 0, None),
        };
        Self {
            stock: StockLevel {
                available,
                reserved,
                total_value,
                status: stock_status(available, m.min_stock),
                last_movement_at,
            },
            id: m.id,
            name: m.name,
            description: m.description,
            category_id: m.category_id,
            unit: m.unit,
            unit_price: m.unit_price,
            min_stock: m.min_stock,
            max_stock: m.max_stock,
            location: m.location,
            status: m.status,
            created_at: m.created_at.into(),
            updated_at: m.updated_at.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub movement_type: String,
    pub quantity: i32,
    pub quantity_before: i32,
    pub quantity_after: i32,
    pub reason: String,
    pub notes: Option<String>,
    pub reference: Option<String>,
    pub responsible_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<entity::stock_movements::Model> for StockMovement {
    fn from(m: entity::stock_movements::Model) -> Self {
        Self {
            id: m.id,
            product_id: m.product_id,
            movement_type: m.movement_type,
            quantity: m.quantity,
            quantity_before: m.quantity_before,
            quantity_after: m.quantity_after,
            reason: m.reason,
            notes: m.notes,
            reference: m.reference,
            responsible_id: m.responsible_id,
            created_at: m.created_at.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub cnpj: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<entity::clients::Model> for Client {
    fn from(m: entity::clients::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            cnpj: m.cnpj,
            email: m.email,
            phone: m.phone,
            created_at: m.created_at.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Quote {
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
    pub estimated_start: Option<NaiveDate>,
    pub valid_until: NaiveDate,
    pub payment_conditions: Option<String>,
    pub notes: Option<String>,
    pub total: i64,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::quotes::Model> for Quote {
    fn from(m: entity::quotes::Model) -> Self {
        Self {
            id: m.id,
            number: m.number,
            kind: m.kind,
            client_id: m.client_id,
            site_name: m.site_name,
            site_address: m.site_address,
            site_type: m.site_type,
            equipment: m.equipment,
            initial_height: m.initial_height,
            final_height: m.final_height,
            boom_length: m.boom_length,
            max_load: m.max_load,
            tip_load: m.tip_load,
            lease_months: m.lease_months,
            estimated_start: m.estimated_start,
            valid_until: m.valid_until,
            payment_conditions: m.payment_conditions,
            notes: m.notes,
            total: m.total,
            status: m.status,
            created_by: m.created_by,
            created_at: m.created_at.into(),
            updated_at: m.updated_at.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteMonthlyCost {
    pub id: Uuid,
    pub cost_type: String,
    pub description: String,
    pub monthly_value: i64,
    pub required: bool,
    pub total: i64,
}

impl From<entity::quote_monthly_costs::Model> for QuoteMonthlyCost {
    fn from(m: entity::quote_monthly_costs::Model) -> Self {
        Self {
            id: m.id,
            cost_type: m.cost_type,
            description: m.description,
            monthly_value: m.monthly_value,
            required: m.required,
            total: m.total,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteFixedValue {
    pub id: Uuid,
    pub value_type: String,
    pub description: String,
    pub quantity: i32,
    pub unit_value: i64,
    pub total: i64,
}

impl From<entity::quote_fixed_values::Model> for QuoteFixedValue {
    fn from(m: entity::quote_fixed_values::Model) -> Self {
        Self {
            id: m.id,
            value_type: m.value_type,
            description: m.description,
            quantity: m.quantity,
            unit_value: m.unit_value,
            total: m.total,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteItem {
    pub id: Uuid,
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

impl From<entity::quote_items::Model> for QuoteItem {
    fn from(m: entity::quote_items::Model) -> Self {
        Self {
            id: m.id,
            sku: m.sku,
            name: m.name,
            description: m.description,
            pricing_mode: m.pricing_mode,
            unit: m.unit,
            item_type: m.item_type,
            quantity: m.quantity,
            unit_price: m.unit_price,
            total: m.total,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Employee {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub job_title: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub cpf: Option<String>,
    pub address: Option<String>,
    pub hired_at: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<entity::employees::Model> for Employee {
    fn from(m: entity::employees::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            name: m.name,
            job_title: m.job_title,
            email: m.email,
            phone: m.phone,
            cpf: m.cpf,
            address: m.address,
            hired_at: m.hired_at,
            status: m.status,
            created_at: m.created_at.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimesheetEntry {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub entry_date: NaiveDate,
    /// `HH:MM`
    pub clock_in: Option<String>,
    pub lunch_out: Option<String>,
    pub lunch_in: Option<String>,
    pub clock_out: Option<String>,
    pub worked_hours: f64,
    pub overtime_hours: f64,
    pub status: String,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub observations: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::timesheet_entries::Model> for TimesheetEntry {
    fn from(m: entity::timesheet_entries::Model) -> Self {
        Self {
            id: m.id,
            employee_id: m.employee_id,
            entry_date: m.entry_date,
            clock_in: clock(m.clock_in),
            lunch_out: clock(m.lunch_out),
            lunch_in: clock(m.lunch_in),
            clock_out: clock(m.clock_out),
            worked_hours: m.worked_hours,
            overtime_hours: m.overtime_hours,
            status: m.status,
            approved_by: m.approved_by,
            approved_at: m.approved_at.map(Into::into),
            observations: m.observations,
            created_at: m.created_at.into(),
            updated_at: m.updated_at.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Justification {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub entry_date: NaiveDate,
    pub kind: String,
    pub reason: String,
    pub status: String,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<entity::justifications::Model> for Justification {
    fn from(m: entity::justifications::Model) -> Self {
        Self {
            id: m.id,
            employee_id: m.employee_id,
            entry_date: m.entry_date,
            kind: m.kind,
            reason: m.reason,
            status: m.status,
            reviewed_by: m.reviewed_by,
            reviewed_at: m.reviewed_at.map(Into::into),
            created_at: m.created_at.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Site {
    pub id: Uuid,
    pub name: String,
    pub client_id: Option<Uuid>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<entity::sites::Model> for Site {
    fn from(m: entity::sites::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            client_id: m.client_id,
            address: m.address,
            city: m.city,
            state: m.state,
            status: m.status,
            created_at: m.created_at.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Crane {
    pub id: Uuid,
    pub name: String,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub site_id: Option<Uuid>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<entity::cranes::Model> for Crane {
    fn from(m: entity::cranes::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            model: m.model,
            manufacturer: m.manufacturer,
            site_id: m.site_id,
            status: m.status,
            created_at: m.created_at.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SiteDocument {
    pub id: Uuid,
    pub site_id: Uuid,
    pub title: String,
    pub kind: String,
    pub storage_path: String,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<entity::site_documents::Model> for SiteDocument {
    fn from(m: entity::site_documents::Model) -> Self {
        Self {
            id: m.id,
            site_id: m.site_id,
            title: m.title,
            kind: m.kind,
            storage_path: m.storage_path,
            uploaded_by: m.uploaded_by,
            created_at: m.created_at.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogbookEntry {
    pub id: Uuid,
    pub crane_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub entry_date: NaiveDate,
    pub kind: String,
    pub description: String,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::logbook_entries::Model> for LogbookEntry {
    fn from(m: entity::logbook_entries::Model) -> Self {
        Self {
            id: m.id,
            crane_id: m.crane_id,
            employee_id: m.employee_id,
            entry_date: m.entry_date,
            kind: m.kind,
            description: m.description,
            status: m.status,
            created_by: m.created_by,
            created_at: m.created_at.into(),
            updated_at: m.updated_at.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Payslip {
    pub id: Uuid,
    pub employee_id: Uuid,
    /// `YYYY-MM`
    pub reference_month: String,
    pub gross_amount: i64,
    pub net_amount: i64,
    pub storage_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<entity::payslips::Model> for Payslip {
    fn from(m: entity::payslips::Model) -> Self {
        Self {
            id: m.id,
            employee_id: m.employee_id,
            reference_month: m.reference_month,
            gross_amount: m.gross_amount,
            net_amount: m.net_amount,
            storage_path: m.storage_path,
            created_at: m.created_at.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Benefit {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub kind: String,
    pub description: Option<String>,
    pub monthly_value: i64,
    pub created_at: DateTime<Utc>,
}

impl From<entity::benefits::Model> for Benefit {
    fn from(m: entity::benefits::Model) -> Self {
        Self {
            id: m.id,
            employee_id: m.employee_id,
            kind: m.kind,
            description: m.description,
            monthly_value: m.monthly_value,
            created_at: m.created_at.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Certificate {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub name: String,
    pub issuer: Option<String>,
    pub issued_at: Option<NaiveDate>,
    pub expires_at: Option<NaiveDate>,
    pub storage_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<entity::certificates::Model> for Certificate {
    fn from(m: entity::certificates::Model) -> Self {
        Self {
            id: m.id,
            employee_id: m.employee_id,
            name: m.name,
            issuer: m.issuer,
            issued_at: m.issued_at,
            expires_at: m.expires_at,
            storage_path: m.storage_path,
            created_at: m.created_at.into(),
        }
    }
}
