use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{Crane, LogbookEntry, Site, SiteDocument};

pub const LOGBOOK_KINDS: &[&str] = &["checklist", "manutencao", "ocorrencia", "inspecao"];
pub const LOGBOOK_STATUSES: &[&str] = &["ok", "pendente", "resolvido"];

fn validate_kind(kind: &str) -> Result<(), ValidationError> {
    if LOGBOOK_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(ValidationError::new("kind").with_message("unknown logbook entry kind".into()))
    }
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
    if LOGBOOK_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(ValidationError::new("status").with_message("unknown logbook entry status".into()))
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateSiteRequest {
    #[validate(length(min = 2, message = "name must have at least 2 characters"))]
    pub name: String,
    pub client_id: Option<Uuid>,
    pub address: Option<String>,
    pub city: Option<String>,
    #[validate(length(equal = 2, message = "state must be a two-letter code"))]
    pub state: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCraneRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub status: Option<String>,
}

/// Document metadata; the file itself lives in external storage.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateDocumentRequest {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "kind is required"))]
    pub kind: String,
    #[validate(length(min = 1, message = "storage path is required"))]
    pub storage_path: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateLogbookEntryRequest {
    pub employee_id: Option<Uuid>,
    pub entry_date: NaiveDate,
    #[validate(custom(function = "validate_kind"))]
    pub kind: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateLogbookEntryRequest {
    pub employee_id: Option<Uuid>,
    pub entry_date: Option<NaiveDate>,
    #[validate(custom(function = "validate_kind"))]
    pub kind: Option<String>,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SiteDetail {
    pub site: Site,
    pub crane_count: u64,
    pub document_count: u64,
    pub logbook_count: u64,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct SiteList {
    #[schema(value_type = Vec<Site>)]
    pub items: Vec<Site>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CraneList {
    #[schema(value_type = Vec<Crane>)]
    pub items: Vec<Crane>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct DocumentList {
    #[schema(value_type = Vec<SiteDocument>)]
    pub items: Vec<SiteDocument>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct LogbookList {
    #[schema(value_type = Vec<LogbookEntry>)]
    pub items: Vec<LogbookEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CountBy {
    pub key: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogbookStats {
    pub crane_id: Uuid,
    pub total: i64,
    pub by_kind: Vec<CountBy>,
    pub by_status: Vec<CountBy>,
    pub last_entry_date: Option<NaiveDate>,
}
