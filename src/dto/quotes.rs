use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    domain::pricing::{
        ComplementSelection, FixedValueLine, MonthlyCostLine, PricingMode, QuoteBreakdown,
        QuoteKind,
    },
    models::{Quote, QuoteFixedValue, QuoteItem, QuoteMonthlyCost},
};

/// Header and lines of a quote, shared by create, update and preview.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[validate(schema(function = "validate_for_sending"))]
pub struct QuoteRequest {
    pub kind: QuoteKind,
    pub client_id: Option<Uuid>,
    pub site_name: Option<String>,
    pub site_address: Option<String>,
    pub site_type: Option<String>,
    pub equipment: Option<String>,
    pub initial_height: Option<String>,
    pub final_height: Option<String>,
    pub boom_length: Option<String>,
    pub max_load: Option<String>,
    pub tip_load: Option<String>,
    /// Lease duration; drafts default to one month.
    pub lease_months: Option<i32>,
    pub estimated_start: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub payment_conditions: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub monthly_costs: Vec<MonthlyCostLine>,
    #[serde(default)]
    #[validate(nested)]
    pub fixed_values: Vec<FixedValueLine>,
    #[serde(default)]
    #[validate(nested)]
    pub complements: Vec<ComplementSelection>,
    /// Submit as `enviado`; otherwise the quote is saved as a draft.
    #[serde(default)]
    pub send: bool,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

fn validate_for_sending(req: &QuoteRequest) -> Result<(), ValidationError> {
    if req.client_id.is_none() {
        return Err(ValidationError::new("client_id").with_message("client is required".into()));
    }
    if !req.send {
        return Ok(());
    }
    if is_blank(&req.site_name) {
        return Err(ValidationError::new("site_name").with_message("site name is required".into()));
    }
    if is_blank(&req.equipment) {
        return Err(ValidationError::new("equipment").with_message("equipment is required".into()));
    }
    match req.lease_months {
        Some(months) if months >= 1 => Ok(()),
        _ => Err(ValidationError::new("lease_months")
            .with_message("lease duration of at least one month is required".into())),
    }
}

impl QuoteRequest {
    pub fn lease_months_or_default(&self) -> i32 {
        self.lease_months.unwrap_or(1)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteDetail {
    pub quote: Quote,
    pub monthly_costs: Vec<QuoteMonthlyCost>,
    pub fixed_values: Vec<QuoteFixedValue>,
    pub items: Vec<QuoteItem>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct QuoteList {
    #[schema(value_type = Vec<Quote>)]
    pub items: Vec<Quote>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuotePreview {
    pub kind: QuoteKind,
    pub breakdown: QuoteBreakdown,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComplementOption {
    pub sku: String,
    pub name: String,
    pub pricing_mode: PricingMode,
    pub unit: String,
    pub unit_price: i64,
    pub description: String,
    pub item_type: String,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ComplementCatalog {
    #[schema(value_type = Vec<ComplementOption>)]
    pub items: Vec<ComplementOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuoteRequest {
        serde_json::from_value(serde_json::json!({
            "kind": "locacao",
            "client_id": Uuid::new_v4(),
        }))
        .unwrap()
    }

    #[test]
    fn drafts_need_only_a_client() {
        let req = draft();
        assert!(req.validate().is_ok());
        assert_eq!(req.lease_months_or_default(), 1);

        let mut no_client = draft();
        no_client.client_id = None;
        assert!(no_client.validate().is_err());
    }

    #[test]
    fn sending_requires_site_equipment_and_duration() {
        let mut req = draft();
        req.send = true;
        assert!(req.validate().is_err());

        req.site_name = Some("Residencial Alpha".into());
        req.equipment = Some("Grua torre 6t".into());
        assert!(req.validate().is_err());

        req.lease_months = Some(12);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn nested_lines_are_validated() {
        let mut req = draft();
        req.monthly_costs.push(MonthlyCostLine {
            cost_type: "locacao".into(),
            description: String::new(),
            monthly_value: 100,
            required: true,
        });
        assert!(req.validate().is_err());
    }
}
