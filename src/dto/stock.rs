use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    domain::stock::{self, MovementType, StockStatus},
    models::{Category, Product, StockMovement},
};

fn validate_unit(unit: &str) -> Result<(), ValidationError> {
    if stock::is_valid_unit(unit) {
        Ok(())
    } else {
        Err(ValidationError::new("unit").with_message("unknown unit of measure".into()))
    }
}

fn validate_record_status(status: &str) -> Result<(), ValidationError> {
    match status {
        "Ativo" | "Inativo" => Ok(()),
        _ => Err(ValidationError::new("status")
            .with_message("status must be Ativo or Inativo".into())),
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 2, message = "name must have at least 2 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = "validate_record_status"))]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 2, message = "name must have at least 2 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_record_status"))]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[validate(schema(function = "validate_create_bounds"))]
pub struct CreateProductRequest {
    #[validate(length(min = 2, message = "name must have at least 2 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub category_id: Uuid,
    #[validate(custom(function = "validate_unit"))]
    pub unit: String,
    #[validate(range(min = 1, message = "unit price must be positive"))]
    pub unit_price: i64,
    #[validate(range(min = 0, message = "minimum stock must not be negative"))]
    pub min_stock: i32,
    pub max_stock: Option<i32>,
    pub location: Option<String>,
    #[validate(custom(function = "validate_record_status"))]
    pub status: Option<String>,
    /// Opening quantity, recorded as an `ENTRADA` movement.
    #[validate(range(min = 0, message = "initial quantity must not be negative"))]
    pub initial_quantity: Option<i32>,
}

fn validate_create_bounds(req: &CreateProductRequest) -> Result<(), ValidationError> {
    check_bounds(req.min_stock, req.max_stock)
}

pub fn check_bounds(min_stock: i32, max_stock: Option<i32>) -> Result<(), ValidationError> {
    match max_stock {
        Some(max) if max <= min_stock => Err(ValidationError::new("max_stock")
            .with_message("maximum stock must be greater than minimum stock".into())),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 2, message = "name must have at least 2 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    #[validate(custom(function = "validate_unit"))]
    pub unit: Option<String>,
    #[validate(range(min = 1, message = "unit price must be positive"))]
    pub unit_price: Option<i64>,
    #[validate(range(min = 0, message = "minimum stock must not be negative"))]
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub location: Option<String>,
    #[validate(custom(function = "validate_record_status"))]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateMovementRequest {
    pub product_id: Uuid,
    pub movement_type: MovementType,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: i32,
    #[validate(length(min = 1, message = "reason is required"))]
    pub reason: String,
    pub notes: Option<String>,
    pub reference: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct MovementList {
    #[schema(value_type = Vec<StockMovement>)]
    pub items: Vec<StockMovement>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovementResult {
    pub movement: StockMovement,
    pub product: Product,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StockAlert {
    pub product_id: Uuid,
    pub name: String,
    pub available: i32,
    pub min_stock: i32,
    pub status: StockStatus,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct AlertSnapshot {
    pub items: Vec<StockAlert>,
    pub computed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(min: i32, max: Option<i32>, unit: &str, price: i64) -> CreateProductRequest {
        CreateProductRequest {
            name: "Cabo de aço 12mm".into(),
            description: None,
            category_id: Uuid::new_v4(),
            unit: unit.into(),
            unit_price: price,
            min_stock: min,
            max_stock: max,
            location: None,
            status: None,
            initial_quantity: Some(10),
        }
    }

    #[test]
    fn max_must_exceed_min() {
        assert!(request(10, Some(50), "M", 1_000).validate().is_ok());
        assert!(request(10, Some(10), "M", 1_000).validate().is_err());
        assert!(request(10, None, "M", 1_000).validate().is_ok());
    }

    #[test]
    fn unit_and_price_are_checked() {
        assert!(request(0, None, "TON", 1_000).validate().is_err());
        assert!(request(0, None, "KG", 0).validate().is_err());
    }
}
