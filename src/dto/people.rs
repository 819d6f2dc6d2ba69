use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{Benefit, Certificate, Client, Employee, Payslip};

fn validate_reference_month(value: &str) -> Result<(), ValidationError> {
    let parsed = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d");
    if value.len() == 7 && parsed.is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("reference_month").with_message("expected YYYY-MM".into()))
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateEmployeeRequest {
    pub user_id: Option<Uuid>,
    #[validate(length(min = 2, message = "name must have at least 2 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "job title is required"))]
    pub job_title: String,
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(length(equal = 11, message = "cpf must have 11 digits"))]
    pub cpf: Option<String>,
    pub address: Option<String>,
    pub hired_at: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateEmployeeRequest {
    #[validate(length(min = 2, message = "name must have at least 2 characters"))]
    pub name: Option<String>,
    pub job_title: Option<String>,
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
}

/// Fields an employee may change on their own profile.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreatePayslipRequest {
    #[validate(custom(function = "validate_reference_month"))]
    pub reference_month: String,
    #[validate(range(min = 0))]
    pub gross_amount: i64,
    #[validate(range(min = 0))]
    pub net_amount: i64,
    pub storage_path: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateBenefitRequest {
    #[validate(length(min = 1, message = "kind is required"))]
    pub kind: String,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub monthly_value: i64,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCertificateRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub issuer: Option<String>,
    pub issued_at: Option<NaiveDate>,
    pub expires_at: Option<NaiveDate>,
    pub storage_path: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 2, message = "name must have at least 2 characters"))]
    pub name: String,
    #[validate(length(equal = 14, message = "cnpj must have 14 digits"))]
    pub cnpj: Option<String>,
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct EmployeeList {
    #[schema(value_type = Vec<Employee>)]
    pub items: Vec<Employee>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ClientList {
    #[schema(value_type = Vec<Client>)]
    pub items: Vec<Client>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct PayslipList {
    #[schema(value_type = Vec<Payslip>)]
    pub items: Vec<Payslip>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct BenefitList {
    #[schema(value_type = Vec<Benefit>)]
    pub items: Vec<Benefit>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CertificateList {
    #[schema(value_type = Vec<Certificate>)]
    pub items: Vec<Certificate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_month_format() {
        assert!(validate_reference_month("2024-05").is_ok());
        assert!(validate_reference_month("2024-13").is_err());
        assert!(validate_reference_month("05/2024").is_err());
    }
}
