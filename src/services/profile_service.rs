//! Self-service views for the employee linked to the logged-in user.

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use validator::Validate;

use crate::{
    dto::{
        auth::ChangePasswordRequest,
        people::{BenefitList, CertificateList, PayslipList, UpdateProfileRequest},
    },
    entity::employees::{
        ActiveModel as EmployeeActive, Column as EmpCol, Entity as Employees,
        Model as EmployeeModel,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Employee,
    response::{ApiResponse, Meta},
    services::{auth_service, employee_service},
    state::AppState,
};

async fn linked_employee(state: &AppState, user: &AuthUser) -> AppResult<EmployeeModel> {
    Employees::find()
        .filter(EmpCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn get_profile(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Employee>> {
    let employee = linked_employee(state, user).await?;
    Ok(ApiResponse::success(
        "Profile",
        Employee::from(employee),
        None,
    ))
}

pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<Employee>> {
    payload.validate()?;
    let mut active: EmployeeActive = linked_employee(state, user).await?.into();
    if let Some(email) = payload.email {
        active.email = Set(Some(email.trim().to_lowercase()));
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone.trim().to_string()));
    }
    if let Some(address) = payload.address {
        active.address = Set(Some(address.trim().to_string()));
    }
    let employee = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Profile updated",
        Employee::from(employee),
        Some(Meta::empty()),
    ))
}

pub async fn payslips(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<PayslipList>> {
    let employee = linked_employee(state, user).await?;
    let list = employee_service::payslips_of(&state.orm, employee.id).await?;
    Ok(ApiResponse::success("Payslips", list, None))
}

pub async fn benefits(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<BenefitList>> {
    let employee = linked_employee(state, user).await?;
    let list = employee_service::benefits_of(&state.orm, employee.id).await?;
    Ok(ApiResponse::success("Benefits", list, None))
}

pub async fn certificates(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CertificateList>> {
    let employee = linked_employee(state, user).await?;
    let list = employee_service::certificates_of(&state.orm, employee.id).await?;
    Ok(ApiResponse::success("Certificates", list, None))
}

pub async fn change_password(
    state: &AppState,
    user: &AuthUser,
    payload: ChangePasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    auth_service::change_password(&state.pool, user, payload).await
}
