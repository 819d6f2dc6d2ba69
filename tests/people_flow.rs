mod common;

use chrono::NaiveDate;
use grua_ops_api::{
    dto::{
        auth::{ChangePasswordRequest, LoginRequest, RegisterRequest},
        people::{
            CreateBenefitRequest, CreateCertificateRequest, CreateEmployeeRequest,
            CreatePayslipRequest, UpdateEmployeeRequest, UpdateProfileRequest,
        },
    },
    error::AppError,
    middleware::auth::{AuthUser, Role},
    services::{auth_service, employee_service, profile_service},
};

fn employee_request(user_id: Option<uuid::Uuid>, name: &str) -> CreateEmployeeRequest {
    CreateEmployeeRequest {
        user_id,
        name: name.into(),
        job_title: "Operador de Grua".into(),
        email: None,
        phone: None,
        cpf: None,
        address: None,
        hired_at: NaiveDate::from_ymd_opt(2023, 2, 1),
    }
}

#[tokio::test]
async fn employee_records_show_up_on_the_profile() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;
    let admin = common::create_user(&state, Role::Admin, "admin@grua.local").await?;
    let supervisor = common::create_user(&state, Role::Supervisor, "sup@grua.local").await?;

    let registered = auth_service::register_user(
        &state.pool,
        RegisterRequest {
            email: "operador@grua.local".into(),
            password: "operador123".into(),
        },
    )
    .await?
    .data
    .unwrap();
    let operator = AuthUser {
        user_id: registered.id,
        role: Role::Employee,
    };

    let unlinked = profile_service::get_profile(&state, &operator).await;
    assert!(matches!(unlinked, Err(AppError::NotFound)));

    let by_supervisor = employee_service::create_employee(
        &state,
        &supervisor,
        employee_request(Some(operator.user_id), "João Pereira"),
    )
    .await;
    assert!(matches!(by_supervisor, Err(AppError::Forbidden)));

    let employee = employee_service::create_employee(
        &state,
        &admin,
        employee_request(Some(operator.user_id), "João Pereira"),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(employee.status, "Ativo");

    let second_link = employee_service::create_employee(
        &state,
        &admin,
        employee_request(Some(operator.user_id), "João P."),
    )
    .await;
    assert!(matches!(second_link, Err(AppError::Conflict(_))));

    let bad_status = employee_service::update_employee(
        &state,
        &admin,
        employee.id,
        UpdateEmployeeRequest {
            name: None,
            job_title: None,
            email: None,
            phone: None,
            address: None,
            status: Some("Férias".into()),
        },
    )
    .await;
    assert!(matches!(bad_status, Err(AppError::BadRequest(_))));

    let overpaid = employee_service::add_payslip(
        &state,
        &admin,
        employee.id,
        CreatePayslipRequest {
            reference_month: "2024-05".into(),
            gross_amount: 500_000,
            net_amount: 600_000,
            storage_path: None,
        },
    )
    .await;
    assert!(matches!(overpaid, Err(AppError::BadRequest(_))));

    employee_service::add_payslip(
        &state,
        &admin,
        employee.id,
        CreatePayslipRequest {
            reference_month: "2024-05".into(),
            gross_amount: 650_000,
            net_amount: 520_000,
            storage_path: Some("payslips/2024-05.pdf".into()),
        },
    )
    .await?;
    employee_service::add_benefit(
        &state,
        &admin,
        employee.id,
        CreateBenefitRequest {
            kind: "vale_refeicao".into(),
            description: None,
            monthly_value: 80_000,
        },
    )
    .await?;

    let expired_first = employee_service::add_certificate(
        &state,
        &admin,
        employee.id,
        CreateCertificateRequest {
            name: "NR-11".into(),
            issuer: None,
            issued_at: NaiveDate::from_ymd_opt(2024, 1, 10),
            expires_at: NaiveDate::from_ymd_opt(2023, 1, 10),
            storage_path: None,
        },
    )
    .await;
    assert!(matches!(expired_first, Err(AppError::BadRequest(_))));

    let profile = profile_service::update_profile(
        &state,
        &operator,
        UpdateProfileRequest {
            email: Some("joao@grua.local".into()),
            phone: Some("11 99999-0000".into()),
            address: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(profile.id, employee.id);
    assert_eq!(profile.email.as_deref(), Some("joao@grua.local"));

    let payslips = profile_service::payslips(&state, &operator).await?.data.unwrap();
    assert_eq!(payslips.items.len(), 1);
    assert_eq!(payslips.items[0].net_amount, 520_000);
    let benefits = profile_service::benefits(&state, &operator).await?.data.unwrap();
    assert_eq!(benefits.items.len(), 1);
    let certificates = profile_service::certificates(&state, &operator)
        .await?
        .data
        .unwrap();
    assert!(certificates.items.is_empty());

    let wrong = profile_service::change_password(
        &state,
        &operator,
        ChangePasswordRequest {
            current_password: "errada".into(),
            new_password: "novasenha123".into(),
        },
    )
    .await;
    assert!(matches!(wrong, Err(AppError::BadRequest(_))));

    profile_service::change_password(
        &state,
        &operator,
        ChangePasswordRequest {
            current_password: "operador123".into(),
            new_password: "novasenha123".into(),
        },
    )
    .await?;
    let login = auth_service::login_user(
        &state.pool,
        common::JWT_SECRET,
        LoginRequest {
            email: "operador@grua.local".into(),
            password: "novasenha123".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(login.role, "employee");

    Ok(())
}
