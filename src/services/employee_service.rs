use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    db::OrmConn,
    dto::people::{
        BenefitList, CertificateList, CreateBenefitRequest, CreateCertificateRequest,
        CreateEmployeeRequest, CreatePayslipRequest, EmployeeList, PayslipList,
        UpdateEmployeeRequest,
    },
    entity::{
        benefits::{ActiveModel as BenefitActive, Column as BenefitCol, Entity as Benefits},
        certificates::{
            ActiveModel as CertificateActive, Column as CertCol, Entity as Certificates,
        },
        employees::{
            ActiveModel as EmployeeActive, Column as EmpCol, Entity as Employees,
            Model as EmployeeModel,
        },
        payslips::{ActiveModel as PayslipActive, Column as PayslipCol, Entity as Payslips},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_approver},
    models::{Benefit, Certificate, Employee, Payslip},
    response::{ApiResponse, Meta},
    routes::params::SearchQuery,
    state::AppState,
};

pub(crate) async fn find_employee(orm: &OrmConn, id: Uuid) -> AppResult<EmployeeModel> {
    Employees::find_by_id(id)
        .one(orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn ensure_user_unlinked(
    state: &AppState,
    user_id: Uuid,
    except: Option<Uuid>,
) -> AppResult<()> {
    if Users::find_by_id(user_id).one(&state.orm).await?.is_none() {
        return Err(AppError::BadRequest(format!("user {user_id} not found")));
    }
    let mut finder = Employees::find().filter(EmpCol::UserId.eq(user_id));
    if let Some(id) = except {
        finder = finder.filter(EmpCol::Id.ne(id));
    }
    if finder.one(&state.orm).await?.is_some() {
        return Err(AppError::Conflict("user already linked to an employee".into()));
    }
    Ok(())
}

pub async fn create_employee(
    state: &AppState,
    user: &AuthUser,
    payload: CreateEmployeeRequest,
) -> AppResult<ApiResponse<Employee>> {
    ensure_admin(user)?;
    payload.validate()?;
    if let Some(user_id) = payload.user_id {
        ensure_user_unlinked(state, user_id, None).await?;
    }

    let employee = EmployeeActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(payload.user_id),
        name: Set(payload.name.trim().to_string()),
        job_title: Set(payload.job_title.trim().to_string()),
        email: Set(payload.email.map(|e| e.trim().to_lowercase())),
        phone: Set(payload.phone),
        cpf: Set(payload.cpf),
        address: Set(payload.address),
        hired_at: Set(payload.hired_at),
        status: Set("Ativo".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "employee_create",
        "employees",
        serde_json::json!({ "employee_id": employee.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Employee created",
        Employee::from(employee),
        Some(Meta::empty()),
    ))
}

pub async fn list_employees(
    state: &AppState,
    user: &AuthUser,
    query: SearchQuery,
) -> AppResult<ApiResponse<EmployeeList>> {
    ensure_approver(user)?;
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    if let Some(q) = query.q.as_ref().filter(|q| !q.trim().is_empty()) {
        let pattern = format!("%{}%", q.trim());
        condition = condition.add(
            Condition::any()
                .add(Expr::col(EmpCol::Name).ilike(pattern.clone()))
                .add(Expr::col(EmpCol::JobTitle).ilike(pattern)),
        );
    }
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(EmpCol::Status.eq(status.clone()));
    }

    let finder = Employees::find().filter(condition).order_by_asc(EmpCol::Name);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Employee::from)
        .collect();

    Ok(ApiResponse::success(
        "Employees",
        EmployeeList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_employee(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Employee>> {
    ensure_approver(user)?;
    let employee = find_employee(&state.orm, id).await?;
    Ok(ApiResponse::success(
        "Employee",
        Employee::from(employee),
        None,
    ))
}

pub async fn update_employee(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateEmployeeRequest,
) -> AppResult<ApiResponse<Employee>> {
    ensure_admin(user)?;
    payload.validate()?;
    if let Some(status) = payload.status.as_deref() {
        if status != "Ativo" && status != "Inativo" {
            return Err(AppError::BadRequest("status must be Ativo or Inativo".into()));
        }
    }

    let mut active: EmployeeActive = find_employee(&state.orm, id).await?.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(job_title) = payload.job_title {
        active.job_title = Set(job_title.trim().to_string());
    }
    if let Some(email) = payload.email {
        active.email = Set(Some(email.trim().to_lowercase()));
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(address) = payload.address {
        active.address = Set(Some(address));
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    let employee = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Employee updated",
        Employee::from(employee),
        Some(Meta::empty()),
    ))
}

pub async fn add_payslip(
    state: &AppState,
    user: &AuthUser,
    employee_id: Uuid,
    payload: CreatePayslipRequest,
) -> AppResult<ApiResponse<Payslip>> {
    ensure_admin(user)?;
    payload.validate()?;
    if payload.net_amount > payload.gross_amount {
        return Err(AppError::BadRequest(
            "net amount cannot exceed gross amount".into(),
        ));
    }
    let employee = find_employee(&state.orm, employee_id).await?;

    let payslip = PayslipActive {
        id: Set(Uuid::new_v4()),
        employee_id: Set(employee.id),
        reference_month: Set(payload.reference_month),
        gross_amount: Set(payload.gross_amount),
        net_amount: Set(payload.net_amount),
        storage_path: Set(payload.storage_path),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Payslip created",
        Payslip::from(payslip),
        Some(Meta::empty()),
    ))
}

pub async fn add_benefit(
    state: &AppState,
    user: &AuthUser,
    employee_id: Uuid,
    payload: CreateBenefitRequest,
) -> AppResult<ApiResponse<Benefit>> {
    ensure_admin(user)?;
    payload.validate()?;
    let employee = find_employee(&state.orm, employee_id).await?;

    let benefit = BenefitActive {
        id: Set(Uuid::new_v4()),
        employee_id: Set(employee.id),
        kind: Set(payload.kind),
        description: Set(payload.description),
        monthly_value: Set(payload.monthly_value),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Benefit created",
        Benefit::from(benefit),
        Some(Meta::empty()),
    ))
}

pub async fn add_certificate(
    state: &AppState,
    user: &AuthUser,
    employee_id: Uuid,
    payload: CreateCertificateRequest,
) -> AppResult<ApiResponse<Certificate>> {
    ensure_admin(user)?;
    payload.validate()?;
    if let (Some(issued), Some(expires)) = (payload.issued_at, payload.expires_at) {
        if expires < issued {
            return Err(AppError::BadRequest(
                "expiry date must not precede issue date".into(),
            ));
        }
    }
    let employee = find_employee(&state.orm, employee_id).await?;

    let certificate = CertificateActive {
        id: Set(Uuid::new_v4()),
        employee_id: Set(employee.id),
        name: Set(payload.name.trim().to_string()),
        issuer: Set(payload.issuer),
        issued_at: Set(payload.issued_at),
        expires_at: Set(payload.expires_at),
        storage_path: Set(payload.storage_path),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Certificate created",
        Certificate::from(certificate),
        Some(Meta::empty()),
    ))
}

pub(crate) async fn payslips_of(orm: &OrmConn, employee_id: Uuid) -> AppResult<PayslipList> {
    let items = Payslips::find()
        .filter(PayslipCol::EmployeeId.eq(employee_id))
        .order_by_desc(PayslipCol::ReferenceMonth)
        .all(orm)
        .await?
        .into_iter()
        .map(Payslip::from)
        .collect();
    Ok(PayslipList { items })
}

pub(crate) async fn benefits_of(orm: &OrmConn, employee_id: Uuid) -> AppResult<BenefitList> {
    let items = Benefits::find()
        .filter(BenefitCol::EmployeeId.eq(employee_id))
        .order_by_asc(BenefitCol::Kind)
        .all(orm)
        .await?
        .into_iter()
        .map(Benefit::from)
        .collect();
    Ok(BenefitList { items })
}

pub(crate) async fn certificates_of(
    orm: &OrmConn,
    employee_id: Uuid,
) -> AppResult<CertificateList> {
    let items = Certificates::find()
        .filter(CertCol::EmployeeId.eq(employee_id))
        .order_by_asc(CertCol::ExpiresAt)
        .all(orm)
        .await?
        .into_iter()
        .map(Certificate::from)
        .collect();
    Ok(CertificateList { items })
}
