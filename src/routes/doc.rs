use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    domain::{
        pricing::{PricingMode, QuoteBreakdown, QuoteKind},
        stock::{MovementType, StockStatus},
        timesheet::{EntryStatus, JustificationKind, PeriodSummary, PunchKind},
    },
    dto::{quotes::QuoteDetail, sites::LogbookStats, stock::AlertSnapshot},
    models::{
        Category, Crane, Employee, Justification, LogbookEntry, Product, Quote, Site,
        StockMovement, TimesheetEntry, User,
    },
    response::{ApiResponse, Meta},
    routes::{
        auth, clients, employees, health, params, profile, quotes, sites, stock, timesheet,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        stock::list_categories,
        stock::create_category,
        stock::get_category,
        stock::update_category,
        stock::delete_category,
        stock::list_products,
        stock::create_product,
        stock::get_product,
        stock::update_product,
        stock::delete_product,
        stock::create_movement,
        stock::list_movements,
        stock::export_csv,
        stock::alerts,
        quotes::preview,
        quotes::complements,
        quotes::list_quotes,
        quotes::create_quote,
        quotes::get_quote,
        quotes::update_quote,
        quotes::delete_quote,
        timesheet::list_entries,
        timesheet::upsert_entry,
        timesheet::get_entry,
        timesheet::update_entry,
        timesheet::punch,
        timesheet::approve_entry,
        timesheet::reject_entry,
        timesheet::pending_overtime,
        timesheet::approve_batch,
        timesheet::reject_batch,
        timesheet::summary,
        timesheet::list_justifications,
        timesheet::create_justification,
        timesheet::approve_justification,
        timesheet::reject_justification,
        sites::list_sites,
        sites::create_site,
        sites::get_site,
        sites::list_cranes,
        sites::create_crane,
        sites::list_documents,
        sites::create_document,
        sites::site_logbook,
        sites::crane_logbook,
        sites::create_logbook_entry,
        sites::logbook_stats,
        sites::update_logbook_entry,
        sites::delete_logbook_entry,
        profile::get_profile,
        profile::update_profile,
        profile::payslips,
        profile::benefits,
        profile::certificates,
        profile::change_password,
        employees::list_employees,
        employees::create_employee,
        employees::get_employee,
        employees::update_employee,
        employees::add_payslip,
        employees::add_benefit,
        employees::add_certificate,
        clients::list_clients,
        clients::create_client
    ),
    components(
        schemas(
            User,
            Category,
            Product,
            StockMovement,
            Quote,
            QuoteDetail,
            QuoteBreakdown,
            QuoteKind,
            PricingMode,
            Employee,
            TimesheetEntry,
            Justification,
            Site,
            Crane,
            LogbookEntry,
            LogbookStats,
            AlertSnapshot,
            StockStatus,
            MovementType,
            EntryStatus,
            JustificationKind,
            PunchKind,
            PeriodSummary,
            params::Pagination,
            Meta,
            ApiResponse<Product>,
            ApiResponse<QuoteDetail>,
            ApiResponse<TimesheetEntry>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Stock", description = "Products, categories and stock movements"),
        (name = "Quotes", description = "Rental and construction quotes"),
        (name = "Timesheet", description = "Clock entries, overtime and justifications"),
        (name = "Sites", description = "Construction sites, cranes and documents"),
        (name = "Logbook", description = "Crane logbook entries"),
        (name = "Profile", description = "Logged-in employee profile"),
        (name = "Employees", description = "Employee administration"),
        (name = "Clients", description = "Client endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
