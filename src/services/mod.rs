pub mod auth_service;
pub mod client_service;
pub mod employee_service;
pub mod profile_service;
pub mod quote_service;
pub mod site_service;
pub mod stock_alerts;
pub mod stock_service;
pub mod timesheet_service;
