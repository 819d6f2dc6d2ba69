//! Pure business rules, free of HTTP and persistence.

pub mod catalog;
pub mod csv;
pub mod pricing;
pub mod stock;
pub mod timesheet;
