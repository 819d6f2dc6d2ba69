pub mod auth;
pub mod people;
pub mod quotes;
pub mod sites;
pub mod stock;
pub mod timesheet;
