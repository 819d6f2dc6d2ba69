pub mod audit_logs;
pub mod benefits;
pub mod categories;
pub mod certificates;
pub mod clients;
pub mod cranes;
pub mod employees;
pub mod justifications;
pub mod logbook_entries;
pub mod payslips;
pub mod products;
pub mod quote_fixed_values;
pub mod quote_items;
pub mod quote_monthly_costs;
pub mod quotes;
pub mod site_documents;
pub mod sites;
pub mod stock_levels;
pub mod stock_movements;
pub mod timesheet_entries;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use benefits::Entity as Benefits;
pub use categories::Entity as Categories;
pub use certificates::Entity as Certificates;
pub use clients::Entity as Clients;
pub use cranes::Entity as Cranes;
pub use employees::Entity as Employees;
pub use justifications::Entity as Justifications;
pub use logbook_entries::Entity as LogbookEntries;
pub use payslips::Entity as Payslips;
pub use products::Entity as Products;
pub use quote_fixed_values::Entity as QuoteFixedValues;
pub use quote_items::Entity as QuoteItems;
pub use quote_monthly_costs::Entity as QuoteMonthlyCosts;
pub use quotes::Entity as Quotes;
pub use site_documents::Entity as SiteDocuments;
pub use sites::Entity as Sites;
pub use stock_levels::Entity as StockLevels;
pub use stock_movements::Entity as StockMovements;
pub use timesheet_entries::Entity as TimesheetEntries;
pub use users::Entity as Users;
