pub mod admin;
pub mod budgets;
pub mod crud;
pub mod deposits;
pub mod expense_types;
pub mod expenses;
pub mod login;
pub mod maintenances;
pub mod monetary_funds;
pub mod movements;
pub mod reports;
pub mod user_home;
