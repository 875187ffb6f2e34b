//! Typed clients for the REST backend, one module per resource.

pub mod budget;
pub mod client;
pub mod deposit;
pub mod expense;
pub mod expense_type;
pub mod monetary_fund;
pub mod reports;
pub mod user;
