//! Command and query structs passed into the domain services.
//!
//! These keep the service signatures independent of the DTO layer; the REST
//! handlers translate `shared` requests into these before calling a service.

pub mod auth;
pub mod budgets;
pub mod categories;
pub mod transactions;
