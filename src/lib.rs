//! Warehouse Inventory Library
//!
//! Persistence and service layer for a warehouse: product catalogue,
//! suppliers, storage locations, stock levels with their movement ledger, and
//! customer orders.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod audit;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod migrator;
pub mod repositories;
pub mod services;

pub use audit::{scope_auditor, Auditor};
pub use db::{DbConfig, DbPool, Specification};
pub use errors::ServiceError;
pub use services::{ServiceContainer, ServiceFactory};
