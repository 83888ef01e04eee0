//! Payroll previews, finalization and exports for managers.
//!
//! The computation lives in [`payroll`] and has no I/O. [`pages`] exposes it
//! over HTTP and persists finalized payrolls through [`entity`].

pub mod auth;
pub mod config;
pub mod consts;
pub mod entity;
pub mod pages;
pub mod payroll;
pub mod utils;
