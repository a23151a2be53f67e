//! HR and payroll engine for Saudi establishments.
//!
//! This crate computes monthly payroll with GOSI contributions, runs leave,
//! loan and travel requests through a multi-tier approval workflow, credits
//! leave accrual, tracks onboarding checklists, and talks to the QIWA and
//! SINAD government APIs. The [`api`] module exposes it all over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod integrations;
pub mod models;
pub mod notify;
pub mod services;
pub mod store;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;
