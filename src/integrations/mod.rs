//! Government integrations.
//!
//! [`GovApiClient`] talks to the QIWA and SINAD REST APIs; the
//! [`wage_file`] module writes WPS wage files submitted through SINAD.

mod client;
pub mod wage_file;

pub use client::GovApiClient;
pub use wage_file::{WageFile, WageFileRow, build_wage_file};

/// Service name of the Ministry of Human Resources labor platform.
pub const QIWA: &str = "QIWA";

/// Service name of the wage protection submission platform.
pub const SINAD: &str = "SINAD";
