//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the HRMS
//! configuration from a directory of YAML files.

use std::fs;
use std::path::Path;

use crate::error::{HrmsError, HrmsResult};

use super::types::{
    ApprovalThresholds, HrmsConfig, IntegrationsConfig, OnboardingTemplate, PayrollConfig,
};

/// Loads and provides access to the HRMS configuration.
///
/// # Directory Structure
///
/// ```text
/// config/saudi/
/// ├── payroll.yaml       # Working days, overtime, GOSI rates
/// ├── approvals.yaml     # Loan and travel approval thresholds
/// ├── onboarding.yaml    # Onboarding checklist template
/// └── integrations.yaml  # QIWA and SINAD endpoints
/// ```
///
/// # Example
///
/// ```no_run
/// use hrms_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/saudi")?;
/// println!("GOSI ceiling: {}", loader.config().payroll().gosi.max_contribution_base);
/// # Ok::<(), hrms_engine::error::HrmsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: HrmsConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any required field is missing from the configuration
    pub fn load<P: AsRef<Path>>(path: P) -> HrmsResult<Self> {
        let path = path.as_ref();

        let payroll = Self::load_yaml::<PayrollConfig>(&path.join("payroll.yaml"))?;
        let approvals = Self::load_yaml::<ApprovalThresholds>(&path.join("approvals.yaml"))?;
        let onboarding = Self::load_yaml::<OnboardingTemplate>(&path.join("onboarding.yaml"))?;
        let integrations =
            Self::load_yaml::<IntegrationsConfig>(&path.join("integrations.yaml"))?;

        if onboarding.tasks.is_empty() {
            return Err(HrmsError::ConfigParseError {
                path: path.join("onboarding.yaml").display().to_string(),
                message: "onboarding template has no tasks".to_string(),
            });
        }

        Ok(Self {
            config: HrmsConfig::new(payroll, approvals, onboarding, integrations),
        })
    }

    /// Loads configuration and applies overrides from the process environment.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> HrmsResult<Self> {
        let mut loader = Self::load(path)?;
        loader.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(loader)
    }

    /// Overrides integration endpoints and tokens with values returned by
    /// `lookup` for `QIWA_API_URL`, `QIWA_API_TOKEN`, `SINAD_API_URL` and
    /// `SINAD_API_TOKEN`. Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let integrations = self.config.integrations_mut();

        if let Some(url) = value("QIWA_API_URL") {
            integrations.qiwa.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(token) = value("QIWA_API_TOKEN") {
            integrations.qiwa.api_token = Some(token);
        }
        if let Some(url) = value("SINAD_API_URL") {
            integrations.sinad.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(token) = value("SINAD_API_TOKEN") {
            integrations.sinad.api_token = Some(token);
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> HrmsResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| HrmsError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| HrmsError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &HrmsConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> HrmsConfig {
        self.config
    }
}
