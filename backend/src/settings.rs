//! Service configuration loaded via OrthoConfig.
//!
//! Values are layered from command-line flags, `RECORDKEEPER_*` environment
//! variables and configuration files. Unset values fall back to the
//! defaults below.

use std::net::SocketAddr;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_COST_PER_KM;
use crate::domain::records::ManagerCodes;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DATA_DIR: &str = "data";

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    /// The bind address is not `host:port`.
    #[error("invalid bind address {value}: {message}")]
    BindAddr {
        /// Configured value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// The cost per odometer unit is negative or not finite.
    #[error("cost per km must be a non-negative number, got {0}")]
    CostPerKm(f64),
}

/// Configuration of the record service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECORDKEEPER")]
pub struct ServiceSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Directory holding the JSON documents.
    pub data_dir: Option<String>,
    /// Logistics cost per odometer unit.
    pub cost_per_km: Option<f64>,
    /// Comma-separated manager codes accepted on absence requests.
    pub manager_codes: Option<String>,
}

impl ServiceSettings {
    /// Listen address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.trim()
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            })
    }

    /// Data directory, defaulting to `data`.
    #[must_use]
    pub fn data_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR))
    }

    /// Cost per odometer unit, defaulting to 0.05.
    ///
    /// # Errors
    /// [`SettingsError::CostPerKm`] for negative or non-finite values.
    pub fn cost_per_km(&self) -> Result<f64, SettingsError> {
        let rate = self.cost_per_km.unwrap_or(DEFAULT_COST_PER_KM);
        if rate.is_finite() && rate >= 0.0 {
            Ok(rate)
        } else {
            Err(SettingsError::CostPerKm(rate))
        }
    }

    /// Accepted manager codes, defaulting to the legacy list. A blank
    /// setting also selects the defaults.
    #[must_use]
    pub fn manager_codes(&self) -> ManagerCodes {
        match self.manager_codes.as_deref().map(str::trim) {
            Some(list) if !list.is_empty() => ManagerCodes::parse(list),
            _ => ManagerCodes::default(),
        }
    }
}
