//! HTTP server configuration object.

use std::net::SocketAddr;

use camino::Utf8PathBuf;

use recordkeeper::domain::ReportSettings;
use recordkeeper::domain::records::ManagerCodes;
use recordkeeper::settings::{ServiceSettings, SettingsError};

/// Everything the server needs once settings are validated.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) data_dir: Utf8PathBuf,
    pub(crate) reports: ReportSettings,
    pub(crate) manager_codes: ManagerCodes,
}

impl ServerConfig {
    /// Validate loaded settings.
    ///
    /// # Errors
    /// Returns [`SettingsError`] for an unparseable bind address or rate.
    pub fn from_settings(settings: &ServiceSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            data_dir: settings.data_dir(),
            reports: ReportSettings {
                cost_per_km: settings.cost_per_km()?,
                ..ReportSettings::default()
            },
            manager_codes: settings.manager_codes(),
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
