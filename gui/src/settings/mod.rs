// SPDX-License-Identifier: MIT OR Apache-2.0
use graphics::{AppInfo, BootstrapConfig, ExtensionSet, Platform, QueuePolicy, Version};
use serde::{Deserialize, Serialize};
use std::ffi::{CString, NulError};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use thiserror::Error;

/// Contains application settings.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    app_name: Option<String>,
    app_version: Option<Version>,
    api_version: Option<Version>,
    platform: Option<Platform>,
    extensions: ExtensionSet,
    queue_policy: QueuePolicy,
}

impl Settings {
    /// Returns default settings if `path` does not exists.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(SettingsError::OpenFile(e)),
        };

        Self::from_reader(file)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, SettingsError> {
        serde_yaml::from_reader(reader).map_err(SettingsError::ReadFile)
    }

    /// Returns [`None`] if the platform should be detected from the window.
    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    pub fn to_config(&self) -> Result<BootstrapConfig, SettingsError> {
        let mut app = AppInfo::default();

        if let Some(v) = &self.app_name {
            app.name = CString::new(v.as_str()).map_err(SettingsError::InvalidAppName)?;
        }

        if let Some(v) = self.app_version {
            app.version = v;
        }

        if let Some(v) = self.api_version {
            app.api_version = v;
        }

        Ok(BootstrapConfig {
            app,
            platform: self.platform.unwrap_or(Platform::native()),
            extensions: self.extensions,
            queue_policy: self.queue_policy,
        })
    }
}

/// Represents an error when [`Settings`] fails to load.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("couldn't open the file")]
    OpenFile(#[source] std::io::Error),

    #[error("couldn't load the file")]
    ReadFile(#[source] serde_yaml::Error),

    #[error("application name cannot contains NUL character")]
    InvalidAppName(#[source] NulError),
}
