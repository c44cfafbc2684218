// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::extension::ExtensionInventory;
use crate::loader::Loader;
use crate::{GraphicsError, Platform};
use ash::Instance;
use ash::vk::{self, ApplicationInfo, InstanceCreateFlags, InstanceCreateInfo};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ffi::{CString, c_char};
use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// Returns the extensions to enable and the flags for `VkInstanceCreateInfo`.
///
/// `inventory` must already contain the extensions required by `platform`.
pub fn instance_extensions(
    set: ExtensionSet,
    platform: Platform,
    inventory: &ExtensionInventory,
) -> (Vec<CString>, InstanceCreateFlags) {
    let mut exts: Vec<CString> = match set {
        ExtensionSet::Inventory => inventory.names().to_vec(),
        ExtensionSet::Required => platform
            .required_extensions()
            .iter()
            .map(|&n| n.to_owned())
            .collect(),
    };

    // Portability drivers are hidden unless both the extension and the flag are present.
    let flags = match platform.portability_extension() {
        Some(n) if inventory.contains_all(&[n]) => {
            if !exts.iter().any(|v| v.as_c_str() == n) {
                exts.push(n.to_owned());
            }

            InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR
        }
        _ => InstanceCreateFlags::empty(),
    };

    (exts, flags)
}

/// Creates a `VkInstance` with no layers and `extensions` enabled.
///
/// The caller is responsible for destroying the returned instance before `loader`.
pub fn create_instance(
    loader: &Loader,
    app: &AppInfo,
    extensions: &[CString],
    flags: InstanceCreateFlags,
) -> Result<Instance, GraphicsError> {
    let exts: Vec<*const c_char> = extensions.iter().map(|v| v.as_ptr()).collect();

    // Setup application info.
    let info = ApplicationInfo::default()
        .application_name(&app.name)
        .application_version(app.version.to_vk())
        .engine_name(&app.engine_name)
        .engine_version(app.engine_version.to_vk())
        .api_version(app.api_version.to_vk());

    // Setup VkInstanceCreateInfo.
    let info = InstanceCreateInfo::default()
        .flags(flags)
        .application_info(&info)
        .enabled_extension_names(&exts);

    unsafe { loader.entry().create_instance(&info, None) }.map_err(GraphicsError::CreateInstance)
}

/// Metadata about the application passed to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: CString,
    pub version: Version,
    pub engine_name: CString,
    pub engine_version: Version,
    pub api_version: Version,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: c"Qubit Engine".to_owned(),
            version: Version::new(0, 0, 1),
            engine_name: c"Qubit Engine".to_owned(),
            engine_version: Version::new(0, 0, 1),
            api_version: Version::new(1, 1, 0),
        }
    }
}

/// Which instance extensions to enable once the required ones has been validated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtensionSet {
    /// Everything reported by the driver stack.
    #[default]
    Inventory,
    /// Only the extensions required by the platform.
    Required,
}

/// Vulkan version triple without variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub const fn from_vk(v: u32) -> Self {
        Self {
            major: vk::api_version_major(v),
            minor: vk::api_version_minor(v),
            patch: vk::api_version_patch(v),
        }
    }

    pub const fn to_vk(self) -> u32 {
        vk::make_api_version(0, self.major, self.minor, self.patch)
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let mut next = || -> Result<u32, VersionError> {
            let v = parts.next().ok_or(VersionError::TooFewComponents)?;

            v.parse().map_err(VersionError::InvalidComponent)
        };

        let major = next()?;
        let minor = next()?;
        let patch = match parts.next() {
            Some(v) => v.parse().map_err(VersionError::InvalidComponent)?,
            None => 0,
        };

        if parts.next().is_some() {
            return Err(VersionError::TooManyComponents);
        }

        // Vulkan packs minor and patch into 10 and 12 bits.
        if major > 0x7f || minor > 0x3ff || patch > 0xfff {
            return Err(VersionError::OutOfRange);
        }

        Ok(Self::new(major, minor, patch))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = String::deserialize(deserializer)?;

        v.parse().map_err(serde::de::Error::custom)
    }
}

/// Represents an error when [`Version`] fails to parse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("expect at least MAJOR.MINOR")]
    TooFewComponents,

    #[error("expect at most MAJOR.MINOR.PATCH")]
    TooManyComponents,

    #[error("invalid version component")]
    InvalidComponent(#[source] ParseIntError),

    #[error("version component out of range")]
    OutOfRange,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn version_parse() {
        assert_eq!("1.1.0".parse(), Ok(Version::new(1, 1, 0)));
        assert_eq!("1.3".parse(), Ok(Version::new(1, 3, 0)));
        assert_eq!("0.0.1".parse(), Ok(Version::new(0, 0, 1)));
        assert_eq!("1".parse::<Version>(), Err(VersionError::TooFewComponents));
        assert_eq!(
            "1.2.3.4".parse::<Version>(),
            Err(VersionError::TooManyComponents)
        );
        assert!(matches!(
            "1.x".parse::<Version>(),
            Err(VersionError::InvalidComponent(_))
        ));
        assert_eq!("1.1024.0".parse::<Version>(), Err(VersionError::OutOfRange));
    }

    #[test]
    fn version_vk() {
        let v = Version::new(1, 3, 250);

        assert_eq!(v.to_vk(), vk::make_api_version(0, 1, 3, 250));
        assert_eq!(Version::from_vk(vk::API_VERSION_1_1), Version::new(1, 1, 0));
        assert_eq!(Version::from_vk(v.to_vk()), v);
        assert_eq!(v.to_string(), "1.3.250");
        assert!(Version::new(1, 1, 0) < Version::new(1, 3, 0));
    }

    fn names(v: &[CString]) -> Vec<&CStr> {
        v.iter().map(|v| v.as_c_str()).collect()
    }

    const XLIB: [&CStr; 3] = [
        c"VK_KHR_surface",
        c"VK_KHR_xlib_surface",
        c"VK_KHR_portability_enumeration",
    ];

    #[test]
    fn extensions_from_inventory() {
        let inv = ExtensionInventory::from_names([
            c"VK_KHR_surface",
            c"VK_KHR_xlib_surface",
            c"VK_EXT_debug_utils",
        ]);
        let (exts, flags) = instance_extensions(ExtensionSet::Inventory, Platform::Xlib, &inv);

        assert_eq!(exts, inv.names());
        assert_eq!(flags, InstanceCreateFlags::empty());

        let (exts, flags) = instance_extensions(ExtensionSet::Required, Platform::Xlib, &inv);

        assert_eq!(names(&exts), [c"VK_KHR_surface", c"VK_KHR_xlib_surface"]);
        assert_eq!(flags, InstanceCreateFlags::empty());
    }

    #[test]
    fn extensions_without_portability() {
        // Portability enumeration on non-Metal platform is enabled only as part of inventory.
        let inv = ExtensionInventory::from_names(XLIB);
        let (exts, flags) = instance_extensions(ExtensionSet::Required, Platform::Xlib, &inv);

        assert_eq!(names(&exts), [c"VK_KHR_surface", c"VK_KHR_xlib_surface"]);
        assert_eq!(flags, InstanceCreateFlags::empty());
    }

    #[test]
    fn extensions_with_portability() {
        let inv = ExtensionInventory::from_names([
            c"VK_KHR_portability_enumeration",
            c"VK_KHR_surface",
            c"VK_EXT_metal_surface",
        ]);

        for set in [ExtensionSet::Inventory, ExtensionSet::Required] {
            let (exts, flags) = instance_extensions(set, Platform::Metal, &inv);
            let count = exts
                .iter()
                .filter(|v| v.as_c_str() == c"VK_KHR_portability_enumeration")
                .count();

            assert_eq!(count, 1);
            assert!(exts.iter().any(|v| v.as_c_str() == c"VK_EXT_metal_surface"));
            assert_eq!(flags, InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR);
        }

        // Older loaders list portability drivers without the extension.
        let inv = ExtensionInventory::from_names([c"VK_KHR_surface", c"VK_EXT_metal_surface"]);
        let (exts, flags) = instance_extensions(ExtensionSet::Required, Platform::Metal, &inv);

        assert_eq!(names(&exts), [c"VK_KHR_surface", c"VK_EXT_metal_surface"]);
        assert_eq!(flags, InstanceCreateFlags::empty());
    }

    #[test]
    fn app_info_default() {
        let app = AppInfo::default();

        assert_eq!(app.name.as_c_str(), c"Qubit Engine");
        assert_eq!(app.version, Version::new(0, 0, 1));
        assert_eq!(app.api_version.to_vk(), vk::API_VERSION_1_1);
        assert_eq!(app.engine_name.as_c_str(), c"Qubit Engine");
        assert_eq!(app.engine_version, Version::new(0, 0, 1));
    }
}
