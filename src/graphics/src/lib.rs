// SPDX-License-Identifier: MIT OR Apache-2.0
pub use self::device::{DeviceType, PhysicalDevice, enumerate_devices, select_device};
pub use self::extension::ExtensionInventory;
pub use self::instance::{
    AppInfo, ExtensionSet, Version, VersionError, create_instance, instance_extensions,
};
pub use self::loader::{EntryPoint, Loader};
pub use self::platform::Platform;
pub use self::queue::{QueueFamily, QueuePolicy, find_graphics_family};

use ash::Instance;
use log::info;
use thiserror::Error;

mod device;
mod extension;
mod instance;
mod loader;
mod platform;
mod queue;

/// Vulkan instance with the selected physical device.
///
/// Only one of this should be created per process. Dropping it destroys the instance and then
/// releases the Vulkan loader.
pub struct Vulkan {
    device: PhysicalDevice,
    graphics_family: Option<u32>,
    platform: Platform,
    instance: Instance,
    loader: Loader,
}

impl Vulkan {
    pub fn new(config: &BootstrapConfig) -> Result<Self, GraphicsError> {
        // Load Vulkan.
        let loader = Loader::load()?;

        info!("Vulkan loader supports API version {}.", loader.version());

        for name in [c"vkEnumerateInstanceExtensionProperties", c"vkCreateInstance"] {
            if loader.resolve(name).is_none() {
                let name = name.to_string_lossy().into_owned();
                return Err(GraphicsError::MissingEntryPoint(name));
            }
        }

        // Check if the driver stack can present on the current platform.
        let required = config.platform.required_extensions();
        let inventory = ExtensionInventory::query(&loader)?;

        info!(
            "Found {} instance extensions, requiring {} and {} for {}.",
            inventory.len(),
            required[0].to_string_lossy(),
            required[1].to_string_lossy(),
            config.platform
        );

        inventory.require(&required)?;

        // Create instance.
        let (exts, flags) = instance_extensions(config.extensions, config.platform, &inventory);

        drop(inventory);

        let instance = create_instance(&loader, &config.app, &exts, flags)?;

        // Select physical device. The instance will be leaked if we return directly.
        let device = match enumerate_devices(&instance).and_then(select_device) {
            Ok(v) => v,
            Err(e) => {
                unsafe { instance.destroy_instance(None) };
                return Err(e);
            }
        };

        info!(
            "Selected {} ({}) with Vulkan {}.",
            device.name(),
            device.ty(),
            device.api_version()
        );

        // Select queue family.
        let found = find_graphics_family(device.queue_families());
        let graphics_family = match config.queue_policy.apply(found, &device) {
            Ok(v) => v,
            Err(e) => {
                unsafe { instance.destroy_instance(None) };
                return Err(e);
            }
        };

        Ok(Self {
            device,
            graphics_family,
            platform: config.platform,
            instance,
            loader,
        })
    }

    pub fn device(&self) -> &PhysicalDevice {
        &self.device
    }

    /// Returns [`None`] if [`find_graphics_family()`] cannot find any family on the selected device
    /// and [`QueuePolicy::Advisory`] was used.
    pub fn graphics_family(&self) -> Option<u32> {
        self.graphics_family
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    /// Same as dropping but more explicit on the call site.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for Vulkan {
    fn drop(&mut self) {
        unsafe { self.instance.destroy_instance(None) };
        info!("Vulkan instance destroyed.");
    }
}

/// Inputs of [`Vulkan::new()`].
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub app: AppInfo,
    pub platform: Platform,
    pub extensions: ExtensionSet,
    pub queue_policy: QueuePolicy,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            app: AppInfo::default(),
            platform: Platform::native(),
            extensions: ExtensionSet::default(),
            queue_policy: QueuePolicy::default(),
        }
    }
}

/// Represents an error when [`Vulkan::new()`] fails.
#[derive(Debug, Error)]
pub enum GraphicsError {
    #[error("couldn't load Vulkan library")]
    LoadLibrary(#[source] ash::LoadingError),

    #[error("Vulkan loader does not export {0}")]
    MissingEntryPoint(String),

    #[error("couldn't enumerate instance extensions")]
    EnumerateExtensions(#[source] ash::vk::Result),

    #[error("no Vulkan instance extensions available")]
    NoExtensions,

    #[error("required instance extensions not available: {}", .0.join(", "))]
    MissingExtensions(Vec<String>),

    #[error("couldn't create Vulkan instance")]
    CreateInstance(#[source] ash::vk::Result),

    #[error("couldn't enumerate physical devices")]
    EnumeratePhysicalDevices(#[source] ash::vk::Result),

    #[error("no Vulkan physical devices available")]
    NoPhysicalDevice,

    #[error("no discrete or integrated GPU available")]
    NoSuitableDevice,

    #[error("{0} has no queue family with more than one graphics queue")]
    NoGraphicsQueue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = BootstrapConfig::default();

        assert_eq!(config.platform, Platform::native());
        assert_eq!(config.extensions, ExtensionSet::Inventory);
        assert_eq!(config.queue_policy, QueuePolicy::Advisory);
        assert_eq!(config.app, AppInfo::default());
    }

    #[test]
    fn error_message() {
        let e = GraphicsError::MissingExtensions(vec![
            "VK_KHR_surface".into(),
            "VK_KHR_xcb_surface".into(),
        ]);

        assert_eq!(
            e.to_string(),
            "required instance extensions not available: VK_KHR_surface, VK_KHR_xcb_surface"
        );
    }
}
