// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::{GraphicsError, Version};
use ash::Entry;
use ash::prelude::VkResult;
use ash::vk;
use log::warn;
use std::ffi::CStr;

/// Entry point returned by [`Loader::resolve()`].
pub type EntryPoint = unsafe extern "system" fn();

/// Vulkan loader opened at runtime.
///
/// Dropping this releases the underlying dynamic library so it must outlive every object created
/// from it.
pub struct Loader {
    entry: Entry,
}

impl Loader {
    /// Opens the Vulkan loader installed on the system.
    pub fn load() -> Result<Self, GraphicsError> {
        // SAFETY: The library is kept alive by the Entry until we are dropped.
        let entry = unsafe { Entry::load() }.map_err(GraphicsError::LoadLibrary)?;

        Ok(Self { entry })
    }

    /// Resolves a global command (e.g. `vkCreateInstance`).
    pub fn resolve(&self, name: &CStr) -> Option<EntryPoint> {
        self.resolve_instance(vk::Instance::null(), name)
    }

    /// Resolves a command for `instance`. A null `instance` will resolve only global commands.
    pub fn resolve_instance(&self, instance: vk::Instance, name: &CStr) -> Option<EntryPoint> {
        unsafe { self.entry.get_instance_proc_addr(instance, name.as_ptr()) }
    }

    /// Returns the highest instance-level API version supported by the loader.
    ///
    /// Vulkan 1.0 loaders don't have `vkEnumerateInstanceVersion` so this will be 1.0.0 on them.
    pub fn version(&self) -> Version {
        loader_version(unsafe { self.entry.try_enumerate_instance_version() })
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }
}

fn loader_version(r: VkResult<Option<u32>>) -> Version {
    match r {
        Ok(Some(v)) => Version::from_vk(v),
        Ok(None) => Version::new(1, 0, 0),
        Err(e) => {
            warn!("Couldn't get Vulkan loader version ({e}), assuming 1.0.0.");
            Version::new(1, 0, 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version() {
        assert_eq!(
            loader_version(Ok(Some(vk::API_VERSION_1_3))),
            Version::new(1, 3, 0)
        );
        assert_eq!(loader_version(Ok(None)), Version::new(1, 0, 0));
        assert_eq!(
            loader_version(Err(vk::Result::ERROR_OUT_OF_HOST_MEMORY)),
            Version::new(1, 0, 0)
        );
    }
}
