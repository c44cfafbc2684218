// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::queue::QueueFamily;
use crate::{GraphicsError, Version};
use ash::Instance;
use ash::vk::{self, PhysicalDeviceProperties, PhysicalDeviceType};
use log::warn;
use std::fmt::{Display, Formatter};

/// Lists all physical devices visible to `instance` in the order the driver reported.
pub fn enumerate_devices(instance: &Instance) -> Result<Vec<PhysicalDevice>, GraphicsError> {
    let all = unsafe { instance.enumerate_physical_devices() }
        .map_err(GraphicsError::EnumeratePhysicalDevices)?;

    let mut devices = Vec::with_capacity(all.len());

    for dev in all {
        let props = unsafe { instance.get_physical_device_properties(dev) };
        let queue_families = unsafe { instance.get_physical_device_queue_family_properties(dev) }
            .iter()
            .map(QueueFamily::from)
            .collect();

        if let Some(v) = PhysicalDevice::from_properties(dev, &props, queue_families) {
            devices.push(v);
        }
    }

    if devices.is_empty() {
        return Err(GraphicsError::NoPhysicalDevice);
    }

    Ok(devices)
}

/// Picks the first discrete GPU, or the first integrated GPU if there are no discrete one.
///
/// Other kind of devices are never selected.
pub fn select_device(mut devices: Vec<PhysicalDevice>) -> Result<PhysicalDevice, GraphicsError> {
    let i = devices
        .iter()
        .position(|d| d.ty == DeviceType::Discrete)
        .or_else(|| {
            devices
                .iter()
                .position(|d| d.ty == DeviceType::Integrated)
        })
        .ok_or(GraphicsError::NoSuitableDevice)?;

    Ok(devices.swap_remove(i))
}

/// A GPU visible to the instance.
#[derive(Debug, Clone)]
pub struct PhysicalDevice {
    handle: vk::PhysicalDevice,
    name: String,
    ty: DeviceType,
    api_version: Version,
    queue_families: Vec<QueueFamily>,
}

impl PhysicalDevice {
    pub fn new(
        handle: vk::PhysicalDevice,
        name: impl Into<String>,
        ty: DeviceType,
        api_version: Version,
        queue_families: Vec<QueueFamily>,
    ) -> Self {
        Self {
            handle,
            name: name.into(),
            ty,
            api_version,
            queue_families,
        }
    }

    /// Returns [`None`] if the driver reported a malformed device name.
    pub fn from_properties(
        handle: vk::PhysicalDevice,
        props: &PhysicalDeviceProperties,
        queue_families: Vec<QueueFamily>,
    ) -> Option<Self> {
        let name = match props.device_name_as_c_str() {
            Ok(v) => v.to_string_lossy().into_owned(),
            Err(_) => {
                warn!(
                    "Ignoring physical device {:#x} without NUL-terminated name.",
                    props.device_id
                );
                return None;
            }
        };

        Some(Self::new(
            handle,
            name,
            props.device_type.into(),
            Version::from_vk(props.api_version),
            queue_families,
        ))
    }

    pub fn handle(&self) -> vk::PhysicalDevice {
        self.handle
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> DeviceType {
        self.ty
    }

    pub fn api_version(&self) -> Version {
        self.api_version
    }

    pub fn queue_families(&self) -> &[QueueFamily] {
        &self.queue_families
    }
}

/// Classification of [`PhysicalDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Discrete,
    Integrated,
    Virtual,
    Cpu,
    Other,
}

impl From<PhysicalDeviceType> for DeviceType {
    fn from(value: PhysicalDeviceType) -> Self {
        match value {
            PhysicalDeviceType::DISCRETE_GPU => Self::Discrete,
            PhysicalDeviceType::INTEGRATED_GPU => Self::Integrated,
            PhysicalDeviceType::VIRTUAL_GPU => Self::Virtual,
            PhysicalDeviceType::CPU => Self::Cpu,
            _ => Self::Other,
        }
    }
}

impl Display for DeviceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let v = match self {
            Self::Discrete => "discrete GPU",
            Self::Integrated => "integrated GPU",
            Self::Virtual => "virtual GPU",
            Self::Cpu => "CPU",
            Self::Other => "other",
        };

        f.write_str(v)
    }
}
