// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::{GraphicsError, PhysicalDevice};
use ash::vk::{QueueFamilyProperties, QueueFlags};
use clap::ValueEnum;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Returns index of the first family that supports graphics operations with more than one queue.
pub fn find_graphics_family(families: &[QueueFamily]) -> Option<u32> {
    families
        .iter()
        .position(|f| f.flags.contains(QueueFlags::GRAPHICS) && f.count > 1)
        .and_then(|i| i.try_into().ok())
}

/// Properties of a queue family on a physical device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamily {
    pub flags: QueueFlags,
    pub count: u32,
}

impl QueueFamily {
    pub const fn new(flags: QueueFlags, count: u32) -> Self {
        Self { flags, count }
    }
}

impl From<&QueueFamilyProperties> for QueueFamily {
    fn from(value: &QueueFamilyProperties) -> Self {
        Self {
            flags: value.queue_flags,
            count: value.queue_count,
        }
    }
}

/// What to do when the selected device has no family satisfying [`find_graphics_family()`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueuePolicy {
    /// Log a warning and continue without a graphics queue family.
    #[default]
    Advisory,
    /// Fail the bootstrap.
    Required,
}

impl QueuePolicy {
    /// Decides what to do with the result of [`find_graphics_family()`] on `device`.
    pub fn apply(
        self,
        found: Option<u32>,
        device: &PhysicalDevice,
    ) -> Result<Option<u32>, GraphicsError> {
        match (found, self) {
            (Some(i), _) => {
                info!("Using queue family #{i} for graphics operations.");
                Ok(Some(i))
            }
            (None, Self::Advisory) => {
                warn!(
                    "{} has no queue family with more than one graphics queue.",
                    device.name()
                );
                Ok(None)
            }
            (None, Self::Required) => Err(GraphicsError::NoGraphicsQueue(device.name().into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeviceType, Version};
    use ash::vk::{self, Handle};

    fn device(families: Vec<QueueFamily>) -> PhysicalDevice {
        PhysicalDevice::new(
            vk::PhysicalDevice::from_raw(1),
            "llvmpipe",
            DeviceType::Cpu,
            Version::new(1, 3, 0),
            families,
        )
    }

    #[test]
    fn graphics_with_headroom() {
        let families = [
            QueueFamily::new(QueueFlags::GRAPHICS | QueueFlags::COMPUTE, 1),
            QueueFamily::new(QueueFlags::TRANSFER, 4),
            QueueFamily::new(QueueFlags::GRAPHICS | QueueFlags::TRANSFER, 2),
            QueueFamily::new(QueueFlags::GRAPHICS, 16),
        ];

        assert_eq!(find_graphics_family(&families), Some(2));
    }

    #[test]
    fn single_queue_is_rejected() {
        let families = [
            QueueFamily::new(QueueFlags::GRAPHICS, 1),
            QueueFamily::new(QueueFlags::COMPUTE | QueueFlags::TRANSFER, 8),
            QueueFamily::new(QueueFlags::GRAPHICS | QueueFlags::COMPUTE, 0),
        ];

        assert_eq!(find_graphics_family(&families), None);
        assert_eq!(find_graphics_family(&[]), None);
    }

    #[test]
    fn from_properties() {
        let props = QueueFamilyProperties {
            queue_flags: QueueFlags::GRAPHICS,
            queue_count: 3,
            ..Default::default()
        };

        assert_eq!(
            QueueFamily::from(&props),
            QueueFamily::new(QueueFlags::GRAPHICS, 3)
        );
    }

    #[test]
    fn advisory_policy() {
        let dev = device(vec![QueueFamily::new(QueueFlags::GRAPHICS, 1)]);
        let found = find_graphics_family(dev.queue_families());

        assert_eq!(found, None);
        assert_eq!(QueuePolicy::Advisory.apply(found, &dev).unwrap(), None);
        assert_eq!(QueuePolicy::Advisory.apply(Some(3), &dev).unwrap(), Some(3));
    }

    #[test]
    fn required_policy() {
        let dev = device(vec![
            QueueFamily::new(QueueFlags::COMPUTE, 4),
            QueueFamily::new(QueueFlags::GRAPHICS, 2),
        ]);
        let found = find_graphics_family(dev.queue_families());

        assert_eq!(QueuePolicy::Required.apply(found, &dev).unwrap(), Some(1));

        match QueuePolicy::Required.apply(None, &dev) {
            Err(GraphicsError::NoGraphicsQueue(n)) => assert_eq!(n, "llvmpipe"),
            _ => panic!("expect no graphics queue"),
        }
    }
}
