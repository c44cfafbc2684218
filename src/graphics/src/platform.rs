// SPDX-License-Identifier: MIT OR Apache-2.0
use clap::ValueEnum;
use raw_window_handle::RawDisplayHandle;
use serde::{Deserialize, Serialize};
use std::ffi::CStr;
use std::fmt::{Display, Formatter};

/// Windowing system that the instance must be able to present to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Win32,
    Xlib,
    Xcb,
    Wayland,
    Metal,
}

impl Platform {
    /// Platform to use when nothing else tells us which windowing system is in use.
    pub const fn native() -> Self {
        if cfg!(target_os = "windows") {
            Self::Win32
        } else if cfg!(target_os = "macos") {
            Self::Metal
        } else {
            Self::Xlib
        }
    }

    /// Returns [`None`] if the display is not something Vulkan can present to.
    pub fn from_display(display: RawDisplayHandle) -> Option<Self> {
        let v = match display {
            RawDisplayHandle::Windows(_) => Self::Win32,
            RawDisplayHandle::Xlib(_) => Self::Xlib,
            RawDisplayHandle::Xcb(_) => Self::Xcb,
            RawDisplayHandle::Wayland(_) => Self::Wayland,
            RawDisplayHandle::AppKit(_) | RawDisplayHandle::UiKit(_) => Self::Metal,
            _ => return None,
        };

        Some(v)
    }

    /// Returns the instance extensions required to create a surface on this platform.
    ///
    /// The first item is always `VK_KHR_surface`.
    pub const fn required_extensions(self) -> [&'static CStr; 2] {
        [c"VK_KHR_surface", self.surface_extension()]
    }

    /// Returns the extension to list portability drivers (e.g. MoltenVK) if this platform needs one.
    ///
    /// This is not part of [`Self::required_extensions()`] since older loaders don't have it and
    /// they list portability drivers without it.
    pub const fn portability_extension(self) -> Option<&'static CStr> {
        match self {
            Self::Metal => Some(c"VK_KHR_portability_enumeration"),
            Self::Win32 | Self::Xlib | Self::Xcb | Self::Wayland => None,
        }
    }

    pub const fn surface_extension(self) -> &'static CStr {
        match self {
            Self::Win32 => c"VK_KHR_win32_surface",
            Self::Xlib => c"VK_KHR_xlib_surface",
            Self::Xcb => c"VK_KHR_xcb_surface",
            Self::Wayland => c"VK_KHR_wayland_surface",
            Self::Metal => c"VK_EXT_metal_surface",
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let v = match self {
            Self::Win32 => "Win32",
            Self::Xlib => "Xlib",
            Self::Xcb => "XCB",
            Self::Wayland => "Wayland",
            Self::Metal => "Metal",
        };

        f.write_str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw_window_handle::{WaylandDisplayHandle, WebDisplayHandle, XlibDisplayHandle};
    use std::ptr::NonNull;

    #[test]
    fn required_extensions() {
        let all = [
            Platform::Win32,
            Platform::Xlib,
            Platform::Xcb,
            Platform::Wayland,
            Platform::Metal,
        ];

        for p in all {
            let exts = p.required_extensions();

            assert_eq!(exts[0], c"VK_KHR_surface");
            assert_eq!(exts[1], p.surface_extension());
            assert_ne!(exts[0], exts[1]);
        }

        assert_eq!(
            Platform::Xlib.required_extensions(),
            [c"VK_KHR_surface", c"VK_KHR_xlib_surface"]
        );
    }

    #[test]
    fn portability_extension() {
        assert_eq!(
            Platform::Metal.portability_extension(),
            Some(c"VK_KHR_portability_enumeration")
        );
        assert_eq!(Platform::Win32.portability_extension(), None);
        assert_eq!(Platform::Xlib.portability_extension(), None);
        assert_eq!(Platform::Wayland.portability_extension(), None);
    }

    #[test]
    fn native() {
        #[cfg(target_os = "windows")]
        assert_eq!(Platform::native(), Platform::Win32);
        #[cfg(target_os = "linux")]
        assert_eq!(Platform::native(), Platform::Xlib);
        #[cfg(target_os = "macos")]
        assert_eq!(Platform::native(), Platform::Metal);
    }

    #[test]
    fn from_display() {
        let xlib = RawDisplayHandle::Xlib(XlibDisplayHandle::new(None, 0));
        let mut display = 0u8;
        let wayland = RawDisplayHandle::Wayland(WaylandDisplayHandle::new(
            NonNull::from(&mut display).cast(),
        ));
        let web = RawDisplayHandle::Web(WebDisplayHandle::new());

        assert_eq!(Platform::from_display(xlib), Some(Platform::Xlib));
        assert_eq!(Platform::from_display(wayland), Some(Platform::Wayland));
        assert_eq!(Platform::from_display(web), None);
    }
}
