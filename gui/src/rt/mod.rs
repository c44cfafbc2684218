// SPDX-License-Identifier: MIT OR Apache-2.0
use graphics::{BootstrapConfig, GraphicsError, Platform, Vulkan};
use log::info;
use raw_window_handle::{HandleError, HasDisplayHandle};
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::error::{EventLoopError, OsError};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

/// Opens a window, bootstraps Vulkan for it and blocks until the window is closed.
///
/// If `detect_platform` is `true` the platform in `config` will be replaced with the one the window
/// is actually running on.
pub fn run(config: BootstrapConfig, detect_platform: bool) -> Result<(), RuntimeError> {
    let el = EventLoop::new().map_err(RuntimeError::CreateEventLoop)?;
    let mut app = Launcher {
        config,
        detect_platform,
        vulkan: None,
        window: None,
        error: None,
    };

    el.run_app(&mut app).map_err(RuntimeError::RunEventLoop)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Implementation of [`ApplicationHandler`] for the main window.
///
/// Fields in this struct must be dropped in a correct order.
struct Launcher {
    config: BootstrapConfig,
    detect_platform: bool,
    vulkan: Option<Vulkan>,
    window: Option<Window>,
    error: Option<RuntimeError>,
}

impl Launcher {
    fn start(&mut self, el: &ActiveEventLoop) -> Result<(), RuntimeError> {
        // Create window.
        let title = self.config.app.name.to_string_lossy().into_owned();
        let attrs = Window::default_attributes().with_title(title);
        let win = el.create_window(attrs).map_err(RuntimeError::CreateWindow)?;

        // Get platform.
        if self.detect_platform {
            let display = win
                .display_handle()
                .map_err(RuntimeError::GetDisplayHandle)?
                .as_raw();

            self.config.platform =
                Platform::from_display(display).ok_or(RuntimeError::UnsupportedDisplay)?;

            info!("Detected {} display.", self.config.platform);
        }

        self.window = Some(win);

        // Bootstrap Vulkan.
        self.vulkan = Some(Vulkan::new(&self.config).map_err(RuntimeError::Bootstrap)?);

        Ok(())
    }
}

impl ApplicationHandler for Launcher {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::CloseRequested = event {
            // Vulkan must be shutdown before the window.
            if let Some(v) = self.vulkan.take() {
                v.shutdown();
            }

            self.window = None;
            event_loop.exit();
        }
    }
}

/// Represents an error when [`run()`] fails.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("couldn't create event loop")]
    CreateEventLoop(#[source] EventLoopError),

    #[error("couldn't run event loop")]
    RunEventLoop(#[source] EventLoopError),

    #[error("couldn't create window")]
    CreateWindow(#[source] OsError),

    #[error("couldn't get display handle")]
    GetDisplayHandle(#[source] HandleError),

    #[error("the display is not supported by Vulkan")]
    UnsupportedDisplay,

    #[error("couldn't bootstrap Vulkan")]
    Bootstrap(#[source] GraphicsError),
}
