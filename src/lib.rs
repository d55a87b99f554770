#![warn(clippy::all, rust_2018_idioms)]
//! An egui control for handing an image to a processing pipeline, either by
//! dropping/picking a file or by choosing from a gallery of samples.

pub mod acquire;
mod app;
pub mod catalog;
pub mod config;
pub mod error;
mod file_picker;
pub mod loader;
pub mod placeholder;
pub mod preview;
pub mod resolver;
pub mod state;
mod tasks;
pub mod upload;

pub use acquire::{AcquiredFile, FileSource};
pub use app::UploaderApp;
pub use catalog::{SampleCatalog, SampleEntry};
pub use config::UploaderConfig;
pub use state::{UploadProps, View};
pub use upload::{ImageUpload, Notifier, UploadSink};

use eframe::NativeOptions;

#[cfg(target_os = "android")]
use egui_winit::winit;

impl UploaderApp {
    /// Run the app with provided NativeOptions (used by the native and Android entrypoints).
    pub fn run(options: NativeOptions) -> Result<(), eframe::Error> {
        eframe::run_native(
            "Sample Uploader",
            options,
            Box::new(|cc| Ok(Box::new(UploaderApp::new(cc)))),
        )
    }
}

#[cfg(target_os = "android")]
#[allow(unsafe_code)]
#[unsafe(no_mangle)]
pub extern "C" fn android_main(app: winit::platform::android::activity::AndroidApp) {
    use eframe::Renderer;

    unsafe {
        std::env::set_var("RUST_BACKTRACE", "full");
    }
    android_logger::init_once(
        android_logger::Config::default().with_max_level(log::LevelFilter::Info),
    );

    let options = NativeOptions {
        android_app: Some(app),
        renderer: Renderer::Wgpu,
        ..Default::default()
    };

    if let Err(e) = UploaderApp::run(options) {
        log::error!("Sample Uploader exited with an error: {e}");
    }
}
