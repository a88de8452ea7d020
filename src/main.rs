//! HoI3 Log Capture
//!
//! Overlay tool that screenshots the Hearts of Iron 3 message log, runs it
//! through image enhancement and Tesseract, and appends operator-validated
//! log lines to a flat file.

// Hide console window on Windows for GUI mode
#![windows_subsystem = "windows"]

mod capture;
mod config;
mod error;
mod gui;
mod hotkey;
mod logging;
mod logline;
mod ocr;
mod paths;
mod pipeline;
mod reference;

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use capture::{ImageFile, PrimaryMonitor, ScreenSource};
use logline::PatternRegistry;
use pipeline::{CaptureSession, OperatorApproval};
use reference::ProvinceList;

/// When set, every capture replays this image instead of grabbing the screen.
const REPLAY_ENV: &str = "HOI3_CAPTURE_FILE";

fn main() -> Result<()> {
    logging::init_logging(&paths::get_logs_dir())?;
    logging::install_panic_hook();

    paths::ensure_directories().context("Failed to create output directories")?;

    let config = config::load_config();

    let provinces = ProvinceList::load(&config.province_names_path)
        .context("Please generate provinces list before logging")?;
    let registry = PatternRegistry::with_defaults(&config.extra_event_patterns)?;

    let tesseract = match ocr::find_tesseract_executable(config.tesseract_path.as_deref()) {
        Ok(path) => path,
        Err(e) => {
            warn!("{}", e);
            warn!("OCR will fail until Tesseract is installed.");
            PathBuf::from("tesseract")
        }
    };

    let session = CaptureSession::new(
        config,
        Arc::new(provinces),
        Arc::new(registry),
        tesseract,
        paths::get_runs_dir(),
    )?;

    let screen: Box<dyn ScreenSource> = match std::env::var_os(REPLAY_ENV) {
        Some(path) => {
            info!("Replaying {} for every capture", PathBuf::from(&path).display());
            Box::new(ImageFile::new(path))
        }
        None => Box::new(PrimaryMonitor),
    };

    let (channels, worker) = session.start(screen, Box::new(OperatorApproval));
    hotkey::spawn_global_hotkey(channels.triggers.clone());

    let ready_text = format!(
        "Ready: {} provinces, {} event patterns",
        session.provinces().len(),
        session.registry().len()
    );
    info!("{}", ready_text);

    match gui::run_gui(gui::GuiApp::new(channels, worker, ready_text)) {
        Ok(()) => {
            info!("Overlay exited normally");
            Ok(())
        }
        Err(e) => {
            error!("GUI error: {}", e);
            Err(anyhow!("GUI error: {}", e))
        }
    }
}
