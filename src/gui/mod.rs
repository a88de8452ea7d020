//! Overlay window.
//!
//! A small always-on-top eframe window: status label, Screenshot and Quit
//! buttons, and an editor for texts the worker asks the operator to fix.

pub mod render;
pub mod state;

use std::thread::JoinHandle;
use std::time::Duration;

use eframe::egui::{self, Vec2};
use tracing::{error, info, warn};

use crate::pipeline::{CorrectionResponse, ShellChannels, TriggerSource};

use state::GuiState;

pub struct GuiApp {
    state: GuiState,
    channels: ShellChannels,
    worker: Option<JoinHandle<()>>,
}

impl GuiApp {
    pub fn new(channels: ShellChannels, worker: JoinHandle<()>, ready_text: String) -> Self {
        Self {
            state: GuiState::new(ready_text),
            channels,
            worker: Some(worker),
        }
    }

    /// Drains everything the worker sent since the last frame.
    fn poll_worker_events(&mut self) {
        while let Ok(event) = self.channels.events.try_recv() {
            self.state.apply_event(event);
        }
    }

    fn handle_screenshot(&mut self, source: TriggerSource) {
        match self.channels.triggers.send(source) {
            Ok(()) => {
                self.state.capture_requested();
                info!("GUI: capture requested ({:?})", source);
            }
            Err(e) => {
                error!("GUI: capture worker is gone: {}", e);
                self.state.status_text = "Capture worker stopped".to_string();
            }
        }
    }

    fn handle_continue(&mut self) {
        let Some((request, text)) = self.state.take_correction() else {
            return;
        };

        let response = CorrectionResponse {
            run_id: request.run_id,
            text,
        };
        if let Err(e) = self.channels.corrections.send(response) {
            error!("GUI: failed to send correction: {}", e);
        }
    }
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker_events();

        // Worker events arrive on another thread; keep polling
        ctx.request_repaint_after(Duration::from_millis(100));

        let shortcut = ctx.input(|i| i.modifiers.ctrl && i.modifiers.alt && i.key_pressed(egui::Key::S));
        if shortcut {
            self.handle_screenshot(TriggerSource::Shortcut);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let (screenshot_clicked, quit_clicked) = render::render_controls(ui);
            if screenshot_clicked {
                self.handle_screenshot(TriggerSource::Button);
            }
            if quit_clicked {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }

            if render::render_correction(ui, &mut self.state) {
                self.handle_continue();
            }

            render::render_status(ui, &self.state);
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("GUI: closing");
        // Releases a worker blocked on an operator correction
        let (corrections, _) = std::sync::mpsc::channel();
        drop(std::mem::replace(&mut self.channels.corrections, corrections));

        // The hotkey thread still holds a trigger sender, so an idle worker
        // never sees the channel close; it ends with the process.
        if let Some(handle) = self.worker.take() {
            if handle.is_finished() && handle.join().is_err() {
                warn!("GUI: capture worker panicked");
            }
        }
    }
}

/// Run the overlay. Blocks until the window is closed.
pub fn run_gui(app: GuiApp) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(Vec2::new(420.0, 320.0))
            .with_min_inner_size(Vec2::new(320.0, 160.0))
            .with_title("HoI3_statistics overlay")
            .with_always_on_top(),
        ..Default::default()
    };

    eframe::run_native(
        "HoI3_statistics overlay",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
