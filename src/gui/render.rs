//! Overlay rendering functions.

use eframe::egui::{self, Color32, RichText};

use super::state::{CaptureStatus, GuiState};

/// Render the capture and quit buttons.
/// Returns (screenshot_clicked, quit_clicked).
pub fn render_controls(ui: &mut egui::Ui) -> (bool, bool) {
    let mut screenshot_clicked = false;
    let mut quit_clicked = false;

    ui.horizontal(|ui| {
        // Captures queue up behind a running one, so the button stays enabled
        if ui.button("Screenshot (Ctrl + Alt + S)").clicked() {
            screenshot_clicked = true;
        }

        if ui.button("Quit").clicked() {
            quit_clicked = true;
        }
    });

    (screenshot_clicked, quit_clicked)
}

/// Render the correction editor while the worker waits on the operator.
/// Returns true when the operator confirms the text.
pub fn render_correction(ui: &mut egui::Ui, state: &mut GuiState) -> bool {
    let CaptureStatus::AwaitingCorrection(request) = &state.status else {
        return false;
    };
    let run_id = request.run_id;
    let mut continue_clicked = false;

    ui.add_space(8.0);
    ui.separator();
    ui.label(RichText::new(format!("Correct run {}", run_id)).strong());

    egui::ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
        ui.add(
            egui::TextEdit::multiline(&mut state.correction_buffer)
                .code_editor()
                .desired_rows(6)
                .desired_width(f32::INFINITY),
        );
    });

    if ui.button(RichText::new("Continue").strong()).clicked() {
        continue_clicked = true;
    }

    continue_clicked
}

/// Render the status label at the bottom of the overlay.
pub fn render_status(ui: &mut egui::Ui, state: &GuiState) {
    ui.add_space(8.0);
    ui.separator();

    let color = match &state.status {
        CaptureStatus::Idle => Color32::GRAY,
        CaptureStatus::Running => Color32::from_rgb(0, 120, 200),
        CaptureStatus::AwaitingCorrection(_) => Color32::from_rgb(200, 150, 0),
    };

    ui.label(RichText::new(&state.status_text).color(color));
    ui.label(
        RichText::new(format!(
            "{} logged, {} failed, {} queued",
            state.completed_runs, state.failed_runs, state.pending_runs
        ))
        .small(),
    );
}
