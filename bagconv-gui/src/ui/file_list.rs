//! Capture list (central panel) rendering.

use eframe::egui::{self, Color32};

use crate::app::BagconvApp;
use crate::state::FileStatus;

impl BagconvApp {
    /// Render the central panel with the selectable capture list.
    pub(crate) fn render_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Bag File Selection");
            ui.add_space(4.0);

            if self.files.is_empty() {
                ui.centered_and_justified(|ui| ui.label("No .bag files loaded"));
                return;
            }

            let editable = !self.processing.is_running;
            ui.add_enabled_ui(editable, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Select All").clicked() {
                        self.files.set_all(true);
                    }
                    if ui.button("Select None").clicked() {
                        self.files.set_all(false);
                    }
                    ui.label(format!(
                        "{} of {} selected",
                        self.files.selected_count(),
                        self.files.entries.len()
                    ));
                });
            });
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                for entry in &mut self.files.entries {
                    ui.horizontal(|ui| {
                        ui.add_enabled(
                            editable,
                            egui::Checkbox::new(&mut entry.selected, entry.name.as_str()),
                        );
                        if let Some(status) = self.processing.status_of(&entry.name) {
                            let (text, color) = status_label(status);
                            let label = ui.colored_label(color, text);
                            if let FileStatus::Failed(reason) = status {
                                label.on_hover_text(reason.as_str());
                            }
                        }
                    });
                }
            });
        });
    }
}

fn status_label(status: &FileStatus) -> (&'static str, Color32) {
    match status {
        FileStatus::Queued => ("queued", Color32::GRAY),
        FileStatus::Converting => ("converting...", Color32::LIGHT_BLUE),
        FileStatus::Done => ("done", Color32::GREEN),
        FileStatus::Failed(_) => ("failed", Color32::RED),
        FileStatus::Skipped => ("skipped", Color32::YELLOW),
    }
}
