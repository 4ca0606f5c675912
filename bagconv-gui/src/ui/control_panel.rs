//! Control panel (left sidebar) rendering.

use std::path::Path;

use bagconv_core::ExtractionSelection;
use eframe::egui::{self, Color32};
use rfd::FileDialog;

use crate::app::BagconvApp;

impl BagconvApp {
    /// Render the left sidebar with configuration, run controls and progress.
    pub(crate) fn render_side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("controls")
            .resizable(false)
            .min_width(280.0)
            .show(ctx, |ui| {
                ui.heading("Configuration");
                ui.add_space(6.0);
                ui.add_enabled_ui(!self.processing.is_running, |ui| {
                    self.render_path_pickers(ui);
                    ui.add_space(12.0);
                    self.render_extraction_options(ui);
                });

                ui.add_space(12.0);
                ui.separator();
                self.render_run_buttons(ui);
                ui.add_space(8.0);
                self.render_progress_status(ui);

                if let Some(error) = &self.error {
                    ui.add_space(8.0);
                    ui.colored_label(Color32::RED, error.as_str());
                }
            });
    }

    fn render_path_pickers(&mut self, ui: &mut egui::Ui) {
        ui.label("rs-convert executable:");
        ui.horizontal(|ui| {
            ui.label(display_name(self.converter_path.as_deref()));
            if ui.button("Browse").clicked() {
                if let Some(path) = FileDialog::new().set_title("Select rs-convert").pick_file() {
                    self.converter_path = Some(path);
                }
            }
        });

        ui.add_space(6.0);
        ui.label("Bag files directory:");
        ui.horizontal(|ui| {
            ui.label(display_name(self.capture_dir.as_deref()));
            if ui.button("Browse").clicked() {
                if let Some(dir) = FileDialog::new().pick_folder() {
                    self.open_directory(dir);
                }
            }
        });
    }

    fn render_extraction_options(&mut self, ui: &mut egui::Ui) {
        ui.label("Select file types to extract:");
        ui.radio_value(
            &mut self.extraction,
            ExtractionSelection::Both,
            "Extract both PLY and PNG files",
        );
        ui.radio_value(
            &mut self.extraction,
            ExtractionSelection::PointCloudOnly,
            "Extract PLY files only",
        );
        ui.radio_value(
            &mut self.extraction,
            ExtractionSelection::ImageOnly,
            "Extract PNG files only",
        );
    }

    fn render_run_buttons(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.can_start(), egui::Button::new("Start Conversion"))
                .clicked()
            {
                self.start_conversion();
            }
            let can_cancel = self.processing.is_running && !self.processing.cancel_requested;
            if ui
                .add_enabled(can_cancel, egui::Button::new("Cancel"))
                .clicked()
            {
                self.cancel_conversion();
            }
        });
    }

    fn render_progress_status(&self, ui: &mut egui::Ui) {
        ui.add(egui::ProgressBar::new(self.processing.progress).show_percentage());
        ui.label(self.processing.status_text.as_str());
        if !self.processing.eta_text.is_empty() {
            ui.weak(self.processing.eta_text.as_str());
        }
        if self.processing.is_running {
            ui.spinner();
        }
    }
}

fn display_name(path: Option<&Path>) -> String {
    path.and_then(Path::file_name)
        .map_or_else(|| "Not selected".to_string(), |name| name.to_string_lossy().into_owned())
}
