//! End-of-run summary window.

use eframe::egui;

use bagconv_core::ConversionOutcome;

use crate::app::BagconvApp;

impl BagconvApp {
    /// Show the last run's summary until dismissed.
    pub(crate) fn render_summary_window(&mut self, ctx: &egui::Context) {
        let Some(summary) = &self.processing.last_summary else {
            return;
        };
        let title = if summary.cancelled {
            "Conversion Cancelled"
        } else {
            "Conversion Complete"
        };

        let mut dismiss = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("Succeeded: {}", summary.succeeded));
                ui.label(format!("Failed: {}", summary.failed));
                ui.label(format!("Skipped: {}", summary.skipped));
                ui.label(format!("Elapsed: {:.1}s", summary.elapsed.as_secs_f64()));

                if summary.failed > 0 {
                    ui.separator();
                    egui::ScrollArea::vertical()
                        .max_height(200.0)
                        .show(ui, |ui| {
                            for record in summary.failures() {
                                if let ConversionOutcome::Failure(reason) = &record.outcome {
                                    ui.label(format!("{}: {reason}", record.file_name));
                                }
                            }
                        });
                }

                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismiss = true;
                }
            });

        if dismiss {
            self.processing.last_summary = None;
            self.processing.progress = 0.0;
        }
    }
}
