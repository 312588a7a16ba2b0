use std::sync::Arc;

use eframe::egui;
use egui::{Color32, RichText};
use log::error;
use rfd::FileDialog;

use super::controller::{FormController, InputMode, StatusTone};
use crate::bundle::ModelBundle;
use crate::features::Feature;
use crate::report::{Summary, DOWNLOAD_FILE_NAME, PREDICTION_COLUMN};

/// Smallest window that still fits the two-column manual form.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(720.0, 560.0);

const EDIBLE_COLOR: Color32 = Color32::from_rgb(46, 160, 67);
const POISONOUS_COLOR: Color32 = Color32::from_rgb(218, 54, 51);

/// The single-window mushroom classification form.
pub struct MushroomApp {
    controller: FormController,
}

impl MushroomApp {
    pub fn new(bundle: Arc<ModelBundle>) -> Result<Self, String> {
        let controller = FormController::new(bundle).map_err(|err| err.to_string())?;
        Ok(Self { controller })
    }

    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    fn render_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("input_method_panel")
            .resizable(false)
            .default_width(180.0)
            .show(ctx, |ui| {
                ui.heading("Choose Input Method");
                ui.label("Select input method:");
                let mut mode = self.controller.mode();
                for option in InputMode::ALL {
                    ui.radio_value(&mut mode, option, option.label());
                }
                self.controller.set_mode(mode);
            });
    }

    fn render_footer(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bundle_footer").show(ctx, |ui| {
            let bundle = self.controller.bundle();
            let info = bundle.classifier().info();
            let source = bundle
                .source()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "in-memory bundle".to_string());
            ui.small(format!(
                "Bundle: {source} · {} features · {} model",
                info.n_features, info.kind
            ));
        });
    }

    fn render_manual(&mut self, ui: &mut egui::Ui) {
        ui.heading("Manual Input");
        egui::Grid::new("manual_inputs")
            .num_columns(2)
            .spacing([16.0, 6.0])
            .striped(true)
            .show(ui, |ui| {
                for feature in self.controller.features() {
                    ui.label(feature.label());
                    self.render_feature_combo(ui, feature);
                    ui.end_row();
                }
            });
    }

    fn render_feature_combo(&mut self, ui: &mut egui::Ui, feature: Feature) {
        let current = self.controller.selected(feature).unwrap_or_default().to_string();
        let options = self.controller.options(feature).to_vec();
        egui::ComboBox::from_id_salt(feature.column_name())
            .width(160.0)
            .selected_text(current.as_str())
            .show_ui(ui, |ui| {
                for option in &options {
                    if ui.selectable_label(current == *option, option).clicked() {
                        self.controller.select(feature, option);
                    }
                }
            });
    }

    fn render_upload(&mut self, ui: &mut egui::Ui) {
        ui.heading("Upload a CSV File");
        ui.horizontal(|ui| {
            if ui.button("Browse CSV…").clicked() {
                if let Some(path) = FileDialog::new().add_filter("CSV", &["csv"]).pick_file() {
                    self.controller.load_upload_path(&path);
                }
            }
            if self.controller.upload().is_some() && ui.button("Clear").clicked() {
                self.controller.clear_upload();
            }
            ui.label("Upload a CSV with same feature columns, or drop one onto the window.");
        });

        let Some(upload) = self.controller.upload() else {
            return;
        };
        ui.add_space(6.0);
        ui.label(format!("📄 Uploaded Data Preview: {}", upload.file_name));
        let columns = upload.table.columns().to_vec();
        let preview = self.controller.preview().unwrap_or_default();
        egui::ScrollArea::horizontal()
            .id_salt("upload_preview")
            .show(ui, |ui| {
                egui::Grid::new("upload_preview_grid").striped(true).show(ui, |ui| {
                    for column in &columns {
                        ui.strong(column);
                    }
                    ui.end_row();
                    for row in preview {
                        for cell in row {
                            ui.label(cell);
                        }
                        ui.end_row();
                    }
                });
            });

        if upload.schema_error.is_some() {
            ui.add_space(6.0);
            ui.colored_label(
                ui.visuals().error_fg_color,
                "⚠️ Uploaded file must contain exactly these columns:",
            );
            ui.code(self.controller.bundle().schema().column_names().join(", "));
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(path) = dropped.into_iter().find_map(|file| file.path) else {
            return;
        };
        self.controller.set_mode(InputMode::Upload);
        self.controller.load_upload_path(&path);
    }

    fn render_status(&self, ui: &mut egui::Ui) {
        let Some(status) = self.controller.status() else {
            return;
        };
        let color = match status.tone {
            StatusTone::Info => ui.visuals().text_color(),
            StatusTone::Success => EDIBLE_COLOR,
            StatusTone::Warning => ui.visuals().warn_fg_color,
            StatusTone::Error => ui.visuals().error_fg_color,
        };
        ui.colored_label(color, &status.text);
    }

    fn render_results(&mut self, ui: &mut egui::Ui) {
        let Some(report) = self.controller.report() else {
            return;
        };
        let summary = *report.summary();
        let tags: Vec<_> = report.predictions().to_vec();

        egui::ScrollArea::vertical()
            .id_salt("results_table")
            .max_height(240.0)
            .show(ui, |ui| {
                egui::Grid::new("results_grid").striped(true).show(ui, |ui| {
                    ui.strong("#");
                    ui.strong(PREDICTION_COLUMN);
                    ui.end_row();
                    for (idx, prediction) in tags.iter().enumerate() {
                        ui.label(idx.to_string());
                        let color = match prediction {
                            crate::report::Prediction::Edible => EDIBLE_COLOR,
                            crate::report::Prediction::Poisonous => POISONOUS_COLOR,
                        };
                        ui.colored_label(color, prediction.tag());
                        ui.end_row();
                    }
                });
            });

        ui.add_space(8.0);
        if ui.button("📥 Download Result CSV").clicked() {
            if let Some(path) = FileDialog::new()
                .set_file_name(DOWNLOAD_FILE_NAME)
                .add_filter("CSV", &["csv"])
                .save_file()
            {
                if let Err(err) = self.controller.save_report(&path) {
                    error!("Failed to save {}: {err}", path.display());
                }
            }
        }

        ui.add_space(12.0);
        render_summary(ui, &summary);
    }
}

fn render_summary(ui: &mut egui::Ui, summary: &Summary) {
    ui.heading("📊 Prediction Summary");
    ui.columns(3, |cols| {
        metric(&mut cols[0], "Total Samples", summary.total.to_string());
        metric(&mut cols[1], "🟢 Edible", summary.edible_display());
        metric(&mut cols[2], "🔴 Poisonous", summary.poisonous_display());
    });
}

fn metric(ui: &mut egui::Ui, label: &str, value: String) {
    ui.vertical(|ui| {
        ui.label(RichText::new(label).small());
        ui.label(RichText::new(value).size(26.0).strong());
    });
}

impl eframe::App for MushroomApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.render_sidebar(ctx);
        self.render_footer(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading(RichText::new("🍄 Mushroom Classification App").size(28.0));
                ui.label(
                    "Predict whether a mushroom is edible or poisonous based on its \
                     characteristics.",
                );
                ui.separator();

                match self.controller.mode() {
                    InputMode::Manual => self.render_manual(ui),
                    InputMode::Upload => self.render_upload(ui),
                }

                ui.add_space(10.0);
                if self.controller.can_predict() && ui.button("🔍 Predict").clicked() {
                    self.controller.predict();
                }
                self.render_status(ui);
                self.render_results(ui);
            });
        });
    }
}

/// Minimal fallback app to display startup errors.
pub struct LaunchError {
    pub message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to load the model bundle");
                ui.label(&self.message);
            });
        });
    }
}
