use std::sync::Arc;

use anyhow::Result;
use eframe::egui;

use crate::data::model::PreparedDataset;
use crate::recompute::Recomputer;
use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CatalogApp {
    pub state: AppState,
}

impl CatalogApp {
    /// Start the recompute worker; it requests a repaint whenever charts are ready.
    pub fn new(cc: &eframe::CreationContext<'_>, dataset: Arc<PreparedDataset>) -> Result<Self> {
        let ctx = cc.egui_ctx.clone();
        let recomputer = Recomputer::spawn(dataset.clone(), move || ctx.request_repaint())?;
        Ok(Self {
            state: AppState::new(dataset, recomputer),
        })
    }
}

impl eframe::App for CatalogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_charts();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            charts::dashboard(ui, &self.state.charts);
        });
    }
}
