use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin};

use crate::ball::Ball;
use crate::sim::{SimSettings, SimStats, Viewport};

pub struct UiPlugin;
impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin).add_systems(Update, ui_system);
    }
}

/// One-line position/velocity summary for the diagnostics panel.
pub fn ball_readout(ball: &Ball) -> String {
    format!(
        "Pos: ({:.1}, {:.1})  Vel: ({:.2}, {:.2})",
        ball.position.x, ball.position.y, ball.velocity.x, ball.velocity.y
    )
}

// Read-only: nothing here writes back into the simulation.
fn ui_system(
    mut contexts: EguiContexts,
    settings: Res<SimSettings>,
    stats: Res<SimStats>,
    viewport: Res<Viewport>,
    diagnostics: Res<DiagnosticsStore>,
    ball_q: Query<&Ball>,
) {
    if !settings.running {
        egui::Window::new("Paused")
            .title_bar(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_TOP, [0.0, 12.0])
            .show(contexts.ctx_mut(), |ui| {
                ui.label("Paused (Space to resume)");
            });
    }

    if settings.show_help {
        egui::Window::new("Help").show(contexts.ctx_mut(), |ui| {
            ui.label("Space: Pause Simulation");
            ui.label("R: Drop Again");
            ui.label("H: Toggle Help");
            ui.label("F3: Toggle Diagnostics");
            ui.label("Esc: Quit");
        });
    }

    if settings.show_diagnostics {
        egui::Window::new("Diagnostics").show(contexts.ctx_mut(), |ui| {
            if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
                if let Some(value) = fps.smoothed() {
                    ui.label(format!("FPS: {:.1}", value));
                }
            }
            ui.label(format!("Ticks: {}  Skipped: {}", stats.ticks, stats.skipped));
            ui.label(format!(
                "Viewport: {:.0} x {:.0}",
                viewport.width, viewport.height
            ));
            if let Ok(ball) = ball_q.get_single() {
                ui.label(ball_readout(ball));
            }
        });
    }
}
