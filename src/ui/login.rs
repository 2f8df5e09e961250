use eframe::egui::{self, Color32, RichText, Ui};

use crate::auth::GateStatus;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Passphrase prompt
// ---------------------------------------------------------------------------

/// Render the passphrase prompt shown until the gate opens.
pub fn passphrase_prompt(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(ui.available_height() * 0.3);
        ui.heading("Exploring the Mean Age of Suicide Mortality");
        ui.add_space(12.0);
        ui.label("🔒 Enter password:");

        let response = ui.add(
            egui::TextEdit::singleline(&mut state.passphrase_input)
                .password(true)
                .desired_width(220.0),
        );
        let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if entered || ui.button("Unlock").clicked() {
            state.submit_passphrase();
        }

        if state.gate.status() == GateStatus::Rejected {
            ui.add_space(6.0);
            ui.label(RichText::new("❌ Wrong password").color(Color32::RED));
        }
    });
}
