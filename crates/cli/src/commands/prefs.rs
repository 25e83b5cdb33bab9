use anyhow::{Context, Result};
use services::services::notification::Notification;

use crate::{
    app::App,
    args::{PrefsAction, Switch},
};

pub fn run(app: &App, action: PrefsAction) -> Result<bool> {
    match action {
        PrefsAction::DarkMode { value } => {
            let prefs = app.preferences();
            let enabled = match value {
                None => prefs.dark_mode(),
                Some(Switch::Toggle) => prefs.toggle_dark_mode().context("failed to save preference")?,
                Some(switch) => {
                    let enabled = switch == Switch::On;
                    prefs
                        .set_dark_mode(enabled)
                        .context("failed to save preference")?;
                    enabled
                }
            };
            let state = if enabled { "activado" } else { "desactivado" };
            app.notifier
                .notify(Notification::info(format!("Modo oscuro {state}")));
        }
    }
    Ok(true)
}
