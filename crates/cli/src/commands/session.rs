use anyhow::{Context, Result};
use secrecy::SecretString;
use services::services::notification::Notification;

use crate::{app::App, args::SessionAction};

pub fn run(app: &App, action: SessionAction) -> Result<bool> {
    match action {
        SessionAction::SetToken { value } => {
            let token = value.trim();
            if token.is_empty() {
                app.notifier.notify(Notification::error("El token no puede estar vacío"));
                return Ok(false);
            }
            app.session
                .set_token(&SecretString::from(token.to_string()))
                .context("failed to store token")?;
            app.notifier.notify(Notification::success("Token guardado"));
        }
        SessionAction::Clear => {
            app.session.clear().context("failed to clear token")?;
            app.notifier.notify(Notification::success("Sesión cerrada"));
        }
        SessionAction::Status => {
            let message = if app.session.is_admin() {
                "Sesión de administrador activa"
            } else {
                "Sin sesión: usa `yuntas session set-token <TOKEN>`"
            };
            app.notifier.notify(Notification::info(message));
        }
    }
    Ok(true)
}
