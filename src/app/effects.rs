use tracing::error;

use crate::app::{App, Message, Model, ToastLevel};

impl App {
    /// Run the I/O a message asks for, after `update` has applied it.
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        if let Message::Save = msg {
            match model.save() {
                Ok(()) => {
                    let text = format!("Saved {} ({})", model.display_name(), model.format.label());
                    model.show_toast(ToastLevel::Info, text);
                }
                Err(err) => {
                    error!(%err, "save failed");
                    model.show_toast(ToastLevel::Error, format!("Save failed: {err:#}"));
                }
            }
        }
    }
}
