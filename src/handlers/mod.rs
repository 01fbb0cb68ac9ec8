//! Routes inbound Telegram updates to commands, free-text saves, file
//! indexing, inline queries, and button callbacks.

pub mod callbacks;
pub mod commands;
pub mod inline;
pub mod messages;

use crate::telegram::types::{Message, Update};
use crate::App;

pub async fn handle_update(app: &App, update: Update) -> Result<(), String> {
    if let Some(message) = update.message {
        handle_message(app, &message).await
    } else if let Some(query) = update.inline_query {
        inline::handle_inline_query(app, &query).await
    } else if let Some(callback) = update.callback_query {
        callbacks::handle_callback(app, &callback).await
    } else {
        Ok(())
    }
}

async fn handle_message(app: &App, msg: &Message) -> Result<(), String> {
    if msg.document.is_some() || msg.photo.as_ref().is_some_and(|p| !p.is_empty()) {
        return messages::on_file(app, msg).await;
    }

    let Some(text) = msg.text.as_deref() else {
        return Ok(());
    };

    if text.trim_start().starts_with('/') {
        // Commands addressed to other bots are dropped.
        if let Some((command, args)) = commands::parse_command(text, &app.bot.username) {
            return commands::dispatch(app, msg, &command, args).await;
        }
        return Ok(());
    }

    messages::save_and_reply(app, msg.chat.id, sender_id(msg), text).await
}

/// Messages without a sender (e.g. channel posts) get a sentinel id that is
/// never in the admin set.
pub(crate) fn sender_id(msg: &Message) -> i64 {
    msg.from.as_ref().map(|u| u.id).unwrap_or(0)
}
