//! Free-text saves and file indexing.

use rusqlite::Result as SqliteResult;

use crate::classify;
use crate::config::Config;
use crate::db::Database;
use crate::handlers::sender_id;
use crate::models::NewItem;
use crate::telegram::types::{InlineKeyboardButton, InlineKeyboardMarkup, Message};
use crate::App;

#[derive(Debug)]
pub enum SaveOutcome {
    Saved(Vec<i64>),
    /// Non-admins may only save messages that contain a link.
    NeedsUrl,
}

/// Classify submitted text and insert the resulting items: one per extracted
/// URL, or a single note item when an admin submits text without links.
pub fn save_text(
    db: &Database,
    config: &Config,
    user_id: i64,
    text: &str,
) -> SqliteResult<SaveOutcome> {
    let urls = classify::extract_urls(text);
    let tags = classify::extract_tags(text);
    let note = classify::extract_note(text);

    if urls.is_empty() {
        if !config.is_admin(user_id) {
            return Ok(SaveOutcome::NeedsUrl);
        }
        let title = if note.is_empty() { "Note".to_string() } else { note };
        let id = db.insert_item(NewItem {
            title,
            tags,
            added_by: Some(user_id),
            ..Default::default()
        })?;
        return Ok(SaveOutcome::Saved(vec![id]));
    }

    let mut created = Vec::with_capacity(urls.len());
    for url in urls {
        let url = classify::normalize_url(&url);
        let title = if note.is_empty() {
            classify::prettify_url(&url)
        } else {
            note.clone()
        };
        let id = db.insert_item(NewItem {
            url: Some(url),
            title,
            tags: tags.clone(),
            added_by: Some(user_id),
            ..Default::default()
        })?;
        created.push(id);
    }
    Ok(SaveOutcome::Saved(created))
}

pub async fn save_and_reply(
    app: &App,
    chat_id: i64,
    user_id: i64,
    text: &str,
) -> Result<(), String> {
    let outcome = save_text(&app.db, &app.config, user_id, text)
        .map_err(|e| format!("failed to save item: {}", e))?;

    let ids = match outcome {
        SaveOutcome::NeedsUrl => {
            return app
                .bot
                .send_message(chat_id, "Please include a link, or ask an admin to save notes.", None)
                .await;
        }
        SaveOutcome::Saved(ids) => ids,
    };

    let reply = if ids.len() == 1 {
        format!("Saved. ID: <code>{}</code>", ids[0])
    } else {
        let joined = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("Saved {} items. IDs: <code>{}</code>", ids.len(), joined)
    };

    let markup = match (app.config.target_chat_id, ids.last()) {
        (Some(_), Some(last)) => Some(InlineKeyboardMarkup {
            inline_keyboard: vec![vec![InlineKeyboardButton::callback(
                "Broadcast latest",
                format!("broadcast:{}", last),
            )]],
        }),
        _ => None,
    };

    app.bot.send_html(chat_id, &reply, markup.as_ref()).await
}

/// Index an uploaded document or photo (admin only). Stores the Telegram
/// file handle and basic metadata, never the file contents.
pub async fn on_file(app: &App, msg: &Message) -> Result<(), String> {
    let user_id = sender_id(msg);
    let chat_id = msg.chat.id;

    if !app.config.is_admin(user_id) {
        return app.bot.send_message(chat_id, "Only admins can store files.", None).await;
    }

    let (file_id, file_name, file_type) = if let Some(doc) = &msg.document {
        (doc.file_id.clone(), doc.file_name.clone(), doc.mime_type.clone())
    } else if let Some(largest) = msg.photo.as_ref().and_then(|sizes| sizes.last()) {
        (
            largest.file_id.clone(),
            Some("photo.jpg".to_string()),
            Some("image/jpeg".to_string()),
        )
    } else {
        return Ok(());
    };

    let caption = msg.caption.as_deref().unwrap_or("").trim();
    let tags = classify::extract_tags(caption);
    let title = if !caption.is_empty() {
        caption.to_string()
    } else {
        file_name.clone().unwrap_or_else(|| "File".to_string())
    };

    let item_id = app
        .db
        .insert_item(NewItem {
            title,
            tags,
            added_by: Some(user_id),
            file_id: Some(file_id),
            file_name,
            file_type,
            ..Default::default()
        })
        .map_err(|e| format!("failed to store file: {}", e))?;

    app.bot
        .send_html(chat_id, &format!("Stored file as item <code>{}</code>.", item_id), None)
        .await
}
