//! Button callbacks: `open:<id>` expands an item in place, `broadcast:<id>`
//! reposts it to the configured target chat.

use crate::format;
use crate::telegram::types::CallbackQuery;
use crate::App;

pub async fn handle_callback(app: &App, callback: &CallbackQuery) -> Result<(), String> {
    // ack first so the client stops the spinner even if handling fails
    app.bot.answer_callback_query(&callback.id).await?;

    let Some(data) = callback.data.as_deref() else {
        return Ok(());
    };
    let Some(msg) = callback.message.as_ref() else {
        return Ok(());
    };

    if let Some(id_str) = data.strip_prefix("open:") {
        let Ok(id) = id_str.parse::<i64>() else {
            return Ok(());
        };
        let item = app
            .db
            .get_item(id)
            .map_err(|e| format!("item lookup failed: {}", e))?;
        let text = match &item {
            Some(item) => format::item_caption(item),
            None => "Item not found.".to_string(),
        };
        return app.bot.edit_message_html(msg.chat.id, msg.message_id, &text).await;
    }

    if let Some(id_str) = data.strip_prefix("broadcast:") {
        let Ok(id) = id_str.parse::<i64>() else {
            return Ok(());
        };
        let Some(target) = app.config.target_chat_id else {
            return app
                .bot
                .edit_message_html(msg.chat.id, msg.message_id, "No TARGET_CHAT_ID configured.")
                .await;
        };
        let Some(item) = app
            .db
            .get_item(id)
            .map_err(|e| format!("item lookup failed: {}", e))?
        else {
            return app
                .bot
                .edit_message_html(msg.chat.id, msg.message_id, "Item not found.")
                .await;
        };
        app.bot.send_html(target, &format::item_caption(&item), None).await?;
        return app
            .bot
            .edit_message_html(msg.chat.id, msg.message_id, "Broadcasted.")
            .await;
    }

    Ok(())
}
