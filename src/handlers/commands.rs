//! Slash-command handlers and the admin-only gates around them.

use crate::export;
use crate::format;
use crate::handlers::{messages, sender_id};
use crate::telegram::types::{InlineKeyboardButton, InlineKeyboardMarkup, Message};
use crate::App;

const COMMAND_RESULT_LIMIT: i64 = 10;

/// Split `/command[@botname] args` into a lower-cased command and its
/// argument tail. Returns `None` when the command is addressed to a
/// different bot.
pub fn parse_command<'a>(text: &'a str, bot_username: &str) -> Option<(String, &'a str)> {
    let rest = text.trim().strip_prefix('/')?;
    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (rest, ""),
    };
    let command = match head.split_once('@') {
        Some((command, target)) => {
            if !target.eq_ignore_ascii_case(bot_username) {
                return None;
            }
            command
        }
        None => head,
    };
    if command.is_empty() {
        return None;
    }
    Some((command.to_lowercase(), args))
}

pub async fn dispatch(app: &App, msg: &Message, command: &str, args: &str) -> Result<(), String> {
    let chat_id = msg.chat.id;
    let user_id = sender_id(msg);

    match command {
        "start" => start_cmd(app, chat_id).await,
        "help" => help_cmd(app, chat_id).await,
        "picker" => picker_cmd(app, chat_id).await,
        "add" => add_cmd(app, chat_id, user_id, args).await,
        "search" => search_cmd(app, chat_id, args).await,
        "tag" => tag_cmd(app, chat_id, args).await,
        "export" => export_cmd(app, chat_id, user_id).await,
        "delete" => delete_cmd(app, chat_id, user_id, args).await,
        "broadcast" => broadcast_cmd(app, chat_id, user_id, args).await,
        // unknown commands are ignored, like any unhandled update
        _ => Ok(()),
    }
}

fn picker_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![InlineKeyboardButton::picker_here("Open picker here")],
            vec![InlineKeyboardButton::picker_anywhere("Open picker (any chat)")],
        ],
    }
}

async fn start_cmd(app: &App, chat_id: i64) -> Result<(), String> {
    let text = format!(
        "Hi! I collect and organize your team's links and materials.\n\n\
         <b>Quick use</b>\n\
         • Paste a link and I'll save it (use #tags anywhere).\n\
         • Send files (PDF, PPT, DOCX) and I'll index them too.\n\n\
         <b>Search &amp; share from any chat</b>\n\
         • Type <code>@{username} query</code> in ANY chat to open the picker.\n\
         • Tip: type nothing after @ to see recent items.\n\n\
         Or tap a button below ⬇️",
        username = app.bot.username,
    );
    app.bot.send_html(chat_id, &text, Some(&picker_keyboard())).await
}

async fn help_cmd(app: &App, chat_id: i64) -> Result<(), String> {
    let text = format!(
        "<b>Commands</b>\n\
         /picker — open the inline picker in this chat\n\
         /add &lt;url&gt; [text + #tags] — save a link\n\
         /search &lt;query&gt; — search saved items\n\
         /tag &lt;tag&gt; — browse by tag\n\
         /export — (admin) export CSV\n\
         /delete &lt;id&gt; — (admin) remove an item\n\
         /broadcast &lt;id&gt; — (admin) repost an item to the target chat\n\
         \n\
         <i>Inline tips:</i> type <code>@{username}</code> in any chat to open the picker; \
         use <code>files:</code> to filter to files only, e.g. <code>files: policy</code>.",
        username = app.bot.username,
    );
    app.bot.send_html(chat_id, &text, None).await
}

async fn picker_cmd(app: &App, chat_id: i64) -> Result<(), String> {
    app.bot.send_message(chat_id, "Picker:", Some(&picker_keyboard())).await
}

/// First argument token as an item id. Only plain digit runs qualify, so
/// signed or otherwise decorated input falls back to the usage hint.
fn parse_item_id(args: &str) -> Option<i64> {
    let token = args.split_whitespace().next()?;
    if !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

async fn add_cmd(app: &App, chat_id: i64, user_id: i64, args: &str) -> Result<(), String> {
    if args.is_empty() {
        return app
            .bot
            .send_message(chat_id, "Usage: /add <url> optional description with #tags", None)
            .await;
    }
    messages::save_and_reply(app, chat_id, user_id, args).await
}

async fn search_cmd(app: &App, chat_id: i64, args: &str) -> Result<(), String> {
    if args.is_empty() {
        return app.bot.send_message(chat_id, "Usage: /search <keywords>", None).await;
    }
    let items = app
        .db
        .search_items(args, false, COMMAND_RESULT_LIMIT, 0)
        .map_err(|e| format!("search failed: {}", e))?;
    if items.is_empty() {
        return app.bot.send_message(chat_id, "No results.", None).await;
    }
    app.bot
        .send_html(chat_id, "<b>Results</b>:", format::results_keyboard(&items).as_ref())
        .await
}

async fn tag_cmd(app: &App, chat_id: i64, args: &str) -> Result<(), String> {
    let Some(tag) = args.split_whitespace().next() else {
        return app.bot.send_message(chat_id, "Usage: /tag <tag>", None).await;
    };
    let tag = tag.trim_start_matches('#');
    let items = app
        .db
        .items_by_tag(tag, COMMAND_RESULT_LIMIT, 0)
        .map_err(|e| format!("tag lookup failed: {}", e))?;
    if items.is_empty() {
        return app
            .bot
            .send_message(chat_id, &format!("No items found for #{}.", tag), None)
            .await;
    }
    let heading = format!("<b>{}</b>:", format::escape_html(&format!("#{}", tag)));
    app.bot
        .send_html(chat_id, &heading, format::results_keyboard(&items).as_ref())
        .await
}

async fn export_cmd(app: &App, chat_id: i64, user_id: i64) -> Result<(), String> {
    if !app.config.is_admin(user_id) {
        return app.bot.send_message(chat_id, "Admins only.", None).await;
    }
    let items = app.db.all_items().map_err(|e| format!("export failed: {}", e))?;
    let bytes = export::items_to_csv(&items)?;
    app.bot.send_document(chat_id, export::EXPORT_FILE_NAME, bytes).await
}

async fn delete_cmd(app: &App, chat_id: i64, user_id: i64, args: &str) -> Result<(), String> {
    if !app.config.is_admin(user_id) {
        return app.bot.send_message(chat_id, "Admins only.", None).await;
    }
    let Some(id) = parse_item_id(args) else {
        return app.bot.send_message(chat_id, "Usage: /delete <id>", None).await;
    };
    let deleted = app
        .db
        .delete_item(id)
        .map_err(|e| format!("delete failed: {}", e))?;
    app.bot
        .send_message(chat_id, if deleted { "Deleted." } else { "Not found." }, None)
        .await
}

async fn broadcast_cmd(app: &App, chat_id: i64, user_id: i64, args: &str) -> Result<(), String> {
    if !app.config.is_admin(user_id) {
        return app.bot.send_message(chat_id, "Admins only.", None).await;
    }
    let Some(target) = app.config.target_chat_id else {
        return app.bot.send_message(chat_id, "No TARGET_CHAT_ID configured.", None).await;
    };
    let Some(id) = parse_item_id(args) else {
        return app.bot.send_message(chat_id, "Usage: /broadcast <id>", None).await;
    };
    let Some(item) = app
        .db
        .get_item(id)
        .map_err(|e| format!("broadcast lookup failed: {}", e))?
    else {
        return app.bot.send_message(chat_id, "Item not found.", None).await;
    };
    app.bot
        .send_html(target, &format::item_caption(&item), None)
        .await?;
    app.bot.send_message(chat_id, "Broadcasted.", None).await
}
