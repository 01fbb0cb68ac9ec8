//! Renders stored items into HTML captions, inline results, and result-list
//! keyboards. All user-supplied text is escaped before it reaches Telegram's
//! HTML parse mode.

use crate::classify::prettify_url;
use crate::models::Item;
use crate::telegram::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InlineQueryResult, InputTextMessageContent,
};

const CAPTION_DESCRIPTION_CHARS: usize = 200;
const BUTTON_LABEL_CHARS: usize = 60;
const RESULT_DESCRIPTION_CHARS: usize = 120;

/// Minimal HTML escaping for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn take_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// One line per non-empty field: bold title, prettified URL, truncated
/// description, italic tags, and always a trailing ID line.
pub fn item_caption(item: &Item) -> String {
    let mut parts = Vec::new();
    if !item.title.is_empty() {
        parts.push(format!("<b>{}</b>", escape_html(&item.title)));
    }
    if let Some(url) = item.url.as_deref() {
        if !url.is_empty() {
            parts.push(escape_html(&prettify_url(url)));
        }
    }
    if !item.description.is_empty() {
        parts.push(format!(
            "{}…",
            escape_html(take_chars(&item.description, CAPTION_DESCRIPTION_CHARS))
        ));
    }
    if !item.tags.is_empty() {
        parts.push(format!("<i>{}</i>", escape_html(&item.tags)));
    }
    parts.push(format!("ID: <code>{}</code>", item.id));
    parts.join("\n")
}

/// Button label: title, else prettified URL, else a synthesized file label.
fn button_label(item: &Item) -> String {
    let label = if !item.title.is_empty() {
        item.title.clone()
    } else {
        match item.url.as_deref() {
            Some(url) => prettify_url(url),
            None => format!("file #{}", item.id),
        }
    };
    take_chars(&label, BUTTON_LABEL_CHARS).to_string()
}

/// One `open:<id>` button per item; `None` when there is nothing to show.
pub fn results_keyboard(items: &[Item]) -> Option<InlineKeyboardMarkup> {
    if items.is_empty() {
        return None;
    }
    let buttons = items
        .iter()
        .map(|item| {
            vec![InlineKeyboardButton::callback(
                button_label(item),
                format!("open:{}", item.id),
            )]
        })
        .collect();
    Some(InlineKeyboardMarkup {
        inline_keyboard: buttons,
    })
}

/// Pick the inline result shape for an item: cached photo or document for
/// file items, article for links and notes.
pub fn inline_result(item: &Item) -> InlineQueryResult {
    let caption = item_caption(item);

    if let Some(file_id) = item.file_id.clone() {
        if item.is_image() {
            return InlineQueryResult::Photo {
                id: format!("photo-{}", item.id),
                photo_file_id: file_id,
                caption,
                parse_mode: "HTML",
            };
        }
        let title = if !item.title.is_empty() {
            item.title.clone()
        } else {
            item.file_name
                .clone()
                .unwrap_or_else(|| format!("File #{}", item.id))
        };
        return InlineQueryResult::Document {
            id: format!("doc-{}", item.id),
            document_file_id: file_id,
            title,
            caption,
            parse_mode: "HTML",
        };
    }

    let content = InputTextMessageContent {
        message_text: caption,
        parse_mode: "HTML",
    };

    if let Some(url) = item.url.clone() {
        let title = if !item.title.is_empty() {
            item.title.clone()
        } else {
            url.clone()
        };
        let description = if !item.tags.is_empty() {
            item.tags.clone()
        } else {
            url
        };
        return InlineQueryResult::Article {
            id: format!("url-{}", item.id),
            title,
            description: take_chars(&description, RESULT_DESCRIPTION_CHARS).to_string(),
            input_message_content: content,
        };
    }

    // plain note fallback
    let title = if !item.title.is_empty() {
        item.title.clone()
    } else {
        format!("Item #{}", item.id)
    };
    InlineQueryResult::Article {
        id: format!("note-{}", item.id),
        title,
        description: take_chars(&item.tags, RESULT_DESCRIPTION_CHARS).to_string(),
        input_message_content: content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(id: i64) -> Item {
        Item {
            id,
            url: None,
            title: String::new(),
            description: String::new(),
            tags: String::new(),
            added_by: Some(1),
            added_at: Utc::now(),
            file_id: None,
            file_name: None,
            file_type: None,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>&"quotes"&'</b>"#),
            "&lt;b&gt;&amp;&quot;quotes&quot;&amp;&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_caption_includes_only_present_fields() {
        let mut it = item(12);
        it.title = "Team <Handbook>".to_string();
        it.url = Some("https://www.example.com/handbook".to_string());
        it.tags = "#docs".to_string();

        let caption = item_caption(&it);
        let lines: Vec<&str> = caption.lines().collect();
        assert_eq!(
            lines,
            vec![
                "<b>Team &lt;Handbook&gt;</b>",
                "example.com/handbook",
                "<i>#docs</i>",
                "ID: <code>12</code>",
            ]
        );
    }

    #[test]
    fn test_caption_truncates_description() {
        let mut it = item(1);
        it.description = "x".repeat(300);
        let caption = item_caption(&it);
        let desc_line = caption.lines().next().unwrap();
        assert_eq!(desc_line.chars().count(), 201); // 200 chars + ellipsis
        assert!(desc_line.ends_with('…'));
    }

    #[test]
    fn test_bare_note_caption_still_has_id_line() {
        let caption = item_caption(&item(99));
        assert_eq!(caption, "ID: <code>99</code>");
    }

    #[test]
    fn test_inline_result_shapes() {
        let mut photo = item(1);
        photo.file_id = Some("P".to_string());
        photo.file_type = Some("image/jpeg".to_string());
        assert!(matches!(inline_result(&photo), InlineQueryResult::Photo { .. }));

        let mut doc = item(2);
        doc.file_id = Some("D".to_string());
        doc.file_name = Some("slides.pptx".to_string());
        doc.file_type = Some("application/vnd.ms-powerpoint".to_string());
        match inline_result(&doc) {
            InlineQueryResult::Document { title, .. } => assert_eq!(title, "slides.pptx"),
            other => panic!("expected document, got {other:?}"),
        }

        let mut link = item(3);
        link.url = Some("https://foo.bar".to_string());
        match inline_result(&link) {
            InlineQueryResult::Article { id, title, .. } => {
                assert_eq!(id, "url-3");
                assert_eq!(title, "https://foo.bar");
            }
            other => panic!("expected article, got {other:?}"),
        }

        match inline_result(&item(4)) {
            InlineQueryResult::Article { id, title, .. } => {
                assert_eq!(id, "note-4");
                assert_eq!(title, "Item #4");
            }
            other => panic!("expected article, got {other:?}"),
        }
    }

    #[test]
    fn test_results_keyboard_labels_and_data() {
        let mut a = item(5);
        a.title = "t".repeat(80);
        let mut b = item(6);
        b.url = Some("https://www.example.com/page".to_string());

        let kb = results_keyboard(&[a, b]).unwrap();
        assert_eq!(kb.inline_keyboard.len(), 2);
        let first = &kb.inline_keyboard[0][0];
        assert_eq!(first.text.chars().count(), 60);
        assert_eq!(first.callback_data.as_deref(), Some("open:5"));
        let second = &kb.inline_keyboard[1][0];
        assert_eq!(second.text, "example.com/page");

        assert!(results_keyboard(&[]).is_none());
    }
}
