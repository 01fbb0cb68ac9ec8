//! Thin Telegram Bot API client over raw reqwest. Long-polls getUpdates and
//! exposes the handful of outbound methods the handlers need.

use serde_json::{json, Value};

use super::types::{InlineKeyboardMarkup, InlineQueryResult, Update};

pub struct Bot {
    token: String,
    client: reqwest::Client,
    pub username: String,
}

impl Bot {
    /// Validate the token against getMe and capture the bot's username for
    /// help text.
    pub async fn connect(token: &str) -> Result<Self, String> {
        let bot = Bot {
            token: token.to_string(),
            client: reqwest::Client::new(),
            username: String::new(),
        };
        let me = bot.api_call("getMe", &json!({})).await?;
        let username = me
            .get("username")
            .and_then(|v| v.as_str())
            .unwrap_or("bot")
            .to_string();
        Ok(Bot { username, ..bot })
    }

    async fn api_call(&self, method: &str, params: &Value) -> Result<Value, String> {
        let url = format!("https://api.telegram.org/bot{}/{}", self.token, method);

        let response = self
            .client
            .post(&url)
            .json(params)
            .send()
            .await
            .map_err(|e| format!("Failed to call Telegram API {}: {}", method, e))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(Self::parse_telegram_error(status, &body));
        }

        Self::parse_telegram_result(&body)
    }

    fn parse_telegram_error(status: reqwest::StatusCode, body: &str) -> String {
        if let Ok(error_json) = serde_json::from_str::<Value>(body) {
            let error_code = error_json.get("error_code").and_then(|c| c.as_u64()).unwrap_or(0);
            let description = error_json
                .get("description")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error");
            format!("Telegram API error: {} (code {})", description, error_code)
        } else {
            format!("Telegram API error ({}): {}", status, body)
        }
    }

    fn parse_telegram_result(body: &str) -> Result<Value, String> {
        let response_json: Value = serde_json::from_str(body)
            .map_err(|e| format!("Failed to parse Telegram response: {}", e))?;

        if response_json.get("ok").and_then(|v| v.as_bool()) != Some(true) {
            let description = response_json
                .get("description")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error");
            let error_code = response_json.get("error_code").and_then(|c| c.as_u64()).unwrap_or(0);
            return Err(format!("Telegram API error: {} (code {})", description, error_code));
        }

        Ok(response_json.get("result").cloned().unwrap_or(json!(true)))
    }

    /// Long-poll for updates. `offset` should be one past the last update_id
    /// already handled.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, String> {
        let result = self
            .api_call(
                "getUpdates",
                &json!({
                    "offset": offset,
                    "timeout": timeout_secs,
                    "allowed_updates": ["message", "inline_query", "callback_query"],
                }),
            )
            .await?;
        serde_json::from_value(result).map_err(|e| format!("Failed to parse updates: {}", e))
    }

    /// Plain-text message, no markup interpretation, with an optional inline
    /// keyboard.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), String> {
        let mut body = json!({ "chat_id": chat_id, "text": text });
        if let Some(markup) = reply_markup {
            body["reply_markup"] = serde_json::to_value(markup)
                .map_err(|e| format!("Failed to serialize keyboard: {}", e))?;
        }
        self.api_call("sendMessage", &body).await?;
        Ok(())
    }

    /// HTML-formatted message with an optional inline keyboard.
    pub async fn send_html(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), String> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(markup) = reply_markup {
            body["reply_markup"] = serde_json::to_value(markup)
                .map_err(|e| format!("Failed to serialize keyboard: {}", e))?;
        }
        self.api_call("sendMessage", &body).await?;
        Ok(())
    }

    pub async fn edit_message_html(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), String> {
        self.api_call(
            "editMessageText",
            &json!({
                "chat_id": chat_id,
                "message_id": message_id,
                "text": text,
                "parse_mode": "HTML",
            }),
        )
        .await?;
        Ok(())
    }

    pub async fn answer_inline_query(
        &self,
        inline_query_id: &str,
        results: &[InlineQueryResult],
    ) -> Result<(), String> {
        let results = serde_json::to_value(results)
            .map_err(|e| format!("Failed to serialize inline results: {}", e))?;
        self.api_call(
            "answerInlineQuery",
            &json!({
                "inline_query_id": inline_query_id,
                "results": results,
                "cache_time": 0,
                "is_personal": true,
            }),
        )
        .await?;
        Ok(())
    }

    /// Ack a callback so the client stops showing a spinner.
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), String> {
        self.api_call(
            "answerCallbackQuery",
            &json!({ "callback_query_id": callback_query_id }),
        )
        .await?;
        Ok(())
    }

    /// Upload a document from memory via multipart.
    pub async fn send_document(
        &self,
        chat_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), String> {
        let url = format!("https://api.telegram.org/bot{}/sendDocument", self.token);
        let form = reqwest::multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .part(
                "document",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string()),
            );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("Failed to call Telegram API sendDocument: {}", e))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(Self::parse_telegram_error(status, &body));
        }
        Self::parse_telegram_result(&body)?;
        Ok(())
    }
}
