use std::collections::HashSet;
use std::env;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const BOT_TOKEN: &str = "BOT_TOKEN";
    /// Comma-separated numeric Telegram user ids with admin privileges.
    pub const ADMIN_IDS: &str = "ADMIN_IDS";
    /// Optional broadcast target (e.g. a channel id like -100123...).
    pub const TARGET_CHAT_ID: &str = "TARGET_CHAT_ID";
    pub const DB_PATH: &str = "DB_PATH";
}

/// Default values
pub mod defaults {
    pub const DB_PATH: &str = "shelfbot.sqlite3";
    pub const POLL_TIMEOUT_SECS: u64 = 50;
}

/// Process-wide configuration, read once at startup and passed explicitly.
#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub admin_ids: HashSet<i64>,
    pub target_chat_id: Option<i64>,
    pub db_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let bot_token = env::var(env_vars::BOT_TOKEN)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| "BOT_TOKEN not set. Create a .env with BOT_TOKEN=...".to_string())?;

        Ok(Config {
            bot_token,
            admin_ids: parse_admin_ids(&env::var(env_vars::ADMIN_IDS).unwrap_or_default()),
            target_chat_id: env::var(env_vars::TARGET_CHAT_ID)
                .ok()
                .and_then(|v| v.trim().parse().ok()),
            db_path: env::var(env_vars::DB_PATH).unwrap_or_else(|_| defaults::DB_PATH.to_string()),
        })
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

/// Non-numeric entries are ignored rather than rejected.
fn parse_admin_ids(raw: &str) -> HashSet<i64> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_ids() {
        let ids = parse_admin_ids("123, 456,,abc, 789 ");
        assert_eq!(ids, HashSet::from([123, 456, 789]));
        assert!(parse_admin_ids("").is_empty());
        assert!(parse_admin_ids("not,numbers").is_empty());
    }

    #[test]
    fn test_is_admin() {
        let config = Config {
            bot_token: "t".to_string(),
            admin_ids: HashSet::from([42]),
            target_chat_id: None,
            db_path: defaults::DB_PATH.to_string(),
        };
        assert!(config.is_admin(42));
        assert!(!config.is_admin(7));
    }
}
