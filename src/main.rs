use std::time::Duration;

use dotenv::dotenv;

mod classify;
mod config;
mod db;
mod export;
mod format;
mod handlers;
mod models;
mod telegram;

use config::Config;
use db::Database;
use telegram::Bot;

pub struct App {
    pub config: Config,
    pub db: Database,
    pub bot: Bot,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let db = match Database::open(&config.db_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open database at {}: {}", config.db_path, e);
            std::process::exit(1);
        }
    };
    log::info!("DB initialized at {}", config.db_path);

    let bot = match Bot::connect(&config.bot_token).await {
        Ok(bot) => bot,
        Err(e) => {
            eprintln!("Failed to connect to Telegram: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Bot @{} is running (long-polling). Press Ctrl+C to stop.", bot.username);

    let app = App { config, db, bot };
    let mut offset = 0i64;

    loop {
        let updates = match app
            .bot
            .get_updates(offset, config::defaults::POLL_TIMEOUT_SECS)
            .await
        {
            Ok(updates) => updates,
            Err(e) => {
                log::warn!("getUpdates failed: {}", e);
                tokio::time::sleep(Duration::from_secs(3)).await;
                continue;
            }
        };

        for update in updates {
            let update_id = update.update_id;
            offset = offset.max(update_id + 1);
            // a failed handler never kills the poll loop
            if let Err(e) = handlers::handle_update(&app, update).await {
                log::warn!("update {} failed: {}", update_id, e);
            }
        }
    }
}
