pub mod callbacks;
pub mod commands;
pub mod messages;
pub mod utils;

pub use callbacks::callback_handler;
pub use commands::{command_handler, Command};
pub use messages::message_handler;

use std::time::Duration;
use tokio::time;

use crate::bot_state::BotState;

/// Периодическая очистка истёкших сессий.
pub async fn cleanup_sessions_task(state: BotState) {
    let mut interval = time::interval(Duration::from_secs(600));

    loop {
        interval.tick().await;
        state.cleanup_cache().await;
    }
}
