use teloxide::prelude::*;
use std::error::Error;

use crate::bot_state::BotState;
use crate::handlers::utils::{parse_callback, send_screen};

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    bot.answer_callback_query(q.id.clone()).await?;

    let (Some(data), Some(message)) = (q.data.as_deref(), q.message.as_ref()) else {
        return Ok(());
    };
    let chat_id = message.chat().id;

    match parse_callback(data) {
        Some((lookup_serial, event)) => {
            let screen = state.process_provider_button(chat_id, lookup_serial, event).await;
            send_screen(&bot, chat_id, &screen).await?;
        }
        None => log::debug!("Ignoring callback {:?} from chat {}", data, chat_id),
    }

    Ok(())
}
