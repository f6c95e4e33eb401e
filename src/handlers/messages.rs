use teloxide::prelude::*;
use teloxide::types::ChatAction;
use std::error::Error;

use crate::bot_state::BotState;
use crate::handlers::utils::{parse_event, send_screen};
use crate::models::Step;
use crate::selection::Event;

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let chat_id = msg.chat.id;

    let Some(text) = msg.text() else {
        // стикер, фото и т.п.: просто показываем текущий экран ещё раз
        let screen = state.redraw(chat_id, None).await;
        return send_screen(&bot, chat_id, &screen).await;
    };

    // Неизвестные команды пропускаем, известные уже обработаны в command_handler
    if text.starts_with('/') {
        return Ok(());
    }

    let event = parse_event(text);

    if matches!(event, Event::Select(_)) && state.current_step(chat_id).await == Some(Step::House) {
        bot.send_message(chat_id, "🔍 Provayderlar qidirilmoqda...").await?;
        if let Err(e) = bot.send_chat_action(chat_id, ChatAction::Typing).await {
            log::debug!("Typing action for chat {} failed: {}", chat_id, e);
        }
    }

    let screen = state.process_event(chat_id, event).await;
    send_screen(&bot, chat_id, &screen).await
}
