use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use std::error::Error;

use crate::bot_state::BotState;
use crate::handlers::utils::send_screen;
use crate::selection::Event;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Mavjud buyruqlar:")]
pub enum Command {
    #[command(description = "manzilni qaytadan tanlash")]
    Start,
    #[command(description = "yordam")]
    Help,
}

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match cmd {
        Command::Start => handle_start(bot, msg, state).await?,
        Command::Help => handle_help(bot, msg).await?,
    }
    Ok(())
}

async fn handle_start(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    log::info!("🔄 Reset for chat {}", msg.chat.id);
    let screen = state.process_event(msg.chat.id, Event::Reset).await;
    send_screen(&bot, msg.chat.id, &screen).await
}

async fn handle_help(
    bot: Bot,
    msg: Message,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    bot.send_message(
        msg.chat.id,
        format!(
            "ℹ️ Bu bot manzilingiz bo‘yicha internet provayderlari va ularning tariflarini topadi.\n\n\
            1. Shahar, tuman va ko‘chani tanlang\n\
            2. Uy raqamini kiriting\n\
            3. Provayderni tanlab, tariflarini ko‘ring\n\n\
            {}",
            Command::descriptions()
        ),
    )
    .await?;

    Ok(())
}
