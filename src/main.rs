use std::sync::Arc;

use teloxide::prelude::*;

use tariff_finder_bot::bot_state::BotState;
use tariff_finder_bot::config::Config;
use tariff_finder_bot::handlers::{
    self, callback_handler, command_handler, message_handler, Command,
};
use tariff_finder_bot::lookup::{HttpLookupGateway, LookupGateway};
use tariff_finder_bot::models::Catalog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Загружаем .env и инициализируем логирование
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Starting tariff finder bot...");

    let config = Config::from_env()?;

    let catalog = Catalog::load(&config.locations_path)?;
    log::info!(
        "✅ Catalog loaded from {}: {} cities, {} streets",
        config.locations_path.display(),
        catalog.city_count(),
        catalog.street_count()
    );

    let gateway: Arc<dyn LookupGateway> = Arc::new(HttpLookupGateway::new(
        config.coverage_api_url.clone(),
        config.provider_page_url.clone(),
        config.lookup_timeout,
    )?);
    log::info!(
        "🌐 Coverage service: {} (tariff pages: {})",
        config.coverage_api_url,
        config.provider_page_url.as_deref().unwrap_or("disabled")
    );

    let state = BotState::new(catalog, gateway, &config);

    // Фоновая задача для очистки истёкших сессий
    let state_clone = state.clone();
    tokio::spawn(async move {
        handlers::cleanup_sessions_task(state_clone).await;
    });

    let bot = Bot::from_env();

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(Update::filter_callback_query().endpoint(callback_handler))
        .branch(Update::filter_message().endpoint(message_handler));

    log::info!("🚀 Starting dispatcher...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
