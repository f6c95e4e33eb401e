//! Telegram-бот подбора интернет-провайдера по адресу.
//!
//! Пользователь выбирает город, район и улицу из справочника, вводит номер дома,
//! после чего бот запрашивает сервис покрытия и показывает провайдеров и их тарифы.

pub mod bot_state;
pub mod config;
pub mod handlers;
pub mod lookup;
pub mod models;
pub mod pager;
pub mod presenter;
pub mod selection;

#[cfg(test)]
pub mod test_support;
