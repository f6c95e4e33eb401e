use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ParseMode, ReplyMarkup,
};
use std::error::Error;
use url::Url;

use crate::models::Step;
use crate::presenter::{ProviderList, TariffSheet};
use crate::selection::{Choices, Event, Notice, Screen, View};

pub const PREV_BUTTON: &str = "⏮️ Oldingi";
pub const NEXT_BUTTON: &str = "⏭️ Keyingi";
pub const BACK_BUTTON: &str = "🔙 Orqaga";

// данные inline-кнопок: provider:{номер поиска}:{индекс}, provider_list:{номер поиска}
pub const PROVIDER_CALLBACK_PREFIX: &str = "provider:";
pub const PROVIDER_LIST_CALLBACK_PREFIX: &str = "provider_list:";

/// Текст кнопки → событие. Всё, что не является служебной кнопкой, считается выбором.
pub fn parse_event(text: &str) -> Event {
    match text {
        PREV_BUTTON => Event::Prev,
        NEXT_BUTTON => Event::Next,
        BACK_BUTTON => Event::Back,
        other => Event::Select(other.to_string()),
    }
}

/// Данные inline-кнопки → номер поиска и событие. Неизвестные данные игнорируются.
pub fn parse_callback(data: &str) -> Option<(u64, Event)> {
    if let Some(serial) = data.strip_prefix(PROVIDER_LIST_CALLBACK_PREFIX) {
        return serial.parse().ok().map(|serial| (serial, Event::ShowProviderList));
    }

    let (serial, index) = data.strip_prefix(PROVIDER_CALLBACK_PREFIX)?.split_once(':')?;
    Some((serial.parse().ok()?, Event::SelectProvider(index.parse().ok()?)))
}

pub fn provider_callback(lookup_serial: u64, index: usize) -> String {
    format!("{}{}:{}", PROVIDER_CALLBACK_PREFIX, lookup_serial, index)
}

pub fn provider_list_callback(lookup_serial: u64) -> String {
    format!("{}{}", PROVIDER_LIST_CALLBACK_PREFIX, lookup_serial)
}

pub fn step_prompt(step: Step) -> &'static str {
    match step {
        Step::City => "Shaharni tanlang:",
        Step::District => "Tuman tanlang:",
        Step::Street => "Ko‘cha tanlang:",
        Step::House => "Uy raqamini kiriting:",
        Step::Provider => "Provayderni tanlang:",
    }
}

pub fn notice_text(notice: Notice, step: Step) -> &'static str {
    match (notice, step) {
        (Notice::InvalidSelection, Step::City) => "Shahar noto‘g‘ri. Qayta tanlang.",
        (Notice::InvalidSelection, Step::District) => "Tuman noto‘g‘ri. Qayta tanlang.",
        (Notice::InvalidSelection, Step::Street) => "Ko‘cha noto‘g‘ri. Qayta tanlang.",
        (Notice::InvalidSelection, _) => "❌ Tanlangan provayder topilmadi. Ro‘yxatdan tanlang.",
        (Notice::NotFound, _) => {
            "❌ Provayderlar topilmadi. Boshqa uy raqamini kiriting yoki orqaga qayting."
        }
        (Notice::LookupFailed, _) => {
            "❌ Provayderlarni yuklashda xatolik. Qayta urinib ko‘ring yoki orqaga qayting."
        }
        (Notice::OutdatedButton, _) => "⌛ Bu tugma eskirgan. Joriy menyudan foydalaning.",
    }
}

/// Клавиатура списка: по одному пункту в строке, навигация и «Назад».
pub fn make_choices_keyboard(choices: &Choices) -> KeyboardMarkup {
    let mut keyboard: Vec<Vec<KeyboardButton>> = choices
        .items
        .iter()
        .map(|item| vec![KeyboardButton::new(item.clone())])
        .collect();

    let mut navigation = Vec::new();
    if choices.has_prev {
        navigation.push(KeyboardButton::new(PREV_BUTTON));
    }
    if choices.has_next {
        navigation.push(KeyboardButton::new(NEXT_BUTTON));
    }
    if !navigation.is_empty() {
        keyboard.push(navigation);
    }

    if choices.has_back {
        keyboard.push(vec![KeyboardButton::new(BACK_BUTTON)]);
    }

    KeyboardMarkup::new(keyboard).resize_keyboard()
}

pub fn back_only_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(BACK_BUTTON)]]).resize_keyboard()
}

pub fn make_providers_keyboard(list: &ProviderList, lookup_serial: u64) -> InlineKeyboardMarkup {
    let keyboard: Vec<Vec<InlineKeyboardButton>> = list
        .entries
        .iter()
        .map(|entry| {
            vec![InlineKeyboardButton::callback(
                entry.label.clone(),
                provider_callback(lookup_serial, entry.index),
            )]
        })
        .collect();

    InlineKeyboardMarkup::new(keyboard)
}

pub fn make_tariff_keyboard(sheet: &TariffSheet, lookup_serial: u64) -> InlineKeyboardMarkup {
    let mut keyboard = Vec::new();

    match Url::parse(&sheet.contact.url) {
        Ok(url) => keyboard.push(vec![InlineKeyboardButton::url(
            format!("📞 {}", sheet.contact.handle),
            url,
        )]),
        Err(e) => log::warn!("⚠️ Contact link {} is not a valid URL: {}", sheet.contact.url, e),
    }

    keyboard.push(vec![InlineKeyboardButton::callback(
        "🔙 Provayderlar ro‘yxati",
        provider_list_callback(lookup_serial),
    )]);

    InlineKeyboardMarkup::new(keyboard)
}

fn view_step(view: &View) -> Step {
    match view {
        View::Choices(choices) => choices.step,
        View::HousePrompt => Step::House,
        View::Providers(_) | View::Tariffs(_) => Step::Provider,
    }
}

/// Отправка экрана в чат: сначала уведомление, затем сам экран с клавиатурой.
pub async fn send_screen(
    bot: &Bot,
    chat_id: ChatId,
    screen: &Screen,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if let Some(notice) = screen.notice {
        bot.send_message(chat_id, notice_text(notice, view_step(&screen.view)))
            .await?;
    }

    match &screen.view {
        View::Choices(choices) => {
            bot.send_message(chat_id, step_prompt(choices.step))
                .reply_markup(ReplyMarkup::Keyboard(make_choices_keyboard(choices)))
                .await?;
        }
        View::HousePrompt => {
            bot.send_message(chat_id, step_prompt(Step::House))
                .reply_markup(ReplyMarkup::Keyboard(back_only_keyboard()))
                .await?;
        }
        View::Providers(list) => {
            // reply-клавиатура с «Назад» и inline-список провайдеров: два сообщения
            bot.send_message(chat_id, format!("✅ Topilgan provayderlar: {}", list.entries.len()))
                .reply_markup(ReplyMarkup::Keyboard(back_only_keyboard()))
                .await?;
            bot.send_message(chat_id, step_prompt(Step::Provider))
                .reply_markup(make_providers_keyboard(list, screen.lookup_serial))
                .await?;
        }
        View::Tariffs(sheet) => {
            bot.send_message(chat_id, sheet.body.clone())
                .parse_mode(ParseMode::Html)
                .reply_markup(make_tariff_keyboard(sheet, screen.lookup_serial))
                .await?;
        }
    }

    Ok(())
}
