//! Разбор HTML-страницы провайдера с карточками тарифов.
//!
//! Используется, когда API вернул провайдера с идентификатором, но без тарифов.
//! Результат имеет ту же форму `Tariff`, что и данные из API.

use scraper::{ElementRef, Html, Selector};

use crate::models::Tariff;

const CARD: &str = ".tariffCard";
const NAME: &str = ".name";
const PRICE: &str = ".price";
const SPEED: &str = ".dailySpeed__subtitle p";
const NIGHT_SPEED: &str = ".nightlySpeed__subtitle p";
const LIMIT: &str = ".limit__subtitle";
const KIND: &str = ".type__subtitle";

pub fn parse_tariff_cards(html: &str) -> Vec<Tariff> {
    let document = Html::parse_document(html);
    let Ok(card_selector) = Selector::parse(CARD) else {
        return Vec::new();
    };

    document
        .select(&card_selector)
        .map(|card| Tariff {
            plan_name: select_text(&card, NAME),
            speed: select_text(&card, SPEED),
            night_speed: select_text(&card, NIGHT_SPEED),
            price: select_text(&card, PRICE),
            limit: select_text(&card, LIMIT),
            kind: select_text(&card, KIND),
        })
        .collect()
}

fn select_text(card: &ElementRef<'_>, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let element = card.select(&selector).next()?;
    let text = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    (!text.is_empty()).then_some(text)
}
