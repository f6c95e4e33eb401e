use teloxide::utils::html;

use crate::models::{Provider, Tariff};

/// Заглушка для отсутствующих полей тарифа.
pub const PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEntry {
    pub label: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderList {
    pub entries: Vec<ProviderEntry>,
    pub has_back: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLink {
    pub handle: String,
    pub url: String,
}

/// Карточка тарифов провайдера. `body`: готовый HTML для Telegram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TariffSheet {
    pub provider_index: usize,
    pub body: String,
    pub contact: ContactLink,
}

#[derive(Debug, Clone)]
pub struct Presenter {
    contact: ContactLink,
}

impl Presenter {
    pub fn new(contact_handle: &str) -> Self {
        let handle = contact_handle.trim().trim_start_matches('@');
        Self {
            contact: ContactLink {
                handle: format!("@{}", handle),
                url: format!("https://t.me/{}", handle),
            },
        }
    }

    pub fn render_provider_list(&self, providers: &[Provider]) -> ProviderList {
        ProviderList {
            entries: providers
                .iter()
                .enumerate()
                .map(|(index, provider)| ProviderEntry {
                    label: provider.name.clone(),
                    index,
                })
                .collect(),
            has_back: true,
        }
    }

    pub fn render_tariff_sheet(&self, provider_index: usize, provider: &Provider) -> TariffSheet {
        let mut body = format!("<b>{}</b> tariflari:\n", html::escape(&provider.name));

        if provider.tariffs.is_empty() {
            body.push_str("\nℹ️ Tariflar haqida ma’lumot yo‘q.\n");
        }

        for tariff in &provider.tariffs {
            body.push('\n');
            body.push_str(&format_tariff(tariff));
            body.push('\n');
        }

        body.push_str(&format!(
            "\n📞 Ulanish uchun operator bilan bog‘laning: {}",
            html::escape(&self.contact.handle)
        ));

        TariffSheet {
            provider_index,
            body,
            contact: self.contact.clone(),
        }
    }
}

fn format_tariff(tariff: &Tariff) -> String {
    format!(
        "<b>{}</b>\n\
        🌐 Tezlik: {}\n\
        🌙 Tungi: {}\n\
        💸 Narx: {}\n\
        📶 Limit: {}\n\
        📡 Turi: {}",
        field(&tariff.plan_name),
        field(&tariff.speed),
        field(&tariff.night_speed),
        field(&tariff.price),
        field(&tariff.limit),
        field(&tariff.kind),
    )
}

fn field(value: &Option<String>) -> String {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => html::escape(text),
        _ => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_list_keeps_order_and_indices() {
        let presenter = Presenter::new("@support");
        let list = presenter.render_provider_list(&[Provider::new("Uzonline"), Provider::new("Sarkor")]);
        assert_eq!(
            list.entries,
            vec![
                ProviderEntry { label: "Uzonline".into(), index: 0 },
                ProviderEntry { label: "Sarkor".into(), index: 1 },
            ]
        );
        assert!(list.has_back);
    }

    #[test]
    fn missing_fields_render_placeholder() {
        let presenter = Presenter::new("support");
        let provider = Provider::new("ISP1").with_tariff(Tariff {
            plan_name: Some("Basic".into()),
            price: Some("50000".into()),
            ..Default::default()
        });

        let sheet = presenter.render_tariff_sheet(0, &provider);
        assert!(sheet.body.contains("<b>Basic</b>"));
        assert!(sheet.body.contains("💸 Narx: 50000"));
        assert!(sheet.body.contains(&format!("🌐 Tezlik: {}", PLACEHOLDER)));
        assert!(sheet.body.contains(&format!("📡 Turi: {}", PLACEHOLDER)));
        assert!(sheet.body.contains("@support"));
    }

    #[test]
    fn blank_values_count_as_absent() {
        let presenter = Presenter::new("support");
        let provider = Provider::new("ISP").with_tariff(Tariff {
            speed: Some("   ".into()),
            ..Default::default()
        });
        let sheet = presenter.render_tariff_sheet(0, &provider);
        assert!(sheet.body.contains(&format!("<b>{}</b>", PLACEHOLDER)));
        assert!(sheet.body.contains(&format!("🌐 Tezlik: {}", PLACEHOLDER)));
    }

    #[test]
    fn provider_without_tariffs_still_renders_contact() {
        let presenter = Presenter::new("@internetbor_admin");
        let sheet = presenter.render_tariff_sheet(2, &Provider::new("Empty"));
        assert_eq!(sheet.provider_index, 2);
        assert!(sheet.body.contains("Tariflar haqida"));
        assert_eq!(sheet.contact.url, "https://t.me/internetbor_admin");
        assert_eq!(sheet.contact.handle, "@internetbor_admin");
    }

    #[test]
    fn markup_in_data_is_escaped() {
        let presenter = Presenter::new("support");
        let provider = Provider::new("A&B <Net>").with_tariff(Tariff {
            plan_name: Some("<script>".into()),
            ..Default::default()
        });
        let sheet = presenter.render_tariff_sheet(0, &provider);
        assert!(sheet.body.contains("A&amp;B &lt;Net&gt;"));
        assert!(sheet.body.contains("&lt;script&gt;"));
        assert!(!sheet.body.contains("<script>"));
    }

    #[test]
    fn tariffs_are_rendered_in_order() {
        let presenter = Presenter::new("support");
        let provider = Provider::new("ISP")
            .with_tariff(Tariff { plan_name: Some("First".into()), ..Default::default() })
            .with_tariff(Tariff { plan_name: Some("Second".into()), ..Default::default() });
        let sheet = presenter.render_tariff_sheet(0, &provider);
        let first = sheet.body.find("First").unwrap();
        let second = sheet.body.find("Second").unwrap();
        assert!(first < second);
    }
}
