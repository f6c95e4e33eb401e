use serde::{Deserialize, Serialize};

use crate::models::{Provider, Tariff};

/// Параметры запроса к coverage-check.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct AddressQuery<'a> {
    pub city: &'a str,
    pub district: &'a str,
    pub street: &'a str,
    pub house: &'a str,
}

/// Ответ сервиса. Формат менялся: встречается и плоский список с одним
/// «лучшим» тарифом, и полный список тарифов, поэтому все поля необязательны.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CoverageResponse {
    #[serde(default)]
    pub providers: Option<Vec<ProviderPayload>>,
}

/// Альтернативные имена ключей объявлены отдельными полями: ответ может
/// содержать оба варианта сразу, а `alias` в таком случае даёт ошибку duplicate field.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProviderPayload {
    #[serde(default)]
    pub provider_name: Option<Scalar>,
    #[serde(default)]
    pub name: Option<Scalar>,
    #[serde(default)]
    pub provider_id: Option<Scalar>,
    #[serde(default)]
    pub id: Option<Scalar>,
    #[serde(default)]
    pub logo: Option<Scalar>,
    #[serde(default)]
    pub provider_logo: Option<Scalar>,
    #[serde(default)]
    pub tariffs: Option<Vec<TariffPayload>>,
    #[serde(default)]
    pub tariff: Option<TariffPayload>,
    #[serde(default)]
    pub best_tariff: Option<TariffPayload>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TariffPayload {
    #[serde(default)]
    pub name: Option<Scalar>,
    #[serde(default)]
    pub plan_name: Option<Scalar>,
    #[serde(default)]
    pub tariff_name: Option<Scalar>,
    #[serde(default)]
    pub speed: Option<Scalar>,
    #[serde(default)]
    pub night_speed: Option<Scalar>,
    #[serde(default)]
    pub nightly_speed: Option<Scalar>,
    #[serde(default)]
    pub price: Option<Scalar>,
    #[serde(default)]
    pub limit: Option<Scalar>,
    #[serde(default, rename = "type")]
    pub kind: Option<Scalar>,
    #[serde(default)]
    pub tariff_type: Option<Scalar>,
}

/// Значение, которое сервис присылает то строкой, то числом.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> Option<String> {
        let text = match self {
            Scalar::Text(s) => s.trim().to_string(),
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        };
        (!text.is_empty()).then_some(text)
    }
}

fn text(value: Option<Scalar>) -> Option<String> {
    value.and_then(Scalar::into_text)
}

/// Первое непустое значение из альтернативных ключей.
fn first_text<const N: usize>(values: [Option<Scalar>; N]) -> Option<String> {
    values.into_iter().find_map(text)
}

impl CoverageResponse {
    /// Провайдеры без имени отбрасываются.
    pub fn into_providers(self) -> Vec<Provider> {
        self.providers
            .unwrap_or_default()
            .into_iter()
            .filter_map(ProviderPayload::into_provider)
            .collect()
    }
}

impl ProviderPayload {
    pub fn into_provider(self) -> Option<Provider> {
        let name = first_text([self.provider_name, self.name])?;

        let mut tariffs: Vec<Tariff> = self
            .tariffs
            .unwrap_or_default()
            .into_iter()
            .map(TariffPayload::into_tariff)
            .collect();

        if tariffs.is_empty() {
            if let Some(best) = self.tariff.or(self.best_tariff) {
                tariffs.push(best.into_tariff());
            }
        }

        Some(Provider {
            name,
            id: first_text([self.provider_id, self.id]),
            logo: first_text([self.logo, self.provider_logo]),
            tariffs,
        })
    }
}

impl TariffPayload {
    pub fn into_tariff(self) -> Tariff {
        Tariff {
            plan_name: first_text([self.name, self.plan_name, self.tariff_name]),
            speed: text(self.speed),
            night_speed: first_text([self.night_speed, self.nightly_speed]),
            price: text(self.price),
            limit: text(self.limit),
            kind: first_text([self.kind, self.tariff_type]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Vec<Provider> {
        serde_json::from_str::<CoverageResponse>(raw).unwrap().into_providers()
    }

    #[test]
    fn flat_list_with_best_tariff() {
        let providers = parse(
            r#"{"providers": [
                {"provider_name": "Uzonline", "provider_id": 7, "tariff": {"name": "Oddiy", "price": 99000, "speed": "20 Mbit/s"}}
            ]}"#,
        );

        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].name, "Uzonline");
        assert_eq!(providers[0].id.as_deref(), Some("7"));
        assert_eq!(providers[0].tariffs.len(), 1);
        assert_eq!(providers[0].tariffs[0].plan_name.as_deref(), Some("Oddiy"));
        assert_eq!(providers[0].tariffs[0].price.as_deref(), Some("99000"));
        assert_eq!(providers[0].tariffs[0].night_speed, None);
    }

    #[test]
    fn rich_payload_with_tariff_list() {
        let providers = parse(
            r#"{"providers": [
                {"name": "Sarkor", "id": "sarkor", "logo": "https://cdn/logo.png",
                 "tariffs": [
                    {"plan_name": "Start", "type": "FTTB", "limit": "Cheksiz"},
                    {"plan_name": "Pro", "night_speed": "100 Mbit/s"}
                 ]}
            ]}"#,
        );

        let sarkor = &providers[0];
        assert_eq!(sarkor.logo.as_deref(), Some("https://cdn/logo.png"));
        assert_eq!(sarkor.tariffs.len(), 2);
        assert_eq!(sarkor.tariffs[0].kind.as_deref(), Some("FTTB"));
        assert_eq!(sarkor.tariffs[1].night_speed.as_deref(), Some("100 Mbit/s"));
    }

    #[test]
    fn nameless_providers_are_dropped() {
        let providers = parse(
            r#"{"providers": [
                {"provider_id": 1},
                {"provider_name": "  ", "provider_id": 2},
                {"provider_name": "Turon", "provider_id": null}
            ]}"#,
        );
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].name, "Turon");
        assert_eq!(providers[0].id, None);
    }

    #[test]
    fn missing_or_null_provider_list_is_empty() {
        assert!(parse("{}").is_empty());
        assert!(parse(r#"{"providers": null}"#).is_empty());
        assert!(parse(r#"{"providers": [], "status": "ok"}"#).is_empty());
    }

    #[test]
    fn old_and_new_key_names_in_one_object() {
        let providers = parse(
            r#"{"providers": [
                {"provider_name": "Uzonline", "name": "Uzonline", "provider_id": 7, "id": "7",
                 "logo": "", "provider_logo": "https://cdn/uz.png",
                 "tariffs": [
                    {"name": "", "plan_name": "Oddiy", "tariff_name": "Oddiy 2024",
                     "night_speed": "50 Mbit/s", "nightly_speed": "40 Mbit/s",
                     "type": "FTTB", "tariff_type": "ADSL"}
                 ]},
                {"name": "Sarkor", "best_tariff": {"plan_name": "Start"}}
            ]}"#,
        );

        assert_eq!(providers.len(), 2);
        let uz = &providers[0];
        assert_eq!(uz.name, "Uzonline");
        assert_eq!(uz.id.as_deref(), Some("7"));
        assert_eq!(uz.logo.as_deref(), Some("https://cdn/uz.png"));
        // пустое значение уступает следующему ключу
        assert_eq!(uz.tariffs[0].plan_name.as_deref(), Some("Oddiy"));
        assert_eq!(uz.tariffs[0].night_speed.as_deref(), Some("50 Mbit/s"));
        assert_eq!(uz.tariffs[0].kind.as_deref(), Some("FTTB"));
        assert_eq!(providers[1].tariffs[0].plan_name.as_deref(), Some("Start"));
    }

    #[test]
    fn query_serialises_all_four_fields() {
        let query = AddressQuery {
            city: "Toshkent",
            district: "Chilonzor",
            street: "Qatortol",
            house: "12A",
        };
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["house"], "12A");
        assert_eq!(value["district"], "Chilonzor");
    }
}
