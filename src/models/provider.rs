use serde::{Deserialize, Serialize};

/// Тарифный план. Любое поле может отсутствовать, при выводе подставляется заглушка.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tariff {
    pub plan_name: Option<String>,
    pub speed: Option<String>,
    pub night_speed: Option<String>,
    pub price: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    pub id: Option<String>,
    pub logo: Option<String>,
    pub tariffs: Vec<Tariff>,
}

impl Provider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_tariff(mut self, tariff: Tariff) -> Self {
        self.tariffs.push(tariff);
        self
    }
}
