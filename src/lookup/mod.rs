pub mod config;
pub mod scrape;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::lookup::config::{AddressQuery, CoverageResponse};
use crate::models::Provider;

#[derive(Debug)]
pub enum LookupError {
    /// Сеть, неуспешный HTTP-статус или нечитаемый ответ.
    Unavailable(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Unavailable(reason) => write!(f, "Coverage service unavailable: {}", reason),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Unavailable(format!("transport error: {}", err))
    }
}

impl From<url::ParseError> for LookupError {
    fn from(err: url::ParseError) -> Self {
        LookupError::Unavailable(format!("bad tariff page url: {}", err))
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Unavailable(format!("malformed payload: {}", err))
    }
}

/// Поиск провайдеров по адресу. Одна попытка на запрос, без повторов.
#[async_trait]
pub trait LookupGateway: Send + Sync {
    async fn lookup(&self, address: &AddressQuery<'_>) -> Result<Vec<Provider>, LookupError>;
}

/// Клиент coverage-check API с догрузкой тарифов со страницы провайдера.
pub struct HttpLookupGateway {
    client: Client,
    coverage_url: String,
    provider_page_url: Option<String>,
}

impl HttpLookupGateway {
    pub fn new(
        coverage_url: impl Into<String>,
        provider_page_url: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            coverage_url: coverage_url.into(),
            provider_page_url,
        })
    }

    async fn fetch_providers(&self, address: &AddressQuery<'_>) -> Result<Vec<Provider>, LookupError> {
        let response = self
            .client
            .get(&self.coverage_url)
            .header("Accept", "application/json")
            .query(address)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Unavailable(format!("coverage service returned HTTP {}", status)));
        }

        let text = response.text().await?;
        let payload = serde_json::from_str::<CoverageResponse>(&text)?;

        Ok(payload.into_providers())
    }

    async fn fetch_tariff_page(&self, base_url: &str, provider_id: &str) -> Result<String, LookupError> {
        let url = tariff_page_url(base_url, provider_id)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Unavailable(format!("tariff page returned HTTP {}", status)));
        }

        Ok(response.text().await?)
    }

    /// Тарифы для провайдеров, у которых в ответе API их нет.
    /// Ошибка страницы не ломает весь поиск: тарифы просто остаются пустыми.
    async fn enrich_tariffs(&self, providers: &mut [Provider]) {
        let Some(base_url) = self.provider_page_url.as_deref() else {
            return;
        };

        for provider in providers.iter_mut().filter(|p| p.tariffs.is_empty()) {
            let Some(id) = provider.id.clone() else {
                continue;
            };

            match self.fetch_tariff_page(base_url, &id).await {
                Ok(html) => {
                    provider.tariffs = scrape::parse_tariff_cards(&html);
                    log::debug!("📄 Scraped {} tariffs for provider {}", provider.tariffs.len(), provider.name);
                }
                Err(e) => {
                    log::warn!("⚠️ Tariff page for provider {} ({}) failed: {}", provider.name, id, e);
                }
            }
        }
    }
}

/// Id провайдера добавляется одним сегментом пути, со всем экранированием.
fn tariff_page_url(base_url: &str, provider_id: &str) -> Result<Url, LookupError> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|_| LookupError::Unavailable(format!("{} cannot be a base url", base_url)))?
        .pop_if_empty()
        .push(provider_id);
    Ok(url)
}

#[async_trait]
impl LookupGateway for HttpLookupGateway {
    async fn lookup(&self, address: &AddressQuery<'_>) -> Result<Vec<Provider>, LookupError> {
        let mut providers = self.fetch_providers(address).await?;
        self.enrich_tariffs(&mut providers).await;
        Ok(providers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_id_becomes_one_escaped_segment() {
        let url = tariff_page_url("https://internetbor.uz/provider/", "7").unwrap();
        assert_eq!(url.as_str(), "https://internetbor.uz/provider/7");

        let url = tariff_page_url("https://internetbor.uz/provider", "uz/net ?x").unwrap();
        assert_eq!(url.as_str(), "https://internetbor.uz/provider/uz%2Fnet%20%3Fx");
    }

    #[test]
    fn broken_base_url_is_unavailable() {
        assert!(matches!(
            tariff_page_url("not a url", "7"),
            Err(LookupError::Unavailable(_))
        ));
        assert!(matches!(
            tariff_page_url("mailto:admin@internetbor.uz", "7"),
            Err(LookupError::Unavailable(_))
        ));
    }
}
