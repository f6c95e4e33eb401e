//! Тестовые заглушки. Компилируется только в тестах.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::lookup::config::AddressQuery;
use crate::lookup::{LookupError, LookupGateway};
use crate::models::Provider;

/// Отдаёт заранее заданные ответы по очереди и запоминает запросы.
/// Когда очередь пуста, возвращается пустой список провайдеров.
#[derive(Default)]
pub struct ScriptedGateway {
    responses: Mutex<VecDeque<Result<Vec<Provider>, LookupError>>>,
    calls: Mutex<Vec<[String; 4]>>,
}

impl ScriptedGateway {
    pub fn new(responses: Vec<Result<Vec<Provider>, LookupError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<[String; 4]> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LookupGateway for ScriptedGateway {
    async fn lookup(&self, address: &AddressQuery<'_>) -> Result<Vec<Provider>, LookupError> {
        self.calls.lock().unwrap().push([
            address.city.to_string(),
            address.district.to_string(),
            address.street.to_string(),
            address.house.to_string(),
        ]);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
