use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use teloxide::types::ChatId;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::lookup::LookupGateway;
use crate::models::{Catalog, Step, UserState};
use crate::presenter::Presenter;
use crate::selection::{Event, Notice, Screen, SelectionMachine};

type SessionCache = Arc<RwLock<HashMap<ChatId, (UserState, SystemTime)>>>;

/// Общее состояние бота: каталог и шлюз общие для всех, сессии по чатам.
/// Обработка событий одного чата последовательна (так работает диспетчер teloxide),
/// поэтому сессия читается, меняется и сохраняется без удержания блокировки.
#[derive(Clone)]
pub struct BotState {
    catalog: Arc<Catalog>,
    gateway: Arc<dyn LookupGateway>,
    presenter: Arc<Presenter>,
    page_size: usize,
    session_ttl: Duration,
    sessions: SessionCache,
}

impl BotState {
    pub fn new(catalog: Catalog, gateway: Arc<dyn LookupGateway>, config: &Config) -> Self {
        Self {
            catalog: Arc::new(catalog),
            gateway,
            presenter: Arc::new(Presenter::new(&config.contact_handle)),
            page_size: config.page_size,
            session_ttl: config.session_ttl,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn machine(&self) -> SelectionMachine<'_> {
        SelectionMachine::new(&self.catalog, self.gateway.as_ref(), &self.presenter, self.page_size)
    }

    /// Сессия чата, если она есть и не истекла.
    pub async fn get_user_state(&self, chat_id: ChatId) -> Option<UserState> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&chat_id)
            .filter(|(_, touched)| !self.is_expired(*touched))
            .map(|(state, _)| state.clone())
    }

    pub async fn save_user_state(&self, chat_id: ChatId, state: UserState) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(chat_id, (state, SystemTime::now()));
    }

    pub async fn current_step(&self, chat_id: ChatId) -> Option<Step> {
        self.get_user_state(chat_id).await.map(|state| state.step)
    }

    /// Прогоняет событие через машину состояний и сохраняет сессию.
    /// Без живой сессии событие заменяется на сброс, пользователь видит список городов.
    /// Внутренние ошибки машины только логируются, пользователю перерисовывается текущий экран.
    pub async fn process_event(&self, chat_id: ChatId, event: Event) -> Screen {
        let start_time = Instant::now();

        let (mut session, event) = match self.get_user_state(chat_id).await {
            Some(session) => (session, event),
            None => {
                log::debug!("🆕 New session for chat {}", chat_id);
                (UserState::default(), Event::Reset)
            }
        };

        let machine = self.machine();
        let screen = match machine.handle(&mut session, event).await {
            Ok(screen) => screen,
            Err(e) => {
                log::error!("💥 Inconsistent session for chat {}: {}", chat_id, e);
                match machine.render_current(&mut session) {
                    Ok(screen) => screen,
                    Err(e) => {
                        log::error!("💥 Resetting chat {} after: {}", chat_id, e);
                        machine.restart(&mut session)
                    }
                }
            }
        };

        self.save_user_state(chat_id, session).await;

        log::debug!("⏱️ Event for chat {} handled in {:?}", chat_id, start_time.elapsed());
        screen
    }

    /// Нажатие inline-кнопки провайдеров. Кнопка из сообщения другого поиска
    /// (или нажатая уже после выхода из списка) сессию не меняет.
    pub async fn process_provider_button(&self, chat_id: ChatId, lookup_serial: u64, event: Event) -> Screen {
        let live = self
            .get_user_state(chat_id)
            .await
            .is_some_and(|session| session.step == Step::Provider && session.lookup_serial == lookup_serial);

        if live {
            return self.process_event(chat_id, event).await;
        }

        log::debug!("🕰️ Outdated provider button in chat {} (lookup #{})", chat_id, lookup_serial);
        self.redraw(chat_id, Some(Notice::OutdatedButton)).await
    }

    /// Повторный показ текущего экрана. Без живой сессии работает как сброс.
    pub async fn redraw(&self, chat_id: ChatId, notice: Option<Notice>) -> Screen {
        let Some(mut session) = self.get_user_state(chat_id).await else {
            return self.process_event(chat_id, Event::Reset).await;
        };

        let machine = self.machine();
        let screen = match machine.render_current(&mut session) {
            Ok(mut screen) => {
                screen.notice = notice;
                screen
            }
            Err(e) => {
                log::error!("💥 Resetting chat {} after: {}", chat_id, e);
                machine.restart(&mut session)
            }
        };

        self.save_user_state(chat_id, session).await;
        screen
    }

    pub async fn cleanup_cache(&self) {
        let mut sessions = self.sessions.write().await;
        let previous_count = sessions.len();

        sessions.retain(|_, (_, touched)| !self.is_expired(*touched));

        log::debug!("🧹 Sessions cleaned: {} -> {} entries", previous_count, sessions.len());
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn is_expired(&self, touched: SystemTime) -> bool {
        touched.elapsed().unwrap_or_default() >= self.session_ttl
    }
}
