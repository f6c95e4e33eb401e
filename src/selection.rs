//! Машина состояний выбора адреса: город → район → улица → дом → провайдер.
//!
//! Транспорт превращает нажатия кнопок в [`Event`], машина меняет
//! [`UserState`] и возвращает [`Screen`]: что показать пользователю.
//! Строковые токены кнопок сюда не доходят.

use std::fmt;

use crate::lookup::config::AddressQuery;
use crate::lookup::LookupGateway;
use crate::models::{Catalog, CatalogError, Step, UserState};
use crate::pager::paginate;
use crate::presenter::{Presenter, ProviderList, TariffSheet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Next,
    Prev,
    Back,
    Select(String),
    SelectProvider(usize),
    /// Закрыть карточку тарифов и остаться в списке провайдеров.
    ShowProviderList,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    InvalidSelection,
    NotFound,
    LookupFailed,
    /// Нажата кнопка из сообщения, которое уже не соответствует сессии.
    OutdatedButton,
}

/// Текущая страница списка из каталога.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choices {
    pub step: Step,
    pub items: Vec<String>,
    pub page_index: usize,
    pub page_count: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub has_back: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Choices(Choices),
    HousePrompt,
    Providers(ProviderList),
    Tariffs(TariffSheet),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub view: View,
    pub notice: Option<Notice>,
    /// Номер поиска, к которому относятся inline-кнопки экрана.
    pub lookup_serial: u64,
}

impl Screen {
    fn new(view: View) -> Self {
        Self {
            view,
            notice: None,
            lookup_serial: 0,
        }
    }

    fn with_notice(view: View, notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            ..Self::new(view)
        }
    }
}

/// Внутренние рассогласования. Пользователю не показываются.
#[derive(Debug)]
pub enum SelectionError {
    OutOfRange { index: usize, len: usize },
    MissingSelection(Step),
    Catalog(CatalogError),
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::OutOfRange { index, len } => {
                write!(f, "Provider index {} out of range (have {})", index, len)
            }
            SelectionError::MissingSelection(step) => {
                write!(f, "Session reached {:?} without the required selections", step)
            }
            SelectionError::Catalog(e) => write!(f, "Session points outside the catalog: {}", e),
        }
    }
}

impl std::error::Error for SelectionError {}

impl From<CatalogError> for SelectionError {
    fn from(err: CatalogError) -> Self {
        SelectionError::Catalog(err)
    }
}

pub struct SelectionMachine<'a> {
    catalog: &'a Catalog,
    gateway: &'a dyn LookupGateway,
    presenter: &'a Presenter,
    page_size: usize,
}

impl<'a> SelectionMachine<'a> {
    pub fn new(
        catalog: &'a Catalog,
        gateway: &'a dyn LookupGateway,
        presenter: &'a Presenter,
        page_size: usize,
    ) -> Self {
        Self {
            catalog,
            gateway,
            presenter,
            page_size,
        }
    }

    pub async fn handle(&self, session: &mut UserState, event: Event) -> Result<Screen, SelectionError> {
        if event == Event::Reset {
            session.reset();
            return self.render_current(session);
        }

        match session.step {
            Step::City | Step::District | Step::Street => self.on_catalog_step(session, event),
            Step::House => self.on_house(session, event).await,
            Step::Provider => self.on_provider(session, event),
        }
    }

    /// Повторный показ текущего экрана без изменения шага.
    pub fn render_current(&self, session: &mut UserState) -> Result<Screen, SelectionError> {
        match session.step {
            Step::City | Step::District | Step::Street => self.choices(session).map(|c| Screen::new(View::Choices(c))),
            Step::House => Ok(Screen::new(View::HousePrompt)),
            Step::Provider => {
                if session.viewing_provider.is_some_and(|i| i >= session.lookup_result.len()) {
                    session.viewing_provider = None;
                }
                Ok(Screen {
                    lookup_serial: session.lookup_serial,
                    ..Screen::new(self.provider_view(session))
                })
            }
        }
    }

    fn on_catalog_step(&self, session: &mut UserState, event: Event) -> Result<Screen, SelectionError> {
        match event {
            Event::Next => {
                session.page_index = session.page_index.saturating_add(1);
                self.render_current(session)
            }
            Event::Prev => {
                session.page_index = session.page_index.saturating_sub(1);
                self.render_current(session)
            }
            Event::Back => {
                if let Some(parent) = session.step.parent() {
                    session.enter(parent);
                }
                self.render_current(session)
            }
            Event::Select(text) => {
                let path = session
                    .catalog_path()
                    .ok_or(SelectionError::MissingSelection(session.step))?;

                if !self.catalog.contains(&path, &text)? {
                    log::debug!("🚫 Invalid {:?} selection: {:?}", session.step, text);
                    let choices = self.choices(session)?;
                    return Ok(Screen::with_notice(View::Choices(choices), Notice::InvalidSelection));
                }

                let next = session.step.child().unwrap_or(Step::House);
                session.store_selection(text);
                session.enter(next);
                self.render_current(session)
            }
            Event::SelectProvider(_) | Event::ShowProviderList => {
                let choices = self.choices(session)?;
                Ok(Screen::with_notice(View::Choices(choices), Notice::InvalidSelection))
            }
            Event::Reset => self.render_current(session),
        }
    }

    async fn on_house(&self, session: &mut UserState, event: Event) -> Result<Screen, SelectionError> {
        let house = match event {
            Event::Back => {
                session.enter(Step::Street);
                return self.render_current(session);
            }
            Event::Select(text) => text,
            _ => return self.render_current(session),
        };

        session.selected_house = Some(house);

        let (Some(city), Some(district), Some(street), Some(house)) = (
            session.selected_city.as_deref(),
            session.selected_district.as_deref(),
            session.selected_street.as_deref(),
            session.selected_house.as_deref(),
        ) else {
            return Err(SelectionError::MissingSelection(Step::House));
        };

        let address = AddressQuery {
            city,
            district,
            street,
            house,
        };

        let result = self.gateway.lookup(&address).await;
        match result {
            Ok(providers) if providers.is_empty() => {
                log::info!("🔍 No providers for {:?}", address);
                Ok(Screen::with_notice(View::HousePrompt, Notice::NotFound))
            }
            Ok(providers) => {
                log::info!("✅ Found {} providers for {:?}", providers.len(), address);
                session.enter(Step::Provider);
                session.lookup_result = providers;
                session.lookup_serial = session.lookup_serial.wrapping_add(1);
                self.render_current(session)
            }
            Err(e) => {
                log::warn!("❌ Lookup failed for {:?}: {}", address, e);
                Ok(Screen::with_notice(View::HousePrompt, Notice::LookupFailed))
            }
        }
    }

    fn on_provider(&self, session: &mut UserState, event: Event) -> Result<Screen, SelectionError> {
        match event {
            Event::SelectProvider(index) => {
                let len = session.lookup_result.len();
                if index >= len {
                    return Err(SelectionError::OutOfRange { index, len });
                }
                session.viewing_provider = Some(index);
                self.render_current(session)
            }
            Event::Back => {
                if session.viewing_provider.take().is_none() {
                    session.enter(Step::House);
                }
                self.render_current(session)
            }
            Event::ShowProviderList => {
                session.viewing_provider = None;
                self.render_current(session)
            }
            _ => {
                let mut screen = self.render_current(session)?;
                screen.notice = Some(Notice::InvalidSelection);
                Ok(screen)
            }
        }
    }

    /// Сброс сессии со списком городов. Корень каталога есть всегда, поэтому без ошибок.
    pub fn restart(&self, session: &mut UserState) -> Screen {
        session.reset();
        let cities = self.catalog.cities();
        Screen::new(View::Choices(self.page_of(session, &cities)))
    }

    fn choices(&self, session: &mut UserState) -> Result<Choices, SelectionError> {
        let path = session
            .catalog_path()
            .ok_or(SelectionError::MissingSelection(session.step))?;
        let items = self.catalog.children(&path)?;
        Ok(self.page_of(session, &items))
    }

    fn page_of(&self, session: &mut UserState, items: &[&str]) -> Choices {
        let page = paginate(items, session.page_index, self.page_size);

        let choices = Choices {
            step: session.step,
            items: page.visible.iter().map(|s| s.to_string()).collect(),
            page_index: page.index,
            page_count: page.count,
            has_prev: page.has_prev,
            has_next: page.has_next,
            has_back: session.step.parent().is_some(),
        };

        session.page_index = page.index;
        choices
    }

    fn provider_view(&self, session: &UserState) -> View {
        match session.viewing_provider {
            Some(index) => View::Tariffs(
                self.presenter
                    .render_tariff_sheet(index, &session.lookup_result[index]),
            ),
            None => View::Providers(self.presenter.render_provider_list(&session.lookup_result)),
        }
    }
}
