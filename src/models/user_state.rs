use super::Provider;

/// Шаги выбора адреса в строгом порядке.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Step {
    #[default]
    City,
    District,
    Street,
    House,
    Provider,
}

impl Step {
    pub fn parent(self) -> Option<Step> {
        match self {
            Step::City => None,
            Step::District => Some(Step::City),
            Step::Street => Some(Step::District),
            Step::House => Some(Step::Street),
            Step::Provider => Some(Step::House),
        }
    }

    pub fn child(self) -> Option<Step> {
        match self {
            Step::City => Some(Step::District),
            Step::District => Some(Step::Street),
            Step::Street => Some(Step::House),
            Step::House => Some(Step::Provider),
            Step::Provider => None,
        }
    }
}

/// Состояние диалога одного пользователя.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserState {
    pub step: Step,
    pub selected_city: Option<String>,
    pub selected_district: Option<String>,
    pub selected_street: Option<String>,
    pub selected_house: Option<String>,
    pub page_index: usize,
    pub lookup_result: Vec<Provider>,
    /// Открытая карточка тарифов (под-экран шага Provider).
    pub viewing_provider: Option<usize>,
    /// Номер последнего успешного поиска. Попадает в данные inline-кнопок,
    /// чтобы кнопки старых сообщений не открывали чужой результат.
    pub lookup_serial: u64,
}

impl UserState {
    /// Сброс к выбору города. Счётчик поисков не обнуляется.
    pub fn reset(&mut self) {
        *self = UserState {
            lookup_serial: self.lookup_serial,
            ..UserState::default()
        };
    }

    /// Переход на шаг: страница обнуляется, поля шагов ниже очищаются.
    /// Номер дома сохраняется при возврате на House: это последний введённый адрес.
    pub fn enter(&mut self, step: Step) {
        self.step = step;
        self.page_index = 0;
        self.viewing_provider = None;

        match step {
            Step::City => {
                self.selected_city = None;
                self.selected_district = None;
                self.selected_street = None;
                self.selected_house = None;
                self.lookup_result.clear();
            }
            Step::District => {
                self.selected_district = None;
                self.selected_street = None;
                self.selected_house = None;
                self.lookup_result.clear();
            }
            Step::Street => {
                self.selected_street = None;
                self.selected_house = None;
                self.lookup_result.clear();
            }
            Step::House => self.lookup_result.clear(),
            Step::Provider => {}
        }
    }

    /// Путь в каталоге, дети которого перечисляются на текущем шаге.
    /// `None`, если нужное поле не заполнено (состояние рассогласовано).
    pub fn catalog_path(&self) -> Option<Vec<&str>> {
        match self.step {
            Step::City => Some(Vec::new()),
            Step::District => Some(vec![self.selected_city.as_deref()?]),
            Step::Street => Some(vec![
                self.selected_city.as_deref()?,
                self.selected_district.as_deref()?,
            ]),
            Step::House | Step::Provider => None,
        }
    }

    /// Сохраняет выбранное значение в поле текущего шага каталога.
    pub fn store_selection(&mut self, value: String) {
        match self.step {
            Step::City => self.selected_city = Some(value),
            Step::District => self.selected_district = Some(value),
            Step::Street => self.selected_street = Some(value),
            Step::House => self.selected_house = Some(value),
            Step::Provider => {}
        }
    }
}
