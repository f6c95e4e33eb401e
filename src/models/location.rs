use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;

// город → район → улица; номера домов в каталог не входят
const MAX_DEPTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    name: String,
    children: Vec<Node>,
}

/// Статический справочник адресов. Порядок ключей сохраняется как в исходном JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    cities: Vec<Node>,
}

#[derive(Debug)]
pub enum CatalogError {
    NotFound(Vec<String>),
    Io(String),
    Parse(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::NotFound(path) => write!(f, "Catalog node not found: [{}]", path.join(" / ")),
            CatalogError::Io(e) => write!(f, "Catalog read error: {}", e),
            CatalogError::Parse(e) => write!(f, "Catalog parse error: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}

impl Catalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(raw)?;
        match value {
            Value::Object(map) => Ok(Catalog {
                cities: parse_level(&map, 1)?,
            }),
            _ => Err(CatalogError::Parse("top level must be an object of cities".to_string())),
        }
    }

    /// Имена узлов на уровень ниже `path`: пустой путь → города,
    /// `[город]` → районы, `[город, район]` → улицы. У улицы детей нет.
    pub fn children<S: AsRef<str>>(&self, path: &[S]) -> Result<Vec<&str>, CatalogError> {
        let mut level = &self.cities;
        for (depth, key) in path.iter().enumerate() {
            let node = level
                .iter()
                .find(|node| node.name == key.as_ref())
                .ok_or_else(|| not_found(&path[..=depth]))?;
            level = &node.children;
        }

        Ok(level.iter().map(|node| node.name.as_str()).collect())
    }

    pub fn cities(&self) -> Vec<&str> {
        self.cities.iter().map(|city| city.name.as_str()).collect()
    }

    /// Проверка принадлежности: точное, регистрозависимое совпадение.
    pub fn contains<S: AsRef<str>>(&self, path: &[S], name: &str) -> Result<bool, CatalogError> {
        Ok(self.children(path)?.iter().any(|child| *child == name))
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn street_count(&self) -> usize {
        self.cities
            .iter()
            .flat_map(|city| city.children.iter())
            .map(|district| district.children.len())
            .sum()
    }
}

fn parse_level(map: &Map<String, Value>, depth: usize) -> Result<Vec<Node>, CatalogError> {
    let mut nodes = Vec::with_capacity(map.len());

    for (name, value) in map {
        let children = if depth == MAX_DEPTH {
            // значение улицы: непрозрачный маркер (обычно null)
            Vec::new()
        } else {
            match value {
                Value::Object(inner) => parse_level(inner, depth + 1)?,
                Value::Null => Vec::new(),
                other => {
                    return Err(CatalogError::Parse(format!(
                        "expected an object under \"{}\", got {}",
                        name, other
                    )))
                }
            }
        };

        nodes.push(Node {
            name: name.clone(),
            children,
        });
    }

    Ok(nodes)
}

fn not_found<S: AsRef<str>>(path: &[S]) -> CatalogError {
    CatalogError::NotFound(path.iter().map(|s| s.as_ref().to_string()).collect())
}
