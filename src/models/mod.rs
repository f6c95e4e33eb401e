pub mod location;
pub mod provider;
pub mod user_state;

pub use location::{Catalog, CatalogError};
pub use provider::{Provider, Tariff};
pub use user_state::{Step, UserState};
