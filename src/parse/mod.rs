mod category;
mod error;
mod menu;
mod menu_item;
mod static_selector;
mod text_from_selection;
mod whitespace;

pub use error::{Error, Result};
pub use menu::{Extraction, Menu};
pub use menu_item::MenuItem;
