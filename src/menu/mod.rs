mod grouped;

pub use grouped::{GroupedMenu, MenuGroup};
