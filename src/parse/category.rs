/// Symbol shown for labels the site uses that we don't know about, and for items without a label.
pub const DEFAULT_SYMBOL: &str = "🍽️";

/// The categories the source site tags its menu items with.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Category {
    Soup,
    MainDish,
    Salad,
    Dessert,
    SideDish,
    Beverage,
    Sandwich,
    Lunch,
    Snack,
    Meat,
    Fish,
    MeatFree,
    Mixed,
    Pizza,
    FastFood,
    Unknown, // anything else, including an unlabeled item
}

impl Category {
    /// Matches the label exactly as the site writes it in the image `title` attribute.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Juha" => Self::Soup,
            "Glavna jed" => Self::MainDish,
            "Solata" => Self::Salad,
            "Sladica" => Self::Dessert,
            "Priloga" => Self::SideDish,
            "Pijača" => Self::Beverage,
            "Sendvič" => Self::Sandwich,
            "Kosilo" => Self::Lunch,
            "Malica" => Self::Snack,
            "Meso" => Self::Meat,
            "Riba" => Self::Fish,
            "Brezmesno" => Self::MeatFree,
            "Mešano" => Self::Mixed,
            "Pizza" => Self::Pizza,
            "Hitra hrana" => Self::FastFood,
            _ => Self::Unknown,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Soup => "🥣",
            Self::MainDish | Self::Mixed => "🍲",
            Self::Salad => "🥗",
            Self::Dessert => "🍨",
            Self::SideDish => "🍚",
            Self::Beverage => "🥤",
            Self::Sandwich => "🥪",
            Self::Meat => "🥩",
            Self::Fish => "🐟",
            Self::MeatFree => "🥬",
            Self::Pizza => "🍕",
            Self::FastFood => "🍟",
            Self::Lunch | Self::Snack | Self::Unknown => DEFAULT_SYMBOL,
        }
    }
}

/// Display symbol for a raw category label. Total: unknown labels get [`DEFAULT_SYMBOL`].
pub fn symbol_for(label: &str) -> &'static str {
    Category::from_label(label).symbol()
}
