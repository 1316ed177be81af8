use url::Url;

/// `(id, name, menu page)` of every restaurant that gets scraped.
const RESTAURANTS: [(&str, &str, &str); 2] = [
    (
        "barjan",
        "Barjan",
        "https://www.studentska-prehrana.si/sl/restaurant/Details/2248",
    ),
    (
        "spar",
        "Spar",
        "https://www.studentska-prehrana.si/sl/restaurant/Details/1370",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restaurant {
    id: String,
    name: String,
    url: Url,
}

impl Restaurant {
    pub fn new(id: &str, name: &str, url: Url) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            url,
        }
    }

    pub fn defaults() -> Vec<Self> {
        RESTAURANTS
            .iter()
            .map(|&(id, name, url)| {
                let url = Url::parse(url).expect("restaurant urls should be valid!");
                Self::new(id, name, url)
            })
            .collect()
    }

    /// Looks a restaurant up by id or display name, ignoring case.
    pub fn find<'a>(restaurants: &'a [Self], choice: &str) -> Option<&'a Self> {
        let choice = choice.trim();
        restaurants
            .iter()
            .find(|r| r.id.eq_ignore_ascii_case(choice) || r.name.to_lowercase() == choice.to_lowercase())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Title of the first display block for this restaurant.
    pub fn title(&self) -> String {
        format!("{} Menu", self.name)
    }
}
