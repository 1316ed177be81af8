use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    TextNodeParse(String),
    /// A menu entry whose title does not start with the item number.
    MalformedItem { title: String, reason: String },
}

impl Error {
    pub fn malformed_item(title: &str, reason: &str) -> Self {
        Self::MalformedItem {
            title: title.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "HTML Parse Error: {msg}"),
            Self::TextNodeParse(msg) => write!(f, "Text Node Parse Error: {msg}"),
            Self::MalformedItem { title, reason } => {
                write!(f, "Malformed Menu Item {title:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
