use crate::parse;
use std::fmt::{self, Display, Formatter};

#[derive(Debug)]
pub enum Error {
    Parse(parse::Error),
    Request(reqwest::Error),
    Io(std::io::Error),
    Json(serde_json::Error),
    Config(String),
    Command(String),
    UnknownRestaurant(String),
}

impl From<parse::Error> for Error {
    fn from(e: parse::Error) -> Self {
        Error::Parse(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "Parse error: {}", e),
            Error::Request(e) => write!(f, "Request error: {}", e),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Json(e) => write!(f, "Json error: {}", e),
            Error::Config(msg) => write!(f, "Config error: {}", msg),
            Error::Command(msg) => write!(f, "Command error: {}", msg),
            Error::UnknownRestaurant(choice) => write!(f, "Unknown restaurant: {}", choice),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
