use std::fmt;
use crate::middleware::MiddlewareError;
use crate::settings::SettingsError;

#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    Settings(SettingsError),
    Middleware(MiddlewareError),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<SettingsError> for Error {
    fn from(err: SettingsError) -> Self {
        Error::Settings(err)
    }
}

impl From<MiddlewareError> for Error {
    fn from(err: MiddlewareError) -> Self {
        Error::Middleware(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO Error: {}", e),
            Error::Settings(e) => write!(f, "Settings Error: {}", e),
            Error::Middleware(e) => write!(f, "Middleware Error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            Error::Settings(e) => Some(e),
            Error::Middleware(e) => Some(e),
        }
    }
}
