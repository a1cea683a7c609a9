use thiserror::Error;

/// Coarse classification of fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    LocationNotFound,
    Network,
    InvalidResponse,
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{endpoint} request failed with status {status}: {message}")]
    Upstream {
        endpoint: &'static str,
        status: u16,
        message: String,
    },

    #[error("Unexpected {endpoint} payload: {reason}")]
    InvalidResponse {
        endpoint: &'static str,
        reason: String,
    },
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::Input,
            Self::LocationNotFound(_) => ErrorKind::LocationNotFound,
            Self::Transport(_) | Self::Upstream { .. } => ErrorKind::Network,
            Self::InvalidResponse { .. } => ErrorKind::InvalidResponse,
        }
    }

    /// The one line shown to the user when a fetch fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(msg) => msg.clone(),
            Self::LocationNotFound(query) => format!("No location matches '{query}'."),
            Self::Transport(_) | Self::Upstream { .. } | Self::InvalidResponse { .. } => {
                "Unable to get weather data. Please try again.".to_string()
            }
        }
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
