use std::{io, path::PathBuf};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::{error, warn};
use thiserror::Error;

use skfiles_calendar::CalendarError;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error("Form relay answered with status {0}")]
    RelayStatus(reqwest::StatusCode),

    #[error("Form relay request failed: {0}")]
    Relay(#[from] reqwest::Error),

    #[error("Failed to read content file {path:?}: {source}")]
    ContentRead { path: PathBuf, source: io::Error },

    #[error("Invalid content: {0}")]
    ContentParse(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SiteError {
    pub fn status(&self) -> StatusCode {
        match self {
            SiteError::Calendar(CalendarError::EventNotFound(_)) => StatusCode::NOT_FOUND,
            SiteError::Calendar(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SiteError::RelayStatus(_) | SiteError::Relay(_) => StatusCode::BAD_GATEWAY,
            SiteError::ContentRead { .. } | SiteError::ContentParse(_) | SiteError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{self}");
        } else {
            warn!("{self}");
        }

        (status, self.to_string()).into_response()
    }
}
