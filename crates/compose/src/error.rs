use thiserror::Error;

use rtc_taxonomy::SelectionError;

pub type Result<T> = std::result::Result<T, ComposeError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("an objective is required in single_request mode")]
    ObjectiveRequired,
}
