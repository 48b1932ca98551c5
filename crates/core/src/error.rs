use thiserror::Error;

use crate::model::{IdentityError, ParseDifficultyError, ParseIdError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    ParseId(#[from] ParseIdError),
    #[error(transparent)]
    ParseDifficulty(#[from] ParseDifficultyError),
}
