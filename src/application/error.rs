use thiserror::Error;

use crate::domain::Amount;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{field} must not be negative (got {amount})")]
    NegativeAmount { field: &'static str, amount: Amount },

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
