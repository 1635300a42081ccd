use crate::infra::{config::AppConfig, error::AppError};

/// Source of the merged application configuration.
pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig, AppError>;
}
