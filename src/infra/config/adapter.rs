use std::path::{Path, PathBuf};

use crate::infra::{
    config::{load, AppConfig},
    contracts::ConfigAdapter,
    error::AppError,
};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Reads the first config file that exists among its candidates.
///
/// An explicit `--config` path is the only candidate when given; otherwise the
/// working directory is tried before the per-user config directory.
#[derive(Debug, Clone)]
pub struct FileConfigAdapter {
    candidates: Vec<PathBuf>,
}

impl FileConfigAdapter {
    pub fn new(explicit: Option<&Path>, config_dir: &Path) -> Self {
        let candidates = match explicit {
            Some(path) => vec![path.to_path_buf()],
            None => vec![
                PathBuf::from(CONFIG_FILE_NAME),
                config_dir.join(CONFIG_FILE_NAME),
            ],
        };

        Self { candidates }
    }

    pub fn source(&self) -> Option<&Path> {
        self.candidates
            .iter()
            .map(PathBuf::as_path)
            .find(|path| path.exists())
    }
}

impl ConfigAdapter for FileConfigAdapter {
    fn load(&self) -> Result<AppConfig, AppError> {
        match self.source() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "reading config file");
                load(path)
            }
            None => Ok(AppConfig::default()),
        }
    }
}
