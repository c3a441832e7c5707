use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::APP_ID;

const DB_FILENAME: &str = "legalbot.db";
const OVERRIDE_DB_FILENAME: &str = "legalbot-override.db";

/// Where the chat database lives.
///
/// In override mode everything sits under a user-supplied directory.
/// In default mode the platform data directory is used
/// (`$XDG_DATA_HOME` or `~/.local/share` on Linux).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    pub root: PathBuf,
    pub override_mode: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataDirError {
    #[error("no data directory could be determined for this user, pass --data-dir")]
    NoDataHome,
}

impl DataDir {
    pub fn resolve(override_root: Option<&Path>) -> Result<Self, DataDirError> {
        match override_root {
            Some(root) => Ok(Self {
                root: root.to_path_buf(),
                override_mode: true,
            }),
            None => Ok(Self {
                root: app_root(dirs::data_dir())?,
                override_mode: false,
            }),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join(select_db_filename(self.override_mode))
    }
}

fn app_root(data_home: Option<PathBuf>) -> Result<PathBuf, DataDirError> {
    data_home
        .map(|home| home.join(APP_ID))
        .ok_or(DataDirError::NoDataHome)
}

/// Select the database filename based on override mode.
pub fn select_db_filename(override_mode: bool) -> &'static str {
    if override_mode {
        OVERRIDE_DB_FILENAME
    } else {
        DB_FILENAME
    }
}
