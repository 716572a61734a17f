mod daemon;
mod stats;
mod status;
mod subject;
mod timer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use studymate_core::Config;

pub use daemon::execute as daemon;
pub use stats::execute as stats;
pub use status::execute as status;
pub use timer::{pause, reset, set, start, toggle};

pub mod subjects {
    pub use super::subject::{add, list, remove, select};
}

/// Location of the shared study database, read from the user configuration.
fn database_path(create_parent: bool) -> Result<PathBuf> {
    let config = Config::load().unwrap_or_default();
    let path = config.storage.resolved_database_path();

    if create_parent {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
    }

    Ok(path)
}
