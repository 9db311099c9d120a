//! Rolling copies of the database file, taken before it is opened.
//!
//! # Invariants
//! - Backups live in a `backups/` directory next to the database file.
//! - Backup file names embed a sortable local timestamp, so name order is
//!   age order.
//! - At most `max_backups` `.db` files remain after a successful backup.

use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

pub const BACKUP_DIR_NAME: &str = "backups";
const BACKUP_FILE_PREFIX: &str = "planner_";
const BACKUP_FILE_EXTENSION: &str = "db";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Result of one backup attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// The database file does not exist yet.
    NothingToBackUp,
    /// A copy was written; `pruned` older copies were removed.
    Created { path: PathBuf, pruned: usize },
}

#[derive(Debug)]
pub struct BackupError {
    action: &'static str,
    path: PathBuf,
    source: io::Error,
}

impl BackupError {
    fn new(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "database backup failed to {} `{}`: {}",
            self.action,
            self.path.display(),
            self.source
        )
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Copies `db_path` into the sibling `backups/` directory and prunes old copies.
///
/// `max_backups` below 1 is treated as 1 so the fresh copy always survives.
pub fn backup_database(
    db_path: impl AsRef<Path>,
    max_backups: usize,
) -> Result<BackupOutcome, BackupError> {
    let db_path = db_path.as_ref();
    match fs::metadata(db_path) {
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(BackupOutcome::NothingToBackUp);
        }
        Err(err) => return Err(BackupError::new("inspect", db_path, err)),
    }

    let backup_dir = backup_dir_for(db_path);
    fs::create_dir_all(&backup_dir)
        .map_err(|err| BackupError::new("create directory", &backup_dir, err))?;

    let stamp = chrono::Local::now().format(BACKUP_TIMESTAMP_FORMAT);
    let target = backup_dir.join(format!(
        "{BACKUP_FILE_PREFIX}{stamp}.{BACKUP_FILE_EXTENSION}"
    ));
    fs::copy(db_path, &target).map_err(|err| BackupError::new("copy to", &target, err))?;
    File::open(&target)
        .and_then(|file| file.sync_all())
        .map_err(|err| BackupError::new("sync", &target, err))?;

    let pruned = prune_backups(&backup_dir, max_backups.max(1))?;
    info!("event=db_backup module=db status=ok pruned={pruned}");

    Ok(BackupOutcome::Created {
        path: target,
        pruned,
    })
}

/// Directory holding backups of `db_path`.
pub fn backup_dir_for(db_path: &Path) -> PathBuf {
    db_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(BACKUP_DIR_NAME)
}

fn prune_backups(backup_dir: &Path, keep: usize) -> Result<usize, BackupError> {
    let entries =
        fs::read_dir(backup_dir).map_err(|err| BackupError::new("list", backup_dir, err))?;

    let mut backups = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| BackupError::new("list", backup_dir, err))?;
        let path = entry.path();
        let is_backup = path.is_file()
            && path.extension().and_then(|ext| ext.to_str()) == Some(BACKUP_FILE_EXTENSION);
        if is_backup {
            backups.push(path);
        }
    }

    if backups.len() <= keep {
        return Ok(0);
    }

    backups.sort();
    let excess = backups.len() - keep;
    for path in backups.iter().take(excess) {
        fs::remove_file(path).map_err(|err| BackupError::new("remove", path, err))?;
    }
    Ok(excess)
}
