//! SQLite database backup
//!
//! Online snapshots through SQLite's backup API, written next to older
//! snapshots that are pruned to a fixed count.

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OpenFlags, backup::Backup};
use tracing::{debug, info, warn};

const BACKUP_PREFIX: &str = "spendbook_backup_";

/// Outcome of one backup run
#[derive(Debug)]
pub struct BackupSummary {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub duration_ms: u128,
    pub pruned: usize,
}

/// File name of a snapshot taken at `at`
pub fn backup_file_name(at: DateTime<Utc>) -> String {
    format!("{BACKUP_PREFIX}{}.db", at.format("%Y%m%d_%H%M%S"))
}

/// Where the snapshot goes: an explicit `.db` file, or a generated name
/// inside a directory
fn destination(output: Option<&Path>, at: DateTime<Utc>) -> PathBuf {
    match output {
        Some(path) if path.extension().is_some_and(|ext| ext == "db") => path.to_path_buf(),
        Some(dir) => dir.join(backup_file_name(at)),
        None => PathBuf::from(backup_file_name(at)),
    }
}

/// Snapshot `database` and prune older snapshots beside it
///
/// `keep` counts snapshots in the destination directory after this run;
/// zero keeps all of them.
pub async fn run_backup(database: &Path, output: Option<&Path>, keep: usize) -> Result<BackupSummary> {
    if !database.exists() {
        bail!("database {} does not exist", database.display());
    }

    let started = Instant::now();
    let target = destination(output, Utc::now());
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }

    info!(
        source = %database.display(),
        destination = %target.display(),
        "Starting SQLite online backup"
    );
    copy_database(database.to_path_buf(), target.clone()).await?;

    let size_bytes = tokio::fs::metadata(&target)
        .await
        .context("cannot stat backup file")?
        .len();

    let pruned = if keep == 0 {
        0
    } else {
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        prune_backups(dir, keep).await?
    };

    Ok(BackupSummary {
        path: target,
        size_bytes,
        duration_ms: started.elapsed().as_millis(),
        pruned,
    })
}

async fn copy_database(source: PathBuf, target: PathBuf) -> Result<()> {
    tokio::task::spawn_blocking(move || -> Result<()> {
        let src = Connection::open_with_flags(
            &source,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("cannot open source database")?;
        let mut dst = Connection::open(&target).context("cannot create backup file")?;

        Backup::new(&src, &mut dst)
            .context("cannot start backup")?
            .step(-1)
            .context("backup step failed")?;
        debug!("All pages copied");

        dst.close()
            .map_err(|(_, e)| e)
            .context("cannot close backup file")
    })
    .await
    .context("backup task panicked")?
}

/// Delete all but the `keep` newest snapshots in `dir`
pub async fn prune_backups(dir: &Path, keep: usize) -> Result<usize> {
    let mut snapshots = Vec::new();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("cannot read {}", dir.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(BACKUP_PREFIX) && name.ends_with(".db") {
            snapshots.push((name.to_string(), entry.path()));
        }
    }

    // timestamped names sort chronologically
    snapshots.sort_by(|a, b| b.0.cmp(&a.0));

    let mut removed = 0;
    for (_, path) in snapshots.into_iter().skip(keep) {
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "Deleted old backup");
                removed += 1;
            },
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to delete old backup"),
        }
    }
    Ok(removed)
}
