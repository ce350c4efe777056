//! On-disk snapshot of the last inventory listing.
//!
//! Freshness is judged from the file's modification time alone; the payload
//! carries no timestamp.

use crate::console::print_debug;
use crate::error::{HopError, Result};
use crate::inventory::InventorySnapshot;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(3600);

pub struct CacheStore {
    path: PathBuf,
    max_age: Duration,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            path: path.into(),
            max_age,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot. A missing file is `Ok(None)`; anything unreadable
    /// is an error.
    pub fn load(&self) -> Result<Option<InventorySnapshot>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.read_error(e)),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| self.read_error(e))
    }

    /// Replaces the cache file. The payload goes to a sibling temp file first
    /// and is renamed into place, so a reader never sees half a snapshot.
    pub fn save(&self, snapshot: &InventorySnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
            }
        }

        let payload = serde_json::to_vec(snapshot).map_err(|e| self.write_error(e))?;
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, payload).map_err(|e| self.write_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.write_error(e))?;
        Ok(())
    }

    pub fn modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }

    pub fn is_stale(&self) -> bool {
        self.is_stale_at(SystemTime::now())
    }

    /// True when there is no cache file or `mtime + max_age < now`. An expiry
    /// past the end of representable time never goes stale.
    pub fn is_stale_at(&self, now: SystemTime) -> bool {
        match self.modified() {
            Some(mtime) => mtime
                .checked_add(self.max_age)
                .map_or(false, |expiry| expiry < now),
            None => true,
        }
    }

    /// The cached snapshot for `region`, or `None` when the inventory has to
    /// be listed again: refresh forced, cache missing or expired, or written
    /// for another region. A corrupt cache is still an error.
    pub fn fresh_snapshot(
        &self,
        region: &str,
        refresh: bool,
        verbose: bool,
    ) -> Result<Option<InventorySnapshot>> {
        if refresh {
            print_debug("Refresh requested, skipping cache", verbose);
            return Ok(None);
        }
        if self.is_stale() {
            print_debug("Cache missing or expired", verbose);
            return Ok(None);
        }

        match self.load()? {
            Some(snapshot) if snapshot.region == region => {
                print_debug(
                    &format!("Loaded {} instances from cache", snapshot.instances.len()),
                    verbose,
                );
                Ok(Some(snapshot))
            }
            Some(snapshot) => {
                print_debug(
                    &format!("Cache holds region {}, wanted {}", snapshot.region, region),
                    verbose,
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read_error(&self, e: impl std::fmt::Display) -> HopError {
        HopError::CacheRead {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }

    fn write_error(&self, e: impl std::fmt::Display) -> HopError {
        HopError::CacheWrite {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }
}
