//! Selection log
//!
//! Flat CSV file with one header row and one row per decision, in the
//! order decisions were submitted. On exhaustion the file is renamed to a
//! timestamped archive and a fresh file holding only the header replaces it.

use crate::error::{Error, Result};
use crate::pairs::Pair;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Column names of the CSV header row
pub const HEADER: [&str; 4] = ["timestamp", "image_a", "image_b", "chosen"];

/// One recorded decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub timestamp: DateTime<Utc>,
    pub image_a: String,
    pub image_b: String,
    pub chosen: String,
}

impl SelectionRecord {
    /// Record a decision made now; `chosen` must belong to `pair`
    pub fn new(pair: &Pair, chosen: &str) -> Result<Self> {
        Self::at(exo_common::time::now(), pair, chosen)
    }

    pub fn at(timestamp: DateTime<Utc>, pair: &Pair, chosen: &str) -> Result<Self> {
        if !pair.contains(chosen) {
            return Err(Error::InvalidSelection(format!(
                "'{}' is not one of '{}' and '{}'",
                chosen,
                pair.image_a(),
                pair.image_b()
            )));
        }
        Ok(Self {
            timestamp,
            image_a: pair.image_a().to_string(),
            image_b: pair.image_b().to_string(),
            chosen: chosen.to_string(),
        })
    }

    /// The pair this decision was made on
    pub fn pair(&self) -> Result<Pair> {
        Pair::new(self.image_a.clone(), self.image_b.clone())
    }
}

/// Handle on the current selection log file
#[derive(Debug)]
pub struct SelectionLog {
    output_dir: PathBuf,
    file_name: String,
}

impl SelectionLog {
    /// Open the log, creating the directory and a header-only file if needed
    pub fn open(output_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Result<Self> {
        let log = Self {
            output_dir: output_dir.into(),
            file_name: file_name.into(),
        };

        fs::create_dir_all(&log.output_dir)
            .map_err(|e| Error::WriteError(describe(&log.output_dir, e)))?;
        log.ensure_header()?;

        Ok(log)
    }

    pub fn path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Append one decision as a new row
    pub fn append(&self, record: &SelectionRecord) -> Result<()> {
        self.ensure_header()?;

        let path = self.path();
        let file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(|e| Error::WriteError(describe(&path, e)))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .serialize(record)
            .map_err(|e| Error::WriteError(describe(&path, e)))?;
        writer
            .flush()
            .map_err(|e| Error::WriteError(describe(&path, e)))?;

        Ok(())
    }

    /// All decisions in the current log, in submission order
    pub fn records(&self) -> Result<Vec<SelectionRecord>> {
        let path = self.path();
        let mut reader = csv::Reader::from_path(&path)
            .map_err(|e| Error::ReadError(describe(&path, e)))?;

        reader
            .deserialize()
            .collect::<std::result::Result<Vec<SelectionRecord>, _>>()
            .map_err(|e| Error::ReadError(describe(&path, e)))
    }

    /// Move the current log to a timestamped archive and start a fresh one
    ///
    /// Returns the archive path. On failure the current log keeps its rows.
    pub fn archive_and_reset(&self) -> Result<PathBuf> {
        let current = self.path();
        let archive = self.next_archive_path(&exo_common::time::archive_stamp_now());

        fs::rename(&current, &archive).map_err(|e| {
            Error::ArchiveError(format!(
                "rename {} -> {}: {}",
                current.display(),
                archive.display(),
                e
            ))
        })?;

        if let Err(e) = write_header_only(&current) {
            warn!("Fresh log could not be created, restoring {}", current.display());
            if let Err(restore) = fs::rename(&archive, &current) {
                return Err(Error::ArchiveError(format!(
                    "{}; rows remain in {} ({})",
                    e,
                    archive.display(),
                    restore
                )));
            }
            return Err(Error::ArchiveError(e));
        }

        info!("Archived selection log to {}", archive.display());
        Ok(archive)
    }

    /// Archive name for `stamp`, suffixed `_1`, `_2`, ... if already taken
    fn next_archive_path(&self, stamp: &str) -> PathBuf {
        let name = Path::new(&self.file_name);
        let stem = name
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("selections");
        let ext = name.extension().and_then(|s| s.to_str()).unwrap_or("csv");

        let mut candidate = self.output_dir.join(format!("{}_{}.{}", stem, stamp, ext));
        let mut n = 1;
        while candidate.exists() {
            candidate = self
                .output_dir
                .join(format!("{}_{}_{}.{}", stem, stamp, n, ext));
            n += 1;
        }
        candidate
    }

    fn ensure_header(&self) -> Result<()> {
        let path = self.path();
        let empty = match fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(Error::WriteError(describe(&path, e))),
        };
        if empty {
            write_header_only(&path).map_err(Error::WriteError)?;
        }
        Ok(())
    }
}

fn write_header_only(path: &Path) -> std::result::Result<(), String> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| describe(path, e))?;
    writer.write_record(HEADER).map_err(|e| describe(path, e))?;
    writer.flush().map_err(|e| describe(path, e))
}

fn describe(path: &Path, err: impl std::fmt::Display) -> String {
    format!("{}: {}", path.display(), err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(a: &str, b: &str, chosen: &str) -> SelectionRecord {
        SelectionRecord::new(&Pair::new(a, b).unwrap(), chosen).unwrap()
    }

    fn data_rows(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .skip(1)
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_open_writes_header() {
        let dir = TempDir::new().unwrap();
        let log = SelectionLog::open(dir.path().join("out"), "selections.csv").unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.trim_end(), "timestamp,image_a,image_b,chosen");
    }

    #[test]
    fn test_open_keeps_existing_rows() {
        let dir = TempDir::new().unwrap();
        let log = SelectionLog::open(dir.path(), "selections.csv").unwrap();
        log.append(&record("a.tif", "b.tif", "a.tif")).unwrap();

        let reopened = SelectionLog::open(dir.path(), "selections.csv").unwrap();
        assert_eq!(reopened.records().unwrap().len(), 1);
    }

    #[test]
    fn test_open_repairs_empty_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("selections.csv"), "").unwrap();

        let log = SelectionLog::open(dir.path(), "selections.csv").unwrap();
        assert!(fs::read_to_string(log.path())
            .unwrap()
            .starts_with("timestamp,"));
    }

    #[test]
    fn test_record_rejects_outsider() {
        let pair = Pair::new("a", "b").unwrap();
        assert!(matches!(
            SelectionRecord::new(&pair, "c"),
            Err(Error::InvalidSelection(_))
        ));
    }

    #[test]
    fn test_appends_keep_submission_order() {
        let dir = TempDir::new().unwrap();
        let log = SelectionLog::open(dir.path(), "selections.csv").unwrap();

        let submitted = vec![
            record("a.tif", "b.tif", "b.tif"),
            record("c.tif", "a.tif", "c.tif"),
            record("b.tif", "c.tif", "b.tif"),
            record("a.tif", "b.tif", "a.tif"),
        ];
        for r in &submitted {
            log.append(r).unwrap();
        }

        assert_eq!(data_rows(&log.path()).len(), submitted.len());
        let read_back = log.records().unwrap();
        assert_eq!(read_back, submitted);
        for r in &read_back {
            assert!(r.chosen == r.image_a || r.chosen == r.image_b);
        }
    }

    #[test]
    fn test_ids_with_commas_round_trip() {
        let dir = TempDir::new().unwrap();
        let log = SelectionLog::open(dir.path(), "selections.csv").unwrap();
        let r = record("scan, left.tif", "scan \"b\".tif", "scan, left.tif");
        log.append(&r).unwrap();

        assert_eq!(log.records().unwrap(), vec![r]);
    }

    #[test]
    fn test_archive_moves_rows_and_resets() {
        let dir = TempDir::new().unwrap();
        let log = SelectionLog::open(dir.path(), "selections.csv").unwrap();
        log.append(&record("a.tif", "b.tif", "a.tif")).unwrap();
        log.append(&record("a.tif", "c.tif", "c.tif")).unwrap();
        let before = data_rows(&log.path());

        let archive = log.archive_and_reset().unwrap();

        assert_eq!(data_rows(&archive), before);
        assert!(data_rows(&log.path()).is_empty());
        assert!(log.records().unwrap().is_empty());

        let name = archive.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("selections_"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn test_archives_in_same_second_stay_distinct() {
        let dir = TempDir::new().unwrap();
        let log = SelectionLog::open(dir.path(), "selections.csv").unwrap();

        let first = log.next_archive_path("2025_03_25_142233");
        fs::write(&first, "x").unwrap();
        let second = log.next_archive_path("2025_03_25_142233");
        fs::write(&second, "x").unwrap();
        let third = log.next_archive_path("2025_03_25_142233");

        assert_eq!(
            first.file_name().unwrap(),
            "selections_2025_03_25_142233.csv"
        );
        assert_eq!(
            second.file_name().unwrap(),
            "selections_2025_03_25_142233_1.csv"
        );
        assert_eq!(
            third.file_name().unwrap(),
            "selections_2025_03_25_142233_2.csv"
        );
    }

    #[test]
    fn test_archive_without_current_log_fails() {
        let dir = TempDir::new().unwrap();
        let log = SelectionLog::open(dir.path(), "selections.csv").unwrap();
        fs::remove_file(log.path()).unwrap();

        assert!(matches!(
            log.archive_and_reset(),
            Err(Error::ArchiveError(_))
        ));
        // No archive file was produced
        let archives = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(archives, 0);
    }
}
