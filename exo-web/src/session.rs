//! Comparison session
//!
//! Owns the seen-pair set and the selection log. The web layer keeps one
//! session behind a single mutex, so picking, recording and archiving never
//! interleave.

use crate::error::{Error, Result};
use crate::images::ImageStore;
use crate::pairs::{self, Pair, PickOutcome, SeenPairs};
use crate::selections::{SelectionLog, SelectionRecord};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Pair to show, plus the archive written if the previous round just ended
#[derive(Debug, Clone)]
pub struct Presentation {
    pub pair: Pair,
    pub archived: Option<PathBuf>,
}

/// Outcome of recording a decision
#[derive(Debug, Clone)]
pub enum Decision {
    /// Pairs remain; this is the next one to show
    Next(Pair),
    /// Every pair has been judged; the log was archived and reset
    Done { archived: PathBuf },
}

/// Progress snapshot for the status endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub images: usize,
    pub total_pairs: usize,
    pub seen_pairs: usize,
    pub remaining_pairs: usize,
    pub recorded_decisions: usize,
    pub log_file: String,
}

#[derive(Debug)]
pub struct Session {
    seen: SeenPairs,
    log: SelectionLog,
}

impl Session {
    pub fn new(log: SelectionLog) -> Self {
        Self {
            seen: SeenPairs::new(),
            log,
        }
    }

    pub fn seen(&self) -> &SeenPairs {
        &self.seen
    }

    pub fn log(&self) -> &SelectionLog {
        &self.log
    }

    /// Seed the seen set from decisions already in the current log
    ///
    /// Returns the number of distinct pairs restored.
    pub fn resume_from_log(&mut self) -> Result<usize> {
        let mut restored = 0;
        for record in self.log.records()? {
            if self.seen.mark_seen(record.pair()?) {
                restored += 1;
            }
        }
        info!("Restored {} seen pairs from {}", restored, self.log.file_name());
        Ok(restored)
    }

    /// Pick the next pair to show
    ///
    /// If every pair was already shown, the log is archived and the round
    /// restarts before picking again.
    pub fn present(&mut self, store: &ImageStore) -> Result<Presentation> {
        let ids = asset_ids(store)?;

        if let PickOutcome::Pair(pair) = pairs::next_pair(&ids, &self.seen)? {
            return Ok(Presentation {
                pair,
                archived: None,
            });
        }

        let archived = self.archive_and_reset()?;
        match pairs::next_pair(&ids, &self.seen)? {
            PickOutcome::Pair(pair) => Ok(Presentation {
                pair,
                archived: Some(archived),
            }),
            PickOutcome::Exhausted => Err(Error::Internal(
                "no pair available right after reset".to_string(),
            )),
        }
    }

    /// Record a decision on a shown pair
    ///
    /// Nothing is written if `chosen` is not one of the two images, or if
    /// the image directory cannot supply a pair. An `ArchiveError` from here
    /// means the decision itself was logged.
    pub fn record(
        &mut self,
        store: &ImageStore,
        image_a: &str,
        image_b: &str,
        chosen: &str,
    ) -> Result<Decision> {
        let pair = Pair::new(image_a, image_b)?;
        let record = SelectionRecord::new(&pair, chosen)?;

        // Everything that can reject the request runs before the append
        let ids = asset_ids(store)?;
        pairs::ensure_pairable(&ids)?;

        self.log.append(&record)?;
        debug!("Recorded {} over {:?}", chosen, pair);
        self.seen.mark_seen(pair);

        match pairs::next_pair(&ids, &self.seen)? {
            PickOutcome::Pair(next) => Ok(Decision::Next(next)),
            PickOutcome::Exhausted => match self.archive_and_reset() {
                Ok(archived) => Ok(Decision::Done { archived }),
                Err(Error::ArchiveError(reason)) => Err(Error::ArchiveError(format!(
                    "decision recorded, but the finished round could not be archived: {}",
                    reason
                ))),
                Err(e) => Err(e),
            },
        }
    }

    /// Archive the log, then forget the seen pairs
    ///
    /// The seen set is left alone if archiving fails, so exhaustion is
    /// reported again on the next request.
    pub fn archive_and_reset(&mut self) -> Result<PathBuf> {
        let archived = self.log.archive_and_reset()?;
        self.seen.reset();
        info!("All pairs judged, starting a new round");
        Ok(archived)
    }

    pub fn status(&self, store: &ImageStore) -> Result<SessionStatus> {
        let ids = asset_ids(store)?;
        let total = pairs::total_pairs(ids.len());
        let remaining = if ids.len() < 2 {
            0
        } else {
            pairs::remaining(&ids, &self.seen)?
        };

        Ok(SessionStatus {
            images: ids.len(),
            total_pairs: total,
            seen_pairs: total - remaining,
            remaining_pairs: remaining,
            recorded_decisions: self.log.records()?.len(),
            log_file: self.log.file_name().to_string(),
        })
    }
}

fn asset_ids(store: &ImageStore) -> Result<Vec<String>> {
    Ok(store.list_assets()?.into_iter().map(|a| a.id).collect())
}
