//! Deduplication and report sequencing.
//!
//! Decides which parsed records are new, numbers repeated bulletins about
//! the same unfolding event, and returns them oldest first for posting.
//!
//! > The feed lists newest first. A record whose identity was seen in any
//! > earlier cycle is never emitted again.

use crate::models::{BulletinRecord, ProcessedIdentities, ReportLedger};

/// Result of finalizing one cycle's candidates.
#[derive(Debug, Clone, Default)]
pub struct Finalized {
    /// New records, oldest first, with report suffixes applied
    pub emitted: Vec<BulletinRecord>,
    /// Previously processed identities plus every newly emitted one
    pub identities: ProcessedIdentities,
    /// Candidates dropped as already processed
    pub skipped: usize,
}

impl Finalized {
    /// Check if there is anything to hand to the notifier.
    pub fn has_records(&self) -> bool {
        !self.emitted.is_empty()
    }
}

/// Finalize `candidates` (feed order, newest first) against the known identities.
///
/// Records are visited oldest first. Each unseen record of a sequenced kind
/// advances the ledger for its body text and gets "第N報" once N exceeds 1.
/// Every emitted identity is added to the returned set.
pub fn finalize(
    candidates: Vec<BulletinRecord>,
    processed: &ProcessedIdentities,
    ledger: &mut ReportLedger,
) -> Finalized {
    let mut identities = processed.clone();
    let mut emitted = Vec::new();
    let mut skipped = 0;

    for mut record in candidates.into_iter().rev() {
        if identities.contains(&record.identity) {
            log::debug!("Already processed {}", record.identity);
            skipped += 1;
            continue;
        }

        if record.kind.is_sequenced() {
            let number = ledger.record(&record.body);
            if number > 1 {
                record.mark_report_number(number);
            }
        }

        identities.push(record.identity.clone());
        emitted.push(record);
    }

    Finalized {
        emitted,
        identities,
        skipped,
    }
}
