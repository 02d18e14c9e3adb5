pub mod entry;
pub mod ledger;

pub use entry::{EntryKind, HistoryEntry, Selection};
pub use ledger::{baseline_entry, AppendParams, HistoryLedger, BASELINE_LABEL};

/// Current UTC time as RFC3339. Falls back to an empty string if formatting fails.
pub fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}
