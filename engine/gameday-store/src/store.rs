//! The storage contract the importer writes through

use crate::error::Result;
use crate::records::{Record, RecordKind};

/// A relational store for imported records.
///
/// Implementations must tolerate concurrent callers: every import job shares
/// the same store.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Whether records of `kind` were already imported for `game_id`.
    ///
    /// `team_code` only narrows the lookup for team-scoped kinds
    /// (see [`RecordKind::is_team_scoped`]).
    async fn exists(&self, kind: RecordKind, game_id: &str, team_code: &str) -> Result<bool>;

    /// Insert one record.
    ///
    /// A unique index conflict is reported as
    /// [`StoreError::DuplicateKey`](crate::StoreError::DuplicateKey) so callers
    /// can tell it apart from real failures.
    async fn insert(&self, record: &Record) -> Result<()>;

    /// Record that every record of `kind` for `game_id` has been handled, so
    /// later runs skip the game.
    async fn mark_imported(&self, kind: RecordKind, game_id: &str, team_code: &str) -> Result<()>;
}

/// Team code stored in the ledger for a given kind.
///
/// Game-scoped kinds store an empty team so one marker covers both sides.
pub fn ledger_team_code(kind: RecordKind, team_code: &str) -> &str {
    if kind.is_team_scoped() {
        team_code
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_team_code() {
        assert_eq!(ledger_team_code(RecordKind::Pitches, "sea"), "");
        assert_eq!(ledger_team_code(RecordKind::Hits, "sea"), "");
        assert_eq!(ledger_team_code(RecordKind::Players, "sea"), "sea");
        assert_eq!(ledger_team_code(RecordKind::GameStats, "sea"), "sea");
    }
}
