//! Flat row records, one struct per table
//!
//! Every pass-through column is an `Option<String>`: `None` is written as SQL
//! NULL and anything else is handed to Postgres as text for the typed column
//! to interpret.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of records the importer writes, one per data table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    Pitches,
    Hits,
    Players,
    GameStats,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] =
        [RecordKind::Pitches, RecordKind::Players, RecordKind::Hits, RecordKind::GameStats];

    pub fn table_name(self) -> &'static str {
        match self {
            RecordKind::Pitches => "pitches",
            RecordKind::Hits => "hits",
            RecordKind::Players => "players",
            RecordKind::GameStats => "game_stats",
        }
    }

    /// Name used on the command line and in the import ledger
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Pitches => "pitches",
            RecordKind::Hits => "hits",
            RecordKind::Players => "players",
            RecordKind::GameStats => "game-stats",
        }
    }

    /// Whether a game's records of this kind depend on which team is tracked.
    ///
    /// Pitches and hits are the same whichever side imports the game. Players
    /// and game stats are written per tracked team.
    pub fn is_team_scoped(self) -> bool {
        matches!(self, RecordKind::Players | RecordKind::GameStats)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pitches" => Ok(RecordKind::Pitches),
            "hits" => Ok(RecordKind::Hits),
            "players" => Ok(RecordKind::Players),
            "game-stats" | "game_stats" => Ok(RecordKind::GameStats),
            other => Err(format!("unknown record kind: {other}")),
        }
    }
}

/// Half of an inning: the away team bats in the top, the home team in the bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    pub fn as_str(self) -> &'static str {
        match self {
            Half::Top => "top",
            Half::Bottom => "bottom",
        }
    }
}

/// One row of `pitches`: a pitch together with its at-bat's context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchRecord {
    pub game_id: String,
    pub year: i32,
    pub inning: Option<String>,
    pub half: Half,

    // At-bat context
    pub at_bat_num: Option<String>,
    pub at_bat_b: Option<String>,
    pub at_bat_s: Option<String>,
    pub at_bat_o: Option<String>,
    pub at_bat_start_tfs: Option<String>,
    pub batter: Option<String>,
    pub stand: Option<String>,
    pub b_height: Option<String>,
    pub pitcher: Option<String>,
    pub p_throws: Option<String>,
    pub at_bat_des: Option<String>,
    pub at_bat_event: Option<String>,

    // Pitch
    pub pitch_des: Option<String>,
    pub pitch_id: Option<String>,
    pub pitch_type: Option<String>,
    pub pitch_pitch_type: Option<String>,
    pub type_confidence: Option<String>,
    pub pitch_tfs: Option<String>,
    pub pitch_x: Option<String>,
    pub pitch_y: Option<String>,
    pub pitch_sv_id: Option<String>,
    pub pitch_start_speed: Option<String>,
    pub pitch_end_speed: Option<String>,
    pub sz_top: Option<String>,
    pub sz_bottom: Option<String>,
    pub pfx_x: Option<String>,
    pub pfx_z: Option<String>,
    pub px: Option<String>,
    pub pz: Option<String>,
    pub x0: Option<String>,
    pub y0: Option<String>,
    pub z0: Option<String>,
    pub vx0: Option<String>,
    pub vy0: Option<String>,
    pub vz0: Option<String>,
    pub ax: Option<String>,
    pub ay: Option<String>,
    pub az: Option<String>,
    pub break_y: Option<String>,
    pub break_angle: Option<String>,
    pub break_length: Option<String>,
    pub zone: Option<String>,
    pub spin_dir: Option<String>,
    pub spin_rate: Option<String>,
    pub nasty: Option<String>,
}

/// One row of `hits`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    pub game_id: String,
    pub year: i32,
    pub des: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
    pub batter: Option<String>,
    pub pitcher: Option<String>,
    pub hit_type: Option<String>,
    pub team: Option<String>,
    pub inning: Option<String>,
}

/// One row of `players`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub year: i32,
    pub id: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
    pub num: Option<String>,
    pub boxname: Option<String>,
    pub rl: Option<String>,
    pub bats: Option<String>,
    pub position: Option<String>,
    pub current_position: Option<String>,
    pub status: Option<String>,
    pub team_abbrev: Option<String>,
    pub team_id: Option<String>,
    pub parent_team_abbrev: Option<String>,
    pub parent_team_id: Option<String>,
    pub bat_order: Option<String>,
    pub game_position: Option<String>,
    pub avg: Option<String>,
    pub hr: Option<String>,
    pub rbi: Option<String>,
    pub wins: Option<String>,
    pub losses: Option<String>,
    pub era: Option<String>,
}

/// One row of `game_stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStatRecord {
    pub game_id: String,
    pub year: i32,
    pub team_code: String,
    pub walk_off_loss: bool,
}

/// Any record the importer can write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Record {
    Pitch(Box<PitchRecord>),
    Hit(HitRecord),
    Player(PlayerRecord),
    GameStat(GameStatRecord),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Pitch(_) => RecordKind::Pitches,
            Record::Hit(_) => RecordKind::Hits,
            Record::Player(_) => RecordKind::Players,
            Record::GameStat(_) => RecordKind::GameStats,
        }
    }

    /// Columns of the table's unique index, or `None` when any of them is
    /// NULL (a NULL never conflicts in a Postgres unique index).
    ///
    /// Parts stored in numeric columns are canonicalised, so `"101.30"` and
    /// `"101.3"` produce the same key just as they collide in the table.
    pub fn unique_key(&self) -> Option<Vec<String>> {
        let numeric = |value: &Option<String>| value.as_deref().map(canonical_number);

        let parts: Vec<Option<String>> = match self {
            Record::Pitch(p) => vec![Some(p.game_id.clone()), numeric(&p.pitch_id)],
            Record::Hit(h) => vec![
                Some(h.game_id.clone()),
                numeric(&h.x),
                numeric(&h.y),
                numeric(&h.batter),
                numeric(&h.inning),
            ],
            Record::Player(p) => {
                vec![Some(p.year.to_string()), numeric(&p.id), p.team_abbrev.clone()]
            }
            Record::GameStat(g) => vec![Some(g.game_id.clone()), Some(g.team_code.clone())],
        };

        parts.into_iter().collect()
    }
}

/// Canonical text of a value bound for an `int` or `DECIMAL` column.
///
/// Leading integer zeros and trailing fraction zeros are dropped and `-0`
/// becomes `0`. Text that is not a plain decimal is returned trimmed.
fn canonical_number(value: &str) -> String {
    let trimmed = value.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let is_decimal = !(int_part.is_empty() && frac_part.is_empty())
        && int_part.bytes().all(|b| b.is_ascii_digit())
        && frac_part.bytes().all(|b| b.is_ascii_digit());
    if !is_decimal {
        return trimmed.to_string();
    }

    let int_part = int_part.trim_start_matches('0');
    let frac_part = frac_part.trim_end_matches('0');
    let is_zero = int_part.is_empty() && frac_part.is_empty();

    let mut canonical = String::with_capacity(unsigned.len() + 1);
    if negative && !is_zero {
        canonical.push('-');
    }
    canonical.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        canonical.push('.');
        canonical.push_str(frac_part);
    }
    canonical
}

impl From<PitchRecord> for Record {
    fn from(record: PitchRecord) -> Self {
        Record::Pitch(Box::new(record))
    }
}

impl From<HitRecord> for Record {
    fn from(record: HitRecord) -> Self {
        Record::Hit(record)
    }
}

impl From<PlayerRecord> for Record {
    fn from(record: PlayerRecord) -> Self {
        Record::Player(record)
    }
}

impl From<GameStatRecord> for Record {
    fn from(record: GameStatRecord) -> Self {
        Record::GameStat(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(x: Option<&str>) -> HitRecord {
        HitRecord {
            game_id: "g1".to_string(),
            year: 2015,
            des: Some("Single".to_string()),
            x: x.map(str::to_string),
            y: Some("150.2".to_string()),
            batter: Some("405395".to_string()),
            pitcher: Some("543101".to_string()),
            hit_type: Some("H".to_string()),
            team: Some("A".to_string()),
            inning: Some("3".to_string()),
        }
    }

    #[test]
    fn test_record_kind_round_trips_through_str() {
        for kind in RecordKind::ALL {
            assert_eq!(kind.as_str().parse::<RecordKind>().unwrap(), kind);
        }
        assert_eq!("game_stats".parse::<RecordKind>().unwrap(), RecordKind::GameStats);
        assert!("innings".parse::<RecordKind>().is_err());
    }

    #[test]
    fn test_team_scoped_kinds() {
        assert!(!RecordKind::Pitches.is_team_scoped());
        assert!(!RecordKind::Hits.is_team_scoped());
        assert!(RecordKind::Players.is_team_scoped());
        assert!(RecordKind::GameStats.is_team_scoped());
    }

    #[test]
    fn test_unique_key_includes_all_index_columns() {
        let record = Record::from(hit(Some("101.3")));
        assert_eq!(record.kind(), RecordKind::Hits);
        assert_eq!(
            record.unique_key().unwrap(),
            vec!["g1", "101.3", "150.2", "405395", "3"]
        );
    }

    #[test]
    fn test_unique_key_absent_when_column_null() {
        let record = Record::from(hit(None));
        assert!(record.unique_key().is_none());
    }

    #[test]
    fn test_numeric_key_parts_compare_by_value() {
        let a = Record::from(hit(Some("101.30")));
        let b = Record::from(hit(Some("101.3")));
        assert_eq!(a.unique_key(), b.unique_key());

        let c = Record::from(hit(Some("101.31")));
        assert_ne!(a.unique_key(), c.unique_key());
    }

    #[test]
    fn test_text_key_parts_are_not_canonicalised() {
        let stat = |game_id: &str| {
            Record::from(GameStatRecord {
                game_id: game_id.to_string(),
                year: 2015,
                team_code: "sea".to_string(),
                walk_off_loss: false,
            })
        };
        assert_ne!(stat("2015_07").unique_key(), stat("2015_7").unique_key());

        let mut padded = hit(Some("101.30"));
        padded.game_id = "g01".to_string();
        let key = Record::from(padded).unique_key().unwrap();
        assert_eq!(key[0], "g01");
        assert_eq!(key[1], "101.3");
    }

    #[test]
    fn test_canonical_number() {
        assert_eq!(canonical_number("07"), "7");
        assert_eq!(canonical_number("0"), "0");
        assert_eq!(canonical_number("000"), "0");
        assert_eq!(canonical_number("-0.00"), "0");
        assert_eq!(canonical_number(".5"), "0.5");
        assert_eq!(canonical_number("+12.50"), "12.5");
        assert_eq!(canonical_number("-6.240"), "-6.24");
        assert_eq!(canonical_number("3."), "3");
        assert_eq!(canonical_number(" 42 "), "42");
        assert_eq!(canonical_number("1e3"), "1e3");
        assert_eq!(canonical_number("."), ".");
    }
}
