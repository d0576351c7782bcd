use serde::{Deserialize, Serialize};

/// A completed game as published by the gameday feed.
///
/// Leaf values are kept as the feed's raw text. The feed writes `""`, `"-"`
/// or `"-.--"` where nothing was recorded, and those sentinels are only
/// interpreted when a game is flattened into rows.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Game {
    pub id: String,

    /// Season year. Zero when the feed omitted it; see [`Game::year`].
    pub year: i32,

    pub home_code: String,
    pub away_code: String,
    pub home_team_id: String,
    pub away_team_id: String,

    pub linescore: Linescore,
    pub innings: Vec<Inning>,
    pub hit_chart: Vec<Hit>,
    pub roster: Vec<RosterTeam>,
}

/// Final and per-inning run totals for both teams
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Linescore {
    pub home_team_runs: i32,
    pub away_team_runs: i32,
    pub innings: Vec<InningLinescore>,
}

/// Runs scored in each half of one inning.
///
/// `home` is blank (or `"x"`) when the home team did not need to bat.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InningLinescore {
    pub inning: String,
    pub away: String,
    pub home: String,
}

/// One inning of play, at-bats in the order they happened (top half first)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Inning {
    pub num: String,
    pub at_bats: Vec<AtBat>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AtBat {
    pub num: String,
    pub b: String,
    pub s: String,
    /// Outs recorded once this at-bat finished
    pub o: String,
    pub start_tfs: String,
    pub batter: String,
    pub stand: String,
    pub b_height: String,
    pub pitcher: String,
    pub p_throws: String,
    pub des: String,
    pub event: String,
    pub pitches: Vec<Pitch>,
}

/// A single pitch with its PITCHf/x measurements
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Pitch {
    pub des: String,
    pub id: String,

    /// Ball/strike/in-play code (`B`, `S`, `X`)
    #[serde(rename = "type")]
    pub pitch_type: String,

    /// Pitch classification (`FF`, `SL`, `CU`, ...)
    #[serde(rename = "pitch_type")]
    pub pitch_kind: String,

    pub type_confidence: String,
    pub tfs: String,
    pub x: String,
    pub y: String,
    pub sv_id: String,
    pub start_speed: String,
    pub end_speed: String,
    pub sz_top: String,
    pub sz_bot: String,
    pub pfx_x: String,
    pub pfx_z: String,
    pub px: String,
    pub pz: String,
    pub x0: String,
    pub y0: String,
    pub z0: String,
    pub vx0: String,
    pub vy0: String,
    pub vz0: String,
    pub ax: String,
    pub ay: String,
    pub az: String,
    pub break_y: String,
    pub break_angle: String,
    pub break_length: String,
    pub zone: String,
    pub spin_dir: String,
    pub spin_rate: String,
    pub nasty: String,
}

/// A batted-ball event from the hit chart
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Hit {
    pub des: String,
    pub x: String,
    pub y: String,
    pub batter: String,
    pub pitcher: String,
    #[serde(rename = "type")]
    pub hit_type: String,
    pub team: String,
    pub inning: String,
}

/// A team's roster snapshot for one game
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RosterTeam {
    /// `home` or `away`
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub name: String,
    pub players: Vec<Player>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Player {
    pub id: String,
    pub first: String,
    pub last: String,
    pub num: String,
    pub boxname: String,
    pub rl: String,
    pub bats: String,
    pub position: String,
    pub current_position: String,
    pub status: String,
    pub team_abbrev: String,
    pub team_id: String,
    pub parent_team_abbrev: String,
    pub parent_team_id: String,
    pub bat_order: String,
    pub game_position: String,
    pub avg: String,
    pub hr: String,
    pub rbi: String,
    pub wins: String,
    pub losses: String,
    pub era: String,
}

impl Game {
    /// Season year of the game.
    ///
    /// Falls back to the year encoded in gameday ids such as
    /// `gid_2015_05_06_seamlb_oakmlb_1` or `2015/05/06/seamlb-oakmlb-1`.
    pub fn year(&self) -> i32 {
        if self.year != 0 {
            return self.year;
        }

        let id = self.id.strip_prefix("gid_").unwrap_or(&self.id);
        id.get(..4)
            .and_then(|digits| digits.parse().ok())
            .unwrap_or_default()
    }

    pub fn is_home(&self, team_code: &str) -> bool {
        self.home_code == team_code
    }

    /// Feed team id for `team_code` in this game.
    ///
    /// Any code that is not the home team's resolves to the away team.
    pub fn team_id_for(&self, team_code: &str) -> &str {
        if self.is_home(team_code) {
            &self.home_team_id
        } else {
            &self.away_team_id
        }
    }

    /// Total number of pitches across every inning
    pub fn pitch_count(&self) -> usize {
        self.innings
            .iter()
            .flat_map(|inning| &inning.at_bats)
            .map(|at_bat| at_bat.pitches.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_prefers_explicit_value() {
        let game = Game {
            id: "gid_2015_05_06_seamlb_oakmlb_1".into(),
            year: 2014,
            ..Default::default()
        };
        assert_eq!(game.year(), 2014);
    }

    #[test]
    fn test_year_derived_from_gid() {
        let game = Game { id: "gid_2015_05_06_seamlb_oakmlb_1".into(), ..Default::default() };
        assert_eq!(game.year(), 2015);

        let game = Game { id: "2013/07/21/seamlb-houmlb-1".into(), ..Default::default() };
        assert_eq!(game.year(), 2013);
    }

    #[test]
    fn test_year_unknown_id() {
        let game = Game { id: "abc".into(), ..Default::default() };
        assert_eq!(game.year(), 0);
    }

    #[test]
    fn test_team_id_for() {
        let game = Game {
            home_code: "sea".into(),
            away_code: "oak".into(),
            home_team_id: "136".into(),
            away_team_id: "133".into(),
            ..Default::default()
        };

        assert!(game.is_home("sea"));
        assert!(!game.is_home("oak"));
        assert_eq!(game.team_id_for("sea"), "136");
        assert_eq!(game.team_id_for("oak"), "133");
    }

    #[test]
    fn test_type_fields_renamed() {
        let pitch: Pitch =
            serde_json::from_str(r#"{"id": "3", "type": "S", "pitch_type": "FF"}"#).unwrap();
        assert_eq!(pitch.pitch_type, "S");
        assert_eq!(pitch.pitch_kind, "FF");
        assert_eq!(pitch.nasty, "");
    }
}
