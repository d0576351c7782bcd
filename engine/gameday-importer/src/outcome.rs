//! Who won a game, and whether the tracked team's loss was a walk-off

use crate::error::MalformedField;
use gameday_feed::Game;
use serde::Serialize;
use tracing::debug;

/// Outcome of one game from the point of view of a tracked team.
///
/// Only [`resolve`] builds these, so `walk_off_loss` implies `!won`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameOutcome {
    tracked_team_code: String,
    won: bool,
    walk_off_loss: bool,
}

impl GameOutcome {
    pub fn tracked_team_code(&self) -> &str {
        &self.tracked_team_code
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn walk_off_loss(&self) -> bool {
        self.walk_off_loss
    }
}

/// Resolve the outcome of `game` for `tracked_team_code`
pub fn resolve(tracked_team_code: &str, game: &Game) -> GameOutcome {
    let won = tracked_team_won(tracked_team_code, game);
    let walk_off_loss = !won && game.is_home(tracked_team_code) && home_scored_in_last_inning(game);

    GameOutcome { tracked_team_code: tracked_team_code.to_string(), won, walk_off_loss }
}

/// The tracked team won when its final run total is strictly higher.
///
/// A tie is not a valid final state; neither side is credited with a win.
fn tracked_team_won(tracked_team_code: &str, game: &Game) -> bool {
    let linescore = &game.linescore;
    let (tracked_runs, opponent_runs) = if game.is_home(tracked_team_code) {
        (linescore.home_team_runs, linescore.away_team_runs)
    } else {
        (linescore.away_team_runs, linescore.home_team_runs)
    };

    tracked_runs > opponent_runs
}

/// Whether the home team scored in the bottom half of the last recorded inning.
///
/// A blank or non-numeric entry means the home team did not bat.
fn home_scored_in_last_inning(game: &Game) -> bool {
    let Some(last) = game.linescore.innings.last() else {
        return false;
    };

    match parse_runs("home", &last.home) {
        Ok(runs) => runs > 0,
        Err(err) => {
            debug!(game_id = %game.id, inning = %last.inning, "{err}; home team did not bat");
            false
        }
    }
}

/// Parse a run count from the linescore
pub fn parse_runs(field: &'static str, value: &str) -> Result<i32, MalformedField> {
    value.trim().parse().map_err(|_| MalformedField::new(field, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gameday_feed::{InningLinescore, Linescore};

    fn inning(num: usize, away: &str, home: &str) -> InningLinescore {
        InningLinescore { inning: num.to_string(), away: away.to_string(), home: home.to_string() }
    }

    /// A game between `sea` (away) and `oak` (home)
    fn game(away_runs: i32, home_runs: i32, innings: Vec<InningLinescore>) -> Game {
        Game {
            id: "gid_2015_05_06_seamlb_oakmlb_1".to_string(),
            year: 2015,
            home_code: "oak".to_string(),
            away_code: "sea".to_string(),
            home_team_id: "133".to_string(),
            away_team_id: "136".to_string(),
            linescore: Linescore {
                home_team_runs: home_runs,
                away_team_runs: away_runs,
                innings,
            },
            ..Default::default()
        }
    }

    fn nine_innings(last_home: &str) -> Vec<InningLinescore> {
        let mut innings: Vec<_> = (1..=8).map(|n| inning(n, "0", "0")).collect();
        innings.push(inning(9, "0", last_home));
        innings
    }

    #[test]
    fn test_home_win() {
        let game = game(3, 5, nine_innings(""));

        let home = resolve("oak", &game);
        assert!(home.won());
        assert!(!home.walk_off_loss());
        assert_eq!(home.tracked_team_code(), "oak");

        let away = resolve("sea", &game);
        assert!(!away.won());
        assert!(!away.walk_off_loss());
    }

    #[test]
    fn test_away_win() {
        let game = game(6, 2, nine_innings("0"));
        assert!(resolve("sea", &game).won());
        assert!(!resolve("oak", &game).won());
    }

    #[test]
    fn test_winner_is_never_walk_off_loser() {
        // Home team won in the bottom of the ninth
        let game = game(3, 4, nine_innings("2"));
        let outcome = resolve("oak", &game);
        assert!(outcome.won());
        assert!(!outcome.walk_off_loss());
    }

    #[test]
    fn test_away_loss_is_never_walk_off() {
        let game = game(3, 4, nine_innings("2"));
        let outcome = resolve("sea", &game);
        assert!(!outcome.won());
        assert!(!outcome.walk_off_loss());
    }

    #[test]
    fn test_home_loss_scoring_in_last_inning_is_walk_off() {
        // Trailing 7-2 into the bottom of the ninth, scored one and still lost
        let game = game(7, 3, nine_innings("1"));
        let outcome = resolve("oak", &game);
        assert!(!outcome.won());
        assert!(outcome.walk_off_loss());
    }

    #[test]
    fn test_home_loss_scoreless_last_inning() {
        let game = game(7, 2, nine_innings("0"));
        assert!(!resolve("oak", &game).walk_off_loss());
    }

    #[test]
    fn test_home_loss_did_not_bat() {
        for not_batted in ["", "x", "X", "-"] {
            let game = game(7, 2, nine_innings(not_batted));
            let outcome = resolve("oak", &game);
            assert!(!outcome.won());
            assert!(!outcome.walk_off_loss(), "{not_batted:?} should read as did not bat");
        }
    }

    #[test]
    fn test_uses_last_recorded_inning() {
        // Extra innings: only the 11th counts
        let mut innings = nine_innings("3");
        innings.push(inning(10, "0", "0"));
        innings.push(inning(11, "2", "0"));
        let game = game(9, 7, innings);
        assert!(!resolve("oak", &game).walk_off_loss());
    }

    #[test]
    fn test_no_innings_is_not_walk_off() {
        let game = game(4, 1, Vec::new());
        let outcome = resolve("oak", &game);
        assert!(!outcome.won());
        assert!(!outcome.walk_off_loss());
    }

    #[test]
    fn test_tie_is_not_a_win_for_either_side() {
        let game = game(2, 2, nine_innings("0"));
        assert!(!resolve("oak", &game).won());
        assert!(!resolve("sea", &game).won());
    }

    #[test]
    fn test_parse_runs() {
        assert_eq!(parse_runs("home", "3").unwrap(), 3);
        assert_eq!(parse_runs("home", " 0 ").unwrap(), 0);

        let err = parse_runs("home", "x").unwrap_err();
        assert_eq!(err.field, "home");
        assert_eq!(err.value, "x");
    }

    #[test]
    fn test_walk_off_implies_loss() {
        for (away, home, last) in [(7, 3, "1"), (3, 4, "2"), (2, 2, "1"), (1, 0, "")] {
            let game = game(away, home, nine_innings(last));
            for team in ["oak", "sea"] {
                let outcome = resolve(team, &game);
                assert!(!(outcome.walk_off_loss() && outcome.won()));
            }
        }
    }
}
