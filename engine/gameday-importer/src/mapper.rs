//! Flattening nested games into table rows
//!
//! This is the boundary where the feed's "nothing recorded" sentinels become
//! explicit absences. Every pass-through value goes through [`nullable`].

use crate::outcome::GameOutcome;
use gameday_feed::{AtBat, Game, Hit, Pitch, Player};
use gameday_store::{
    GameStatRecord, Half, HitRecord, PitchRecord, PlayerRecord, Record, RecordKind,
};

/// Values the feed uses to mean "no value recorded"
const NULL_SENTINELS: [&str; 3] = ["", "-", "-.--"];

/// Map a raw feed value to `None` when it is a "no value" sentinel
pub fn nullable(value: &str) -> Option<String> {
    renormalize(Some(value)).map(str::to_string)
}

/// Apply the sentinel rule to a value that may already be absent.
///
/// `None` stays `None`, so applying the rule twice changes nothing.
pub fn renormalize(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !NULL_SENTINELS.contains(v))
}

/// Whether an at-bat's out count marks the third out
fn is_third_out(at_bat: &AtBat) -> bool {
    at_bat.o.trim() == "3"
}

/// One row per pitch, in inning / at-bat / pitch order.
///
/// Each inning starts in the top half. The half flips to bottom at the at-bat
/// whose out count reads 3, before that at-bat's own pitches are emitted, so
/// the pitches of the at-bat making the third out are labelled bottom.
pub fn pitch_records(game: &Game) -> Vec<PitchRecord> {
    let year = game.year();
    let mut records = Vec::with_capacity(game.pitch_count());

    for inning in &game.innings {
        let mut half = Half::Top;
        for at_bat in &inning.at_bats {
            if is_third_out(at_bat) {
                half = Half::Bottom;
            }

            for pitch in &at_bat.pitches {
                records.push(pitch_record(&game.id, year, &inning.num, half, at_bat, pitch));
            }
        }
    }

    records
}

fn pitch_record(
    game_id: &str,
    year: i32,
    inning: &str,
    half: Half,
    at_bat: &AtBat,
    pitch: &Pitch,
) -> PitchRecord {
    PitchRecord {
        game_id: game_id.to_string(),
        year,
        inning: nullable(inning),
        half,
        at_bat_num: nullable(&at_bat.num),
        at_bat_b: nullable(&at_bat.b),
        at_bat_s: nullable(&at_bat.s),
        at_bat_o: nullable(&at_bat.o),
        at_bat_start_tfs: nullable(&at_bat.start_tfs),
        batter: nullable(&at_bat.batter),
        stand: nullable(&at_bat.stand),
        b_height: nullable(&at_bat.b_height),
        pitcher: nullable(&at_bat.pitcher),
        p_throws: nullable(&at_bat.p_throws),
        at_bat_des: nullable(&at_bat.des),
        at_bat_event: nullable(&at_bat.event),
        pitch_des: nullable(&pitch.des),
        pitch_id: nullable(&pitch.id),
        pitch_type: nullable(&pitch.pitch_type),
        pitch_pitch_type: nullable(&pitch.pitch_kind),
        type_confidence: nullable(&pitch.type_confidence),
        pitch_tfs: nullable(&pitch.tfs),
        pitch_x: nullable(&pitch.x),
        pitch_y: nullable(&pitch.y),
        pitch_sv_id: nullable(&pitch.sv_id),
        pitch_start_speed: nullable(&pitch.start_speed),
        pitch_end_speed: nullable(&pitch.end_speed),
        sz_top: nullable(&pitch.sz_top),
        sz_bottom: nullable(&pitch.sz_bot),
        pfx_x: nullable(&pitch.pfx_x),
        pfx_z: nullable(&pitch.pfx_z),
        px: nullable(&pitch.px),
        pz: nullable(&pitch.pz),
        x0: nullable(&pitch.x0),
        y0: nullable(&pitch.y0),
        z0: nullable(&pitch.z0),
        vx0: nullable(&pitch.vx0),
        vy0: nullable(&pitch.vy0),
        vz0: nullable(&pitch.vz0),
        ax: nullable(&pitch.ax),
        ay: nullable(&pitch.ay),
        az: nullable(&pitch.az),
        break_y: nullable(&pitch.break_y),
        break_angle: nullable(&pitch.break_angle),
        break_length: nullable(&pitch.break_length),
        zone: nullable(&pitch.zone),
        spin_dir: nullable(&pitch.spin_dir),
        spin_rate: nullable(&pitch.spin_rate),
        nasty: nullable(&pitch.nasty),
    }
}

/// One row per hit-chart entry
pub fn hit_records(game: &Game) -> Vec<HitRecord> {
    let year = game.year();
    game.hit_chart.iter().map(|hit| hit_record(&game.id, year, hit)).collect()
}

fn hit_record(game_id: &str, year: i32, hit: &Hit) -> HitRecord {
    HitRecord {
        game_id: game_id.to_string(),
        year,
        des: nullable(&hit.des),
        x: nullable(&hit.x),
        y: nullable(&hit.y),
        batter: nullable(&hit.batter),
        pitcher: nullable(&hit.pitcher),
        hit_type: nullable(&hit.hit_type),
        team: nullable(&hit.team),
        inning: nullable(&hit.inning),
    }
}

/// Roster rows for the tracked team only.
///
/// Players are matched on the feed team id the tracked team has in this game;
/// every other team's roster is discarded.
pub fn player_records(tracked_team_code: &str, game: &Game) -> Vec<PlayerRecord> {
    let year = game.year();
    let team_id = game.team_id_for(tracked_team_code);

    game.roster
        .iter()
        .flat_map(|team| &team.players)
        .filter(|player| player.team_id == team_id)
        .map(|player| player_record(year, player))
        .collect()
}

fn player_record(year: i32, player: &Player) -> PlayerRecord {
    PlayerRecord {
        year,
        id: nullable(&player.id),
        first: nullable(&player.first),
        last: nullable(&player.last),
        num: nullable(&player.num),
        boxname: nullable(&player.boxname),
        rl: nullable(&player.rl),
        bats: nullable(&player.bats),
        position: nullable(&player.position),
        current_position: nullable(&player.current_position),
        status: nullable(&player.status),
        team_abbrev: nullable(&player.team_abbrev),
        team_id: nullable(&player.team_id),
        parent_team_abbrev: nullable(&player.parent_team_abbrev),
        parent_team_id: nullable(&player.parent_team_id),
        bat_order: nullable(&player.bat_order),
        game_position: nullable(&player.game_position),
        avg: nullable(&player.avg),
        hr: nullable(&player.hr),
        rbi: nullable(&player.rbi),
        wins: nullable(&player.wins),
        losses: nullable(&player.losses),
        era: nullable(&player.era),
    }
}

pub fn game_stat_record(game: &Game, outcome: &GameOutcome) -> GameStatRecord {
    GameStatRecord {
        game_id: game.id.clone(),
        year: game.year(),
        team_code: outcome.tracked_team_code().to_string(),
        walk_off_loss: outcome.walk_off_loss(),
    }
}

/// Every record of `kind` for one game, from `tracked_team_code`'s side
pub fn records_for(kind: RecordKind, tracked_team_code: &str, game: &Game) -> Vec<Record> {
    match kind {
        RecordKind::Pitches => pitch_records(game).into_iter().map(Record::from).collect(),
        RecordKind::Hits => hit_records(game).into_iter().map(Record::from).collect(),
        RecordKind::Players => {
            player_records(tracked_team_code, game).into_iter().map(Record::from).collect()
        }
        RecordKind::GameStats => {
            let outcome = crate::outcome::resolve(tracked_team_code, game);
            vec![Record::from(game_stat_record(game, &outcome))]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gameday_feed::{Inning, Linescore, RosterTeam};

    fn at_bat(num: &str, outs: &str, pitch_ids: &[&str]) -> AtBat {
        AtBat {
            num: num.to_string(),
            o: outs.to_string(),
            batter: "405395".to_string(),
            pitcher: "543101".to_string(),
            start_tfs: "".to_string(),
            pitches: pitch_ids
                .iter()
                .map(|id| Pitch {
                    id: id.to_string(),
                    pitch_type: "S".to_string(),
                    start_speed: "93.4".to_string(),
                    spin_rate: "-.--".to_string(),
                    spin_dir: "-".to_string(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn player(id: &str, team_id: &str, abbrev: &str) -> Player {
        Player {
            id: id.to_string(),
            team_id: team_id.to_string(),
            team_abbrev: abbrev.to_string(),
            era: "-.--".to_string(),
            wins: "".to_string(),
            avg: ".258".to_string(),
            ..Default::default()
        }
    }

    fn game() -> Game {
        Game {
            id: "gid_2015_05_06_seamlb_oakmlb_1".to_string(),
            year: 2015,
            home_code: "oak".to_string(),
            away_code: "sea".to_string(),
            home_team_id: "133".to_string(),
            away_team_id: "136".to_string(),
            linescore: Linescore { home_team_runs: 2, away_team_runs: 5, innings: Vec::new() },
            innings: vec![
                Inning {
                    num: "1".to_string(),
                    at_bats: vec![
                        at_bat("1", "1", &["1", "2"]),
                        at_bat("2", "2", &["3"]),
                        at_bat("3", "3", &["4", "5"]),
                        at_bat("4", "1", &["6"]),
                        at_bat("5", "3", &["7"]),
                    ],
                },
                Inning { num: "2".to_string(), at_bats: vec![at_bat("6", "1", &["8", "9"])] },
            ],
            hit_chart: vec![Hit {
                des: "Single".to_string(),
                x: "101.3".to_string(),
                y: "150.2".to_string(),
                batter: "405395".to_string(),
                pitcher: "-".to_string(),
                hit_type: "H".to_string(),
                team: "A".to_string(),
                inning: "1".to_string(),
            }],
            roster: vec![
                RosterTeam {
                    kind: "away".to_string(),
                    id: "136".to_string(),
                    name: "Seattle Mariners".to_string(),
                    players: vec![player("1", "136", "SEA"), player("2", "136", "SEA")],
                },
                RosterTeam {
                    kind: "home".to_string(),
                    id: "133".to_string(),
                    name: "Oakland Athletics".to_string(),
                    players: vec![player("3", "133", "OAK")],
                },
            ],
        }
    }

    #[test]
    fn test_nullable_sentinels() {
        assert_eq!(nullable(""), None);
        assert_eq!(nullable("-"), None);
        assert_eq!(nullable("-.--"), None);
        assert_eq!(nullable("0"), Some("0".to_string()));
        assert_eq!(nullable("0.00"), Some("0.00".to_string()));
        assert_eq!(nullable(" "), Some(" ".to_string()));
        assert_eq!(nullable("--"), Some("--".to_string()));
    }

    #[test]
    fn test_renormalize_is_idempotent() {
        for value in [None, Some(""), Some("-"), Some("-.--"), Some("93.4"), Some("x")] {
            let once = renormalize(value);
            assert_eq!(renormalize(once), once);
        }
        assert_eq!(renormalize(None), None);
    }

    #[test]
    fn test_pitch_records_preserve_order() {
        let records = pitch_records(&game());
        let ids: Vec<&str> = records.iter().map(|r| r.pitch_id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7", "8", "9"]);
    }

    #[test]
    fn test_half_flips_at_third_out_at_bat() {
        let records = pitch_records(&game());
        let halves: Vec<(&str, Half)> = records
            .iter()
            .map(|r| (r.pitch_id.as_deref().unwrap(), r.half))
            .collect();

        assert_eq!(
            halves,
            vec![
                ("1", Half::Top),
                ("2", Half::Top),
                ("3", Half::Top),
                // At-bat 3 made the third out; its own pitches are already bottom
                ("4", Half::Bottom),
                ("5", Half::Bottom),
                ("6", Half::Bottom),
                ("7", Half::Bottom),
                // Each inning starts over in the top
                ("8", Half::Top),
                ("9", Half::Top),
            ]
        );
    }

    #[test]
    fn test_pitch_records_carry_at_bat_context() {
        let records = pitch_records(&game());
        let first = &records[0];

        assert_eq!(first.game_id, "gid_2015_05_06_seamlb_oakmlb_1");
        assert_eq!(first.year, 2015);
        assert_eq!(first.inning.as_deref(), Some("1"));
        assert_eq!(first.at_bat_num.as_deref(), Some("1"));
        assert_eq!(first.batter.as_deref(), Some("405395"));
        assert_eq!(first.pitch_start_speed.as_deref(), Some("93.4"));
    }

    #[test]
    fn test_pitch_records_null_sentinels() {
        let records = pitch_records(&game());
        let first = &records[0];

        assert_eq!(first.at_bat_start_tfs, None);
        assert_eq!(first.spin_rate, None);
        assert_eq!(first.spin_dir, None);
        assert_eq!(first.nasty, None);
        assert_eq!(first.stand, None);
    }

    #[test]
    fn test_hit_records() {
        let records = hit_records(&game());
        assert_eq!(records.len(), 1);

        let hit = &records[0];
        assert_eq!(hit.x.as_deref(), Some("101.3"));
        assert_eq!(hit.pitcher, None);
        assert_eq!(hit.hit_type.as_deref(), Some("H"));
        assert_eq!(hit.year, 2015);
    }

    #[test]
    fn test_player_records_keep_tracked_team_only() {
        let game = game();

        let away = player_records("sea", &game);
        let ids: Vec<&str> = away.iter().map(|p| p.id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["1", "2"]);

        let home = player_records("oak", &game);
        assert_eq!(home.len(), 1);
        assert_eq!(home[0].team_abbrev.as_deref(), Some("OAK"));
    }

    #[test]
    fn test_player_records_null_sentinels() {
        let records = player_records("sea", &game());
        assert_eq!(records[0].era, None);
        assert_eq!(records[0].wins, None);
        assert_eq!(records[0].avg.as_deref(), Some(".258"));
        assert_eq!(records[0].year, 2015);
    }

    #[test]
    fn test_records_for_game_stats() {
        let records = records_for(RecordKind::GameStats, "oak", &game());
        assert_eq!(records.len(), 1);

        match &records[0] {
            Record::GameStat(stat) => {
                assert_eq!(stat.team_code, "oak");
                assert_eq!(stat.game_id, "gid_2015_05_06_seamlb_oakmlb_1");
                assert!(!stat.walk_off_loss);
            }
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn test_records_for_dispatches_by_kind() {
        let game = game();
        assert_eq!(records_for(RecordKind::Pitches, "sea", &game).len(), 9);
        assert_eq!(records_for(RecordKind::Hits, "sea", &game).len(), 1);
        assert_eq!(records_for(RecordKind::Players, "sea", &game).len(), 2);
        assert!(records_for(RecordKind::Players, "sea", &game)
            .iter()
            .all(|r| r.kind() == RecordKind::Players));
    }
}
