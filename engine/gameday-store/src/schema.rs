//! Table definitions
//!
//! Creating a table drops any existing table of the same name first. Existing
//! data is lost.

use crate::error::Result;
use crate::records::RecordKind;
use sqlx::PgPool;
use tracing::info;

const PITCHES: &[&str] = &[
    "DROP INDEX IF EXISTS pitches_game_id",
    "DROP TABLE IF EXISTS pitches",
    r#"CREATE TABLE pitches (
        pitchid SERIAL PRIMARY KEY, game_id varchar(40), year int, inning int, half varchar(6),
        at_bat_num int, at_bat_b int, at_bat_s int, at_bat_o int, at_bat_start_tfs int,
        batter int, stand char(1), b_height varchar(4), pitcher int, p_throws char(1),
        at_bat_des varchar(400), at_bat_event varchar(20), pitch_des varchar(40), pitch_id int,
        pitch_type char(1), pitch_pitch_type char(2), type_confidence DECIMAL(4, 3), pitch_tfs int,
        pitch_x DECIMAL(5, 2), pitch_y DECIMAL(5, 2), pitch_sv_id varchar(40),
        pitch_start_speed DECIMAL(4, 1), pitch_end_speed DECIMAL(4, 1),
        sz_top DECIMAL(3, 2), sz_bottom DECIMAL(3, 2), pfx_x DECIMAL(4, 2), pfx_z DECIMAL(4, 2),
        px DECIMAL(4, 3), pz DECIMAL(4, 3), x0 DECIMAL(5, 3), y0 DECIMAL(5, 3), z0 DECIMAL(5, 3),
        vx0 DECIMAL(4, 2), vy0 DECIMAL(6, 3), vz0 DECIMAL(5, 3),
        ax DECIMAL(5, 3), ay DECIMAL(5, 3), az DECIMAL(5, 3),
        break_y DECIMAL(3, 1), break_angle DECIMAL(4, 1), break_length DECIMAL(3, 1), zone int,
        spin_dir DECIMAL(6, 3), spin_rate DECIMAL(7, 3), nasty int
    )"#,
    "CREATE INDEX pitches_game_id ON pitches (game_id)",
    "CREATE UNIQUE INDEX pitches_game_id_pitch_id ON pitches (game_id, pitch_id)",
];

const PLAYERS: &[&str] = &[
    "DROP INDEX IF EXISTS players_year_id_team_abbrev",
    "DROP TABLE IF EXISTS players",
    r#"CREATE TABLE players (
        playerid SERIAL PRIMARY KEY, year int, id int, first varchar(40), last varchar(40), num int,
        boxname varchar(40), rl varchar(1), bats varchar(1), position varchar(2),
        current_position varchar(2), status varchar(1), team_abbrev varchar(3), team_id int,
        parent_team_abbrev varchar(3), parent_team_id int, bat_order int, game_position varchar(2),
        avg DECIMAL(4, 3), hr int, rbi int, wins int, losses int, era DECIMAL(5, 2)
    )"#,
    "CREATE UNIQUE INDEX players_year_id_team_abbrev ON players (year, id, team_abbrev)",
];

const HITS: &[&str] = &[
    "DROP INDEX IF EXISTS unique_hits",
    "DROP TABLE IF EXISTS hits",
    r#"CREATE TABLE hits (
        hitid SERIAL PRIMARY KEY, game_id varchar(40), year int, des varchar(400),
        x DECIMAL(5, 2), y DECIMAL(5, 2), batter int, pitcher int, type varchar(1),
        team varchar(1), inning int
    )"#,
    "CREATE UNIQUE INDEX unique_hits ON hits (game_id, x, y, batter, inning)",
];

const GAME_STATS: &[&str] = &[
    "DROP TABLE IF EXISTS game_stats",
    r#"CREATE TABLE game_stats (
        gamestatid SERIAL PRIMARY KEY, game_id varchar(40), year int, team_code varchar(3),
        walk_off_loss boolean
    )"#,
    "CREATE UNIQUE INDEX game_stats_game_id_team_code ON game_stats (game_id, team_code)",
];

/// Ledger of games whose records have been fully handled, per record kind
const IMPORTED_GAMES: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS imported_games (
        record_kind varchar(20) NOT NULL, game_id varchar(40) NOT NULL,
        team_code varchar(3) NOT NULL, imported_at timestamptz NOT NULL DEFAULT now(),
        PRIMARY KEY (record_kind, game_id, team_code)
    )"#,
];

/// DDL statements for one data table
pub fn table_statements(kind: RecordKind) -> &'static [&'static str] {
    match kind {
        RecordKind::Pitches => PITCHES,
        RecordKind::Players => PLAYERS,
        RecordKind::Hits => HITS,
        RecordKind::GameStats => GAME_STATS,
    }
}

/// Drop and recreate the table for `kind`, and forget which games were
/// imported into it.
pub async fn create_table(pool: &PgPool, kind: RecordKind) -> Result<()> {
    info!("Creating {} table", kind.table_name());

    create_ledger(pool).await?;
    for statement in table_statements(kind) {
        sqlx::query(statement).execute(pool).await?;
    }

    sqlx::query("DELETE FROM imported_games WHERE record_kind = $1")
        .bind(kind.as_str())
        .execute(pool)
        .await?;

    info!("Done with {}", kind.table_name());
    Ok(())
}

/// Drop and recreate every table
pub async fn create_tables(pool: &PgPool) -> Result<()> {
    info!("Creating database tables");
    for kind in RecordKind::ALL {
        create_table(pool, kind).await?;
    }
    info!("Done");
    Ok(())
}

async fn create_ledger(pool: &PgPool) -> Result<()> {
    for statement in IMPORTED_GAMES {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
