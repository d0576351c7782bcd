use crate::config::DatabaseConfig;
use crate::error::{Result, StoreError};
use crate::records::{GameStatRecord, HitRecord, PitchRecord, PlayerRecord, Record, RecordKind};
use crate::schema;
use crate::store::{ledger_team_code, Store};
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

const INSERT_PITCH: &str = r#"
    INSERT INTO pitches
        (game_id, year, inning, half, at_bat_num, at_bat_b, at_bat_s, at_bat_o, at_bat_start_tfs,
        batter, stand, b_height, pitcher, p_throws, at_bat_des, at_bat_event,
        pitch_des, pitch_id, pitch_type, pitch_pitch_type, type_confidence,
        pitch_tfs, pitch_x, pitch_y, pitch_sv_id, pitch_start_speed, pitch_end_speed,
        sz_top, sz_bottom, pfx_x, pfx_z, px, pz, x0, y0,
        z0, vx0, vy0, vz0, ax, ay, az, break_y,
        break_angle, break_length, zone, spin_dir, spin_rate, nasty)
    VALUES
        ($1, $2, $3::int, $4, $5::int, $6::int, $7::int, $8::int, $9::int,
        $10::int, $11, $12, $13::int, $14, $15, $16,
        $17, $18::int, $19, $20, $21::numeric,
        $22::int, $23::numeric, $24::numeric, $25, $26::numeric, $27::numeric,
        $28::numeric, $29::numeric, $30::numeric, $31::numeric,
        $32::numeric, $33::numeric, $34::numeric, $35::numeric,
        $36::numeric, $37::numeric, $38::numeric, $39::numeric,
        $40::numeric, $41::numeric, $42::numeric, $43::numeric,
        $44::numeric, $45::numeric, $46::int,
        $47::numeric, $48::numeric, $49::int)
"#;

const INSERT_HIT: &str = r#"
    INSERT INTO hits
        (game_id, year, des, x, y, batter, pitcher, type, team, inning)
    VALUES
        ($1, $2, $3, $4::numeric, $5::numeric, $6::int, $7::int, $8, $9, $10::int)
"#;

const INSERT_PLAYER: &str = r#"
    INSERT INTO players
        (year, id, first, last, num, boxname, rl, bats,
        position, current_position, status, team_abbrev, team_id,
        parent_team_abbrev, parent_team_id, bat_order, game_position, avg,
        hr, rbi, wins, losses, era)
    VALUES
        ($1, $2::int, $3, $4, $5::int, $6, $7, $8,
        $9, $10, $11, $12, $13::int,
        $14, $15::int, $16::int, $17, $18::numeric,
        $19::int, $20::int, $21::int, $22::int, $23::numeric)
"#;

const INSERT_GAME_STAT: &str = r#"
    INSERT INTO game_stats (game_id, year, team_code, walk_off_loss)
    VALUES ($1, $2, $3, $4)
"#;

/// Postgres-backed store sharing one connection pool between all import jobs
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open the pool and check the database answers
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        config.validate().map_err(StoreError::config)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.url)
            .await
            .map_err(StoreError::Connection)?;

        sqlx::query("SELECT 1").execute(&pool).await.map_err(StoreError::Connection)?;

        info!(max_connections = config.max_connections, "Connected to database");
        Ok(Self { pool })
    }

    pub async fn create_tables(&self) -> Result<()> {
        schema::create_tables(&self.pool).await
    }

    pub async fn create_table(&self, kind: RecordKind) -> Result<()> {
        schema::create_table(&self.pool, kind).await
    }

    async fn insert_pitch(&self, p: &PitchRecord) -> sqlx::Result<()> {
        sqlx::query(INSERT_PITCH)
            .bind(&p.game_id)
            .bind(p.year)
            .bind(&p.inning)
            .bind(p.half.as_str())
            .bind(&p.at_bat_num)
            .bind(&p.at_bat_b)
            .bind(&p.at_bat_s)
            .bind(&p.at_bat_o)
            .bind(&p.at_bat_start_tfs)
            .bind(&p.batter)
            .bind(&p.stand)
            .bind(&p.b_height)
            .bind(&p.pitcher)
            .bind(&p.p_throws)
            .bind(&p.at_bat_des)
            .bind(&p.at_bat_event)
            .bind(&p.pitch_des)
            .bind(&p.pitch_id)
            .bind(&p.pitch_type)
            .bind(&p.pitch_pitch_type)
            .bind(&p.type_confidence)
            .bind(&p.pitch_tfs)
            .bind(&p.pitch_x)
            .bind(&p.pitch_y)
            .bind(&p.pitch_sv_id)
            .bind(&p.pitch_start_speed)
            .bind(&p.pitch_end_speed)
            .bind(&p.sz_top)
            .bind(&p.sz_bottom)
            .bind(&p.pfx_x)
            .bind(&p.pfx_z)
            .bind(&p.px)
            .bind(&p.pz)
            .bind(&p.x0)
            .bind(&p.y0)
            .bind(&p.z0)
            .bind(&p.vx0)
            .bind(&p.vy0)
            .bind(&p.vz0)
            .bind(&p.ax)
            .bind(&p.ay)
            .bind(&p.az)
            .bind(&p.break_y)
            .bind(&p.break_angle)
            .bind(&p.break_length)
            .bind(&p.zone)
            .bind(&p.spin_dir)
            .bind(&p.spin_rate)
            .bind(&p.nasty)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_hit(&self, h: &HitRecord) -> sqlx::Result<()> {
        sqlx::query(INSERT_HIT)
            .bind(&h.game_id)
            .bind(h.year)
            .bind(&h.des)
            .bind(&h.x)
            .bind(&h.y)
            .bind(&h.batter)
            .bind(&h.pitcher)
            .bind(&h.hit_type)
            .bind(&h.team)
            .bind(&h.inning)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_player(&self, p: &PlayerRecord) -> sqlx::Result<()> {
        sqlx::query(INSERT_PLAYER)
            .bind(p.year)
            .bind(&p.id)
            .bind(&p.first)
            .bind(&p.last)
            .bind(&p.num)
            .bind(&p.boxname)
            .bind(&p.rl)
            .bind(&p.bats)
            .bind(&p.position)
            .bind(&p.current_position)
            .bind(&p.status)
            .bind(&p.team_abbrev)
            .bind(&p.team_id)
            .bind(&p.parent_team_abbrev)
            .bind(&p.parent_team_id)
            .bind(&p.bat_order)
            .bind(&p.game_position)
            .bind(&p.avg)
            .bind(&p.hr)
            .bind(&p.rbi)
            .bind(&p.wins)
            .bind(&p.losses)
            .bind(&p.era)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_game_stat(&self, g: &GameStatRecord) -> sqlx::Result<()> {
        sqlx::query(INSERT_GAME_STAT)
            .bind(&g.game_id)
            .bind(g.year)
            .bind(&g.team_code)
            .bind(g.walk_off_loss)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn exists(&self, kind: RecordKind, game_id: &str, team_code: &str) -> Result<bool> {
        let found: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM imported_games
                WHERE record_kind = $1 AND game_id = $2 AND team_code = $3
            )
            "#,
        )
        .bind(kind.as_str())
        .bind(game_id)
        .bind(ledger_team_code(kind, team_code))
        .fetch_one(&self.pool)
        .await?;

        Ok(found)
    }

    async fn insert(&self, record: &Record) -> Result<()> {
        let result = match record {
            Record::Pitch(p) => self.insert_pitch(p).await,
            Record::Hit(h) => self.insert_hit(h).await,
            Record::Player(p) => self.insert_player(p).await,
            Record::GameStat(g) => self.insert_game_stat(g).await,
        };

        result.map_err(|err| classify_insert_error(record.kind(), err))
    }

    async fn mark_imported(&self, kind: RecordKind, game_id: &str, team_code: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO imported_games (record_kind, game_id, team_code, imported_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (record_kind, game_id, team_code)
            DO UPDATE SET imported_at = EXCLUDED.imported_at
            "#,
        )
        .bind(kind.as_str())
        .bind(game_id)
        .bind(ledger_team_code(kind, team_code))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Separate unique-index conflicts from every other insert failure
fn classify_insert_error(kind: RecordKind, err: sqlx::Error) -> StoreError {
    let is_unique_violation = err
        .as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION);

    if is_unique_violation {
        StoreError::DuplicateKey { table: kind.table_name(), detail: err.to_string() }
    } else {
        StoreError::Database(err)
    }
}
