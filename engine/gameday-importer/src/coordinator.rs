//! Concurrent per-team import jobs

use crate::error::{ImportError, Result};
use crate::mapper;
use chrono::Utc;
use futures::{FutureExt, TryStreamExt};
use gameday_feed::{Game, GameSource};
use gameday_store::{RecordKind, Store, StoreError};
use serde::Serialize;
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Which teams and seasons an import covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportScope {
    /// Every team that played in any of the years
    AllTeams { years: Vec<i32> },
    /// One team over the given years
    Team { team_code: String, years: Vec<i32> },
}

/// One team's share of an import: a single fetch stream and a single writer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportJob {
    pub team_code: String,
    pub years: Vec<i32>,
}

/// Counters for one job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JobStats {
    pub games_seen: usize,
    pub games_skipped: usize,
    pub games_imported: usize,
    pub records_inserted: usize,
    pub duplicates_skipped: usize,
}

impl JobStats {
    fn merge(&mut self, other: &JobStats) {
        self.games_seen += other.games_seen;
        self.games_skipped += other.games_skipped;
        self.games_imported += other.games_imported;
        self.records_inserted += other.records_inserted;
        self.duplicates_skipped += other.duplicates_skipped;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TeamStatus {
    Completed,
    Failed { error: String },
}

/// How one job ended. Stats cover the work done before any failure.
#[derive(Debug, Clone, Serialize)]
pub struct TeamReport {
    pub team_code: String,
    pub years: Vec<i32>,
    pub stats: JobStats,
    pub status: TeamStatus,
}

impl TeamReport {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, TeamStatus::Failed { .. })
    }
}

/// Result of one import command, one report per team in team-code order
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub kind: RecordKind,
    pub teams: Vec<TeamReport>,
}

impl ImportSummary {
    pub fn has_failures(&self) -> bool {
        self.teams.iter().any(TeamReport::is_failed)
    }

    pub fn failed_teams(&self) -> impl Iterator<Item = &TeamReport> {
        self.teams.iter().filter(|team| team.is_failed())
    }

    pub fn totals(&self) -> JobStats {
        let mut totals = JobStats::default();
        for team in &self.teams {
            totals.merge(&team.stats);
        }
        totals
    }
}

/// Runs one import job per team against a shared game source and store
#[derive(Clone)]
pub struct ImportCoordinator {
    source: Arc<dyn GameSource>,
    store: Arc<dyn Store>,
}

impl ImportCoordinator {
    pub fn new(source: Arc<dyn GameSource>, store: Arc<dyn Store>) -> Self {
        Self { source, store }
    }

    /// Import `kind` for one team over `years`
    pub async fn import_team_and_years(
        &self,
        kind: RecordKind,
        team_code: &str,
        years: &[i32],
    ) -> Result<ImportSummary> {
        let scope = ImportScope::Team { team_code: team_code.to_string(), years: years.to_vec() };
        self.import_kind(kind, scope).await
    }

    /// Import `kind` for every team that played in any of `years`
    pub async fn import_years(&self, kind: RecordKind, years: &[i32]) -> Result<ImportSummary> {
        self.import_kind(kind, ImportScope::AllTeams { years: years.to_vec() }).await
    }

    /// Run every job in `scope` concurrently and wait for all of them.
    ///
    /// Only team discovery can fail the call as a whole. Once jobs start, a
    /// failing job is reported in the summary and its siblings keep running.
    pub async fn import_kind(&self, kind: RecordKind, scope: ImportScope) -> Result<ImportSummary> {
        let started = Utc::now();
        let jobs = self.plan_jobs(scope).await?;
        info!(%kind, jobs = jobs.len(), "Starting import");

        let handles: Vec<_> = jobs
            .into_iter()
            .map(|job| {
                let worker = ImportWorker {
                    source: Arc::clone(&self.source),
                    store: Arc::clone(&self.store),
                    kind,
                };
                let team_code = job.team_code.clone();
                let years = job.years.clone();
                let handle = tokio::spawn(worker.run_guarded(job));
                (team_code, years, handle)
            })
            .collect();

        let mut teams = Vec::with_capacity(handles.len());
        for (team_code, years, handle) in handles {
            let report = match handle.await {
                Ok(report) => report,
                Err(join_err) => {
                    let err = ImportError::WorkerPanicked {
                        team_code: team_code.clone(),
                        message: join_err.to_string(),
                    };
                    error!(%team_code, error = %err, "Import job failed");
                    TeamReport {
                        team_code,
                        years,
                        stats: JobStats::default(),
                        status: TeamStatus::Failed { error: err.to_string() },
                    }
                }
            };
            teams.push(report);
        }

        let summary = ImportSummary { kind, teams };
        let totals = summary.totals();
        let elapsed_ms = (Utc::now() - started).num_milliseconds();
        if summary.has_failures() {
            warn!(
                %kind,
                failed = summary.failed_teams().count(),
                records_inserted = totals.records_inserted,
                elapsed_ms,
                "Import finished with failures"
            );
        } else {
            info!(
                %kind,
                games_imported = totals.games_imported,
                games_skipped = totals.games_skipped,
                records_inserted = totals.records_inserted,
                duplicates_skipped = totals.duplicates_skipped,
                elapsed_ms,
                "Import finished"
            );
        }

        Ok(summary)
    }

    /// One job per team. Years are grouped under each team that played in them.
    async fn plan_jobs(&self, scope: ImportScope) -> Result<Vec<ImportJob>> {
        match scope {
            ImportScope::Team { team_code, years } => Ok(vec![ImportJob { team_code, years }]),
            ImportScope::AllTeams { years } => {
                let mut by_team: BTreeMap<String, Vec<i32>> = BTreeMap::new();
                for &year in &years {
                    let teams = self.source.list_teams_for_year(year).await?;
                    debug!(year, teams = teams.len(), "Discovered teams");
                    for team_code in teams {
                        let team_years = by_team.entry(team_code).or_default();
                        if !team_years.contains(&year) {
                            team_years.push(year);
                        }
                    }
                }

                Ok(by_team
                    .into_iter()
                    .map(|(team_code, years)| ImportJob { team_code, years })
                    .collect())
            }
        }
    }
}

/// Executes one job: fetch, check, map, insert, mark
struct ImportWorker {
    source: Arc<dyn GameSource>,
    store: Arc<dyn Store>,
    kind: RecordKind,
}

impl ImportWorker {
    /// Run the job and turn any outcome, panics included, into a report
    async fn run_guarded(self, job: ImportJob) -> TeamReport {
        let mut stats = JobStats::default();
        let outcome = AssertUnwindSafe(self.run(&job, &mut stats)).catch_unwind().await;

        let status = match outcome {
            Ok(Ok(())) => {
                info!(
                    team_code = %job.team_code,
                    kind = %self.kind,
                    games_imported = stats.games_imported,
                    records_inserted = stats.records_inserted,
                    "Import job completed"
                );
                TeamStatus::Completed
            }
            Ok(Err(err)) => {
                error!(
                    team_code = %job.team_code,
                    kind = %self.kind,
                    error = %err,
                    "Import job failed"
                );
                TeamStatus::Failed { error: err.to_string() }
            }
            Err(panic) => {
                let err = ImportError::WorkerPanicked {
                    team_code: job.team_code.clone(),
                    message: panic_message(panic.as_ref()),
                };
                error!(
                    team_code = %job.team_code,
                    kind = %self.kind,
                    error = %err,
                    "Import job failed"
                );
                TeamStatus::Failed { error: err.to_string() }
            }
        };

        TeamReport { team_code: job.team_code, years: job.years, stats, status }
    }

    async fn run(&self, job: &ImportJob, stats: &mut JobStats) -> Result<()> {
        debug!(
            team_code = %job.team_code,
            years = ?job.years,
            kind = %self.kind,
            "Import job started"
        );

        let mut games = self.source.fetch_games(&job.team_code, &job.years);
        while let Some(game) = games.try_next().await? {
            stats.games_seen += 1;

            if self.store.exists(self.kind, &game.id, &job.team_code).await? {
                debug!(
                    game_id = %game.id,
                    team_code = %job.team_code,
                    "Already imported, skipping"
                );
                stats.games_skipped += 1;
                continue;
            }

            self.import_game(&job.team_code, &game, stats).await?;
            self.store.mark_imported(self.kind, &game.id, &job.team_code).await?;
            stats.games_imported += 1;
        }

        Ok(())
    }

    async fn import_game(&self, team_code: &str, game: &Game, stats: &mut JobStats) -> Result<()> {
        for record in mapper::records_for(self.kind, team_code, game) {
            match self.store.insert(&record).await {
                Ok(()) => stats.records_inserted += 1,
                Err(StoreError::DuplicateKey { table, detail }) => {
                    debug!(game_id = %game.id, table, %detail, "Duplicate row ignored");
                    stats.duplicates_skipped += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
