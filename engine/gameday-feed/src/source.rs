//! The contract the importer consumes to read games

use crate::error::Result;
use crate::models::Game;
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::BTreeSet;

/// Lazy, pull-based sequence of games. Yields one materialized game per poll.
pub type GameStream<'a> = BoxStream<'a, Result<Game>>;

/// Something that can produce completed games for a team
#[async_trait::async_trait]
pub trait GameSource: Send + Sync {
    /// Team codes that played in `year`
    async fn list_teams_for_year(&self, year: i32) -> Result<BTreeSet<String>>;

    /// Completed games `team_code` played in any of `years`, in feed order.
    ///
    /// The stream is finite. Implementations must not load every game up front.
    fn fetch_games<'a>(&'a self, team_code: &'a str, years: &'a [i32]) -> GameStream<'a>;
}

/// Game source backed by games already held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryGameSource {
    games: Vec<Game>,
}

impl InMemoryGameSource {
    pub fn new(games: Vec<Game>) -> Self {
        Self { games }
    }
}

#[async_trait::async_trait]
impl GameSource for InMemoryGameSource {
    async fn list_teams_for_year(&self, year: i32) -> Result<BTreeSet<String>> {
        Ok(self
            .games
            .iter()
            .filter(|game| game.year() == year)
            .flat_map(|game| [game.home_code.clone(), game.away_code.clone()])
            .collect())
    }

    fn fetch_games<'a>(&'a self, team_code: &'a str, years: &'a [i32]) -> GameStream<'a> {
        stream::iter(self.games.iter().filter(move |game| {
            years.contains(&game.year())
                && (game.home_code == team_code || game.away_code == team_code)
        }))
        .map(|game| Ok(game.clone()))
        .boxed()
    }
}
