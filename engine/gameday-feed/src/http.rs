use crate::config::FeedConfig;
use crate::error::{FeedError, Result};
use crate::models::Game;
use crate::source::{GameSource, GameStream};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, info};

/// Game source reading the gameday feed over HTTP.
///
/// Feed layout, relative to the configured base URL:
///
/// - `year_{YYYY}/teams.json`: team codes active that year
/// - `year_{YYYY}/{team}/games.json`: ids of the team's completed games
/// - `games/{game_id}.json`: one full game
pub struct HttpGameSource {
    base_url: String,
    client: Client,
}

/// Where a team's game stream currently is
struct GameCursor {
    years: VecDeque<i32>,
    pending: VecDeque<String>,
}

impl HttpGameSource {
    /// Create a new feed client
    pub fn new(config: &FeedConfig) -> Result<Self> {
        config.validate().map_err(FeedError::invalid_url)?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| FeedError::invalid_url(format!("{base_url}: {e}")))?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn teams_url(&self, year: i32) -> String {
        format!("{}/year_{year}/teams.json", self.base_url)
    }

    fn game_ids_url(&self, team_code: &str, year: i32) -> String {
        format!("{}/year_{year}/{team_code}/games.json", self.base_url)
    }

    fn game_url(&self, game_id: &str) -> String {
        format!("{}/games/{game_id}.json", self.base_url)
    }

    /// Ids of the completed games `team_code` played in `year`
    pub async fn list_game_ids(&self, team_code: &str, year: i32) -> Result<Vec<String>> {
        let ids: Vec<String> = self.get_json(self.game_ids_url(team_code, year)).await?;
        info!(team_code, year, games = ids.len(), "Fetched game list");
        Ok(ids)
    }

    pub async fn fetch_game(&self, game_id: &str) -> Result<Game> {
        let mut game: Game = self.get_json(self.game_url(game_id)).await?;
        if game.id.is_empty() {
            game.id = game_id.to_string();
        }
        Ok(game)
    }

    /// Advance `cursor` to the next game, fetching the next year's game list when needed
    async fn next_game(
        &self,
        team_code: &str,
        mut cursor: GameCursor,
    ) -> Result<Option<(Game, GameCursor)>> {
        loop {
            if let Some(game_id) = cursor.pending.pop_front() {
                let game = self.fetch_game(&game_id).await?;
                return Ok(Some((game, cursor)));
            }

            let Some(year) = cursor.years.pop_front() else {
                return Ok(None);
            };
            cursor.pending = self.list_game_ids(team_code, year).await?.into();
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status { url, status });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| FeedError::Decode { url, source })
    }
}

#[async_trait::async_trait]
impl GameSource for HttpGameSource {
    async fn list_teams_for_year(&self, year: i32) -> Result<BTreeSet<String>> {
        let teams: Vec<String> = self.get_json(self.teams_url(year)).await?;
        Ok(teams.into_iter().collect())
    }

    fn fetch_games<'a>(&'a self, team_code: &'a str, years: &'a [i32]) -> GameStream<'a> {
        let cursor = GameCursor {
            years: years.iter().copied().collect(),
            pending: VecDeque::new(),
        };

        stream::try_unfold(cursor, move |cursor| self.next_game(team_code, cursor)).boxed()
    }
}
