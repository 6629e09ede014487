//! Service layer for rating submission and aggregation.

use super::error::{CompetitionServiceError, CompetitionServiceResult};
use crate::competition::{
    config::CompetitionConfig,
    domain::{Caller, CallerRole, Rating, Score, ScoreAverage, Team, TeamId},
    ports::{RatingRepository, TeamRepository},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Rating orchestration service.
#[derive(Clone)]
pub struct RatingService<S, C>
where
    S: TeamRepository + RatingRepository,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: CompetitionConfig,
}

impl<S, C> RatingService<S, C>
where
    S: TeamRepository + RatingRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new rating service with default configuration.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            store,
            clock,
            config: CompetitionConfig::default(),
        }
    }

    /// Replaces the service configuration.
    #[must_use]
    pub const fn with_config(mut self, config: CompetitionConfig) -> Self {
        self.config = config;
        self
    }

    async fn find_team_or_error(&self, team_id: TeamId) -> CompetitionServiceResult<Team> {
        self.store
            .find_team(team_id)
            .await?
            .ok_or(CompetitionServiceError::TeamNotFound(team_id))
    }

    /// Records the caller's score for a team, replacing any earlier score.
    ///
    /// # Errors
    ///
    /// Returns a domain error for scores outside `0..=10`,
    /// [`CompetitionServiceError::TeamNotFound`],
    /// [`CompetitionServiceError::Forbidden`] when a participant rates their
    /// own team and self-rating is disabled, or a repository error when the
    /// project is not in judging.
    #[instrument(skip_all, fields(team_id = %team_id, rater_id = %caller.user_id()))]
    pub async fn submit_rating(
        &self,
        caller: &Caller,
        team_id: TeamId,
        raw_score: i32,
    ) -> CompetitionServiceResult<Rating> {
        let score = Score::new(raw_score)?;
        let team = self.find_team_or_error(team_id).await?;
        if !self.config.allow_self_rating
            && caller.role() == CallerRole::Participant
            && team.has_member(caller.user_id())
        {
            return Err(CompetitionServiceError::forbidden(
                caller,
                "rate their own team",
            ));
        }

        let rating = Rating::new(caller.user_id(), team.id(), score, &*self.clock);
        self.store.upsert(&rating).await?;
        debug!(%score, "rating recorded");
        Ok(rating)
    }

    /// Returns the mean of all current scores for a team, or `None` when the
    /// team has not been rated.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionServiceError::TeamNotFound`] or persistence
    /// errors.
    pub async fn get_average(
        &self,
        team_id: TeamId,
    ) -> CompetitionServiceResult<Option<ScoreAverage>> {
        let team = self.find_team_or_error(team_id).await?;
        let ratings = self.store.find_by_team(team.id()).await?;
        Ok(ScoreAverage::from_scores(ratings.iter().map(Rating::score)))
    }

    /// Returns the caller's own current score for a team.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitionServiceError::TeamNotFound`] or persistence
    /// errors.
    pub async fn get_mine(
        &self,
        caller: &Caller,
        team_id: TeamId,
    ) -> CompetitionServiceResult<Option<Score>> {
        let team = self.find_team_or_error(team_id).await?;
        let rating = self
            .store
            .find_rating(caller.user_id(), team.id())
            .await?;
        Ok(rating.as_ref().map(Rating::score))
    }
}
