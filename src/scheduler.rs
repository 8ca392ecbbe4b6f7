use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::config::SchedulerConfig;
use crate::model::fixture::{Fixture, FixtureRecord};

/// Conflict detection and free-slot search over an owned snapshot of fixtures.
/// The scheduler only answers queries; committing a new kickoff is up to the caller.
#[derive(Debug, Clone)]
pub struct FixtureScheduler {
    fixtures: Vec<Fixture>,
    config: SchedulerConfig,
}

impl FixtureScheduler {
    pub fn new(fixtures: Vec<Fixture>) -> Self {
        Self::with_config(fixtures, SchedulerConfig::default())
    }

    pub fn with_config(fixtures: Vec<Fixture>, config: SchedulerConfig) -> Self {
        Self { fixtures, config }
    }

    /// Build from backend records. Unparseable kickoffs become unscheduled fixtures.
    pub fn from_records(records: Vec<FixtureRecord>, config: SchedulerConfig) -> Self {
        let fixtures = records.into_iter().map(Fixture::from).collect();
        Self { fixtures, config }
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn fixture(&self, fixture_id: &str) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.id == fixture_id)
    }

    /// All scheduled fixtures of `team_id` whose occupied window overlaps one starting at
    /// `proposed_kickoff`.
    /// Empty when the team id is empty or there is no kickoff to check.
    pub fn conflicts_for<'a>(
        &'a self,
        team_id: &'a str,
        proposed_kickoff: Option<DateTime<Utc>>,
        exclude_fixture_id: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Fixture> + 'a {
        let duration = self.config.match_duration();
        let start = proposed_kickoff.filter(|_| !team_id.is_empty());

        self.fixtures.iter().filter(move |other| {
            let Some(start) = start else { return false };
            if exclude_fixture_id.is_some_and(|ex| ex == other.id) || !other.involves(team_id) {
                return false;
            }
            // A window running past the end of representable time is never a clash.
            let (Some(other_start), Some(other_end)) =
                (other.kickoff_at, other.occupied_until(duration))
            else {
                return false;
            };
            let Some(end) = start.checked_add_signed(duration) else { return false };
            // Half-open windows: a match ending exactly at kickoff is not a clash.
            start.max(other_start) < end.min(other_end)
        })
    }

    /// Whether `team_id` is already busy for a match kicking off at `proposed_kickoff`.
    pub fn has_conflict(
        &self,
        team_id: &str,
        proposed_kickoff: Option<DateTime<Utc>>,
        exclude_fixture_id: Option<&str>,
    ) -> bool {
        match self.conflicts_for(team_id, proposed_kickoff, exclude_fixture_id).next() {
            Some(clash) => {
                debug!(team_id, clash_id = %clash.id, "Kickoff overlaps existing fixture");
                true
            }
            None => false,
        }
    }

    /// Step forward from `proposed_kickoff` until both teams are free.
    /// The proposed instant itself is tried first; candidates stop short of the search horizon.
    #[instrument(level = "debug", skip(self))]
    pub fn find_next_free_slot(
        &self,
        team_a_id: &str,
        team_b_id: &str,
        proposed_kickoff: Option<DateTime<Utc>>,
        exclude_fixture_id: Option<&str>,
    ) -> Option<DateTime<Utc>> {
        let start = proposed_kickoff?;
        let step = self.config.slot_step();
        let horizon_end = start
            .checked_add_signed(self.config.search_horizon())
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut candidate = start;
        while candidate < horizon_end {
            let busy = self.has_conflict(team_a_id, Some(candidate), exclude_fixture_id)
                || self.has_conflict(team_b_id, Some(candidate), exclude_fixture_id);
            if !busy {
                let shifted_minutes = (candidate - start).num_minutes();
                debug!(slot = %candidate, shifted_minutes, "Found free slot");
                return Some(candidate);
            }
            match candidate.checked_add_signed(step) {
                Some(next) => candidate = next,
                None => break,
            }
        }

        info!(team_a_id, team_b_id, from = %start, "No free slot within search horizon");
        None
    }
}
