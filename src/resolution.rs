use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{info, instrument, warn};

use crate::model::fixture::Fixture;
use crate::scheduler::FixtureScheduler;

/// Proposed teams and kickoff for one fixture, e.g. after a team swap or reassignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub fixture_id: String,
    pub home_team_id: String,
    pub away_team_id: String,
    pub kickoff_at: Option<DateTime<Utc>>,
}

impl Assignment {
    /// Start from a fixture's current state.
    pub fn for_fixture(fixture: &Fixture) -> Self {
        Self {
            fixture_id: fixture.id.clone(),
            home_team_id: fixture.home_team_id.clone(),
            away_team_id: fixture.away_team_id.clone(),
            kickoff_at: fixture.kickoff_at,
        }
    }

    pub fn with_teams(
        mut self,
        home_team_id: impl Into<String>,
        away_team_id: impl Into<String>,
    ) -> Self {
        self.home_team_id = home_team_id.into();
        self.away_team_id = away_team_id.into();
        self
    }

    pub fn with_kickoff(mut self, kickoff_at: Option<DateTime<Utc>>) -> Self {
        self.kickoff_at = kickoff_at;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// No kickoff set; nothing to check.
    Unscheduled,
    Keep { kickoff: DateTime<Utc> },
    AutoRescheduled { from: DateTime<Utc>, to: DateTime<Utc>, conflicts: Vec<String> },
    /// The caller must abort the update.
    NoFreeSlot { from: DateTime<Utc>, conflicts: Vec<String> },
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Unscheduled => "unscheduled",
            Outcome::Keep { .. } => "keep",
            Outcome::AutoRescheduled { .. } => "auto_rescheduled",
            Outcome::NoFreeSlot { .. } => "no_free_slot",
        }
    }
}

/// Decision for a single assignment, returned to the caller to commit or abort.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub fixture_id: String,
    pub outcome: Outcome,
}

impl Resolution {
    /// Kickoff the caller should commit, if any.
    pub fn kickoff(&self) -> Option<DateTime<Utc>> {
        match &self.outcome {
            Outcome::Keep { kickoff } => Some(*kickoff),
            Outcome::AutoRescheduled { to, .. } => Some(*to),
            Outcome::Unscheduled | Outcome::NoFreeSlot { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::NoFreeSlot { .. })
    }

    /// Operator-facing notification with times shown in `tz`.
    pub fn message(&self, tz: &Tz) -> String {
        let fmt = |dt: &DateTime<Utc>| {
            dt.with_timezone(tz).format("%a %b %-d, %Y %-I:%M %p %Z").to_string()
        };
        let id = &self.fixture_id;
        match &self.outcome {
            Outcome::Unscheduled => {
                format!("Fixture {} has no kickoff time; nothing to check.", id)
            }
            Outcome::Keep { kickoff } => format!("Fixture {} kept at {}.", id, fmt(kickoff)),
            Outcome::AutoRescheduled { from, to, conflicts } => format!(
                "Fixture {} auto-rescheduled: {} -> {} (clashed with {}).",
                id,
                fmt(from),
                fmt(to),
                conflicts.join(", ")
            ),
            Outcome::NoFreeSlot { from, conflicts } => format!(
                "Could not find a non-conflicting time for fixture {} from {} (clashes with {}). \
                 Update aborted.",
                id,
                fmt(from),
                conflicts.join(", ")
            ),
        }
    }
}

impl FixtureScheduler {
    /// Check an assignment against the snapshot and, on a clash, search for the next free slot.
    /// The assigned fixture never conflicts with itself.
    #[instrument(
        level = "info",
        skip(self, assignment),
        fields(fixture_id = %assignment.fixture_id)
    )]
    pub fn resolve(&self, assignment: &Assignment) -> Resolution {
        let fixture_id = assignment.fixture_id.clone();
        let Some(from) = assignment.kickoff_at else {
            return Resolution { fixture_id, outcome: Outcome::Unscheduled };
        };
        let exclude = Some(assignment.fixture_id.as_str());

        let mut conflicts: Vec<String> = Vec::new();
        for team in [&assignment.home_team_id, &assignment.away_team_id] {
            for clash in self.conflicts_for(team, Some(from), exclude) {
                if !conflicts.contains(&clash.id) {
                    conflicts.push(clash.id.clone());
                }
            }
        }

        if conflicts.is_empty() {
            return Resolution { fixture_id, outcome: Outcome::Keep { kickoff: from } };
        }

        let outcome = match self.find_next_free_slot(
            &assignment.home_team_id,
            &assignment.away_team_id,
            Some(from),
            exclude,
        ) {
            Some(to) => {
                info!(from = %from, to = %to, conflicts = ?conflicts, "Auto-rescheduled fixture");
                Outcome::AutoRescheduled { from, to, conflicts }
            }
            None => {
                warn!(from = %from, conflicts = ?conflicts, "No free slot for fixture");
                Outcome::NoFreeSlot { from, conflicts }
            }
        };
        Resolution { fixture_id, outcome }
    }
}
