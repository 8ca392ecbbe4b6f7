use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fixture as delivered by the league backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureRecord {
    pub id: String,
    pub home_team_id: String,
    pub away_team_id: String,
    #[serde(default)]
    pub kickoff_at: Option<String>,
}

/// Scheduling view of a fixture with its kickoff parsed to UTC.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fixture {
    pub id: String,
    pub home_team_id: String,
    pub away_team_id: String,
    pub kickoff_at: Option<DateTime<Utc>>,
}

impl Fixture {
    pub fn new(
        id: impl Into<String>,
        home_team_id: impl Into<String>,
        away_team_id: impl Into<String>,
        kickoff_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.into(),
            home_team_id: home_team_id.into(),
            away_team_id: away_team_id.into(),
            kickoff_at,
        }
    }

    pub fn involves(&self, team_id: &str) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    /// End of the occupied window, or None when unscheduled or out of chrono's range.
    pub fn occupied_until(&self, duration: Duration) -> Option<DateTime<Utc>> {
        self.kickoff_at.and_then(|start| start.checked_add_signed(duration))
    }
}

impl From<FixtureRecord> for Fixture {
    fn from(record: FixtureRecord) -> Self {
        let kickoff_at = record.kickoff_at.as_deref().and_then(|raw| {
            let parsed = parse_kickoff(raw);
            if parsed.is_none() && !raw.trim().is_empty() {
                warn!(
                    fixture_id = %record.id,
                    kickoff = %raw,
                    "Unparseable kickoff; treating fixture as unscheduled"
                );
            }
            parsed
        });
        Fixture {
            id: record.id,
            home_team_id: record.home_team_id,
            away_team_id: record.away_team_id,
            kickoff_at,
        }
    }
}

/// Parse a kickoff timestamp. Offsets are normalised to UTC and naive times are taken as UTC.
pub fn parse_kickoff(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for pat in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"].iter() {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, pat) {
            return Some(naive.and_utc());
        }
    }
    None
}
