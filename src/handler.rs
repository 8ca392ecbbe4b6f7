use chrono::SecondsFormat;
use chrono_tz::Tz;
use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::SchedulerConfig;
use crate::model::fixture::{parse_kickoff, FixtureRecord};
use crate::notifier::Notifier;
use crate::resolution::Assignment;
use crate::scheduler::FixtureScheduler;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub fixtures: Vec<FixtureRecord>,
    pub fixture_id: String,
    #[serde(default)]
    pub home_team_id: Option<String>,
    #[serde(default)]
    pub away_team_id: Option<String>,
    #[serde(default)]
    pub kickoff_at: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub notify_hook_url: Option<String>,
    #[serde(default)]
    pub config: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub fixture_id: String,
    pub outcome: String,
    pub message: String,
    pub kickoff_at: Option<String>,
}

/// Resolve the requested assignment against the fixture snapshot. No I/O.
pub fn process(request: Request) -> Result<Response, String> {
    let tz_name = request.timezone.as_deref().unwrap_or("UTC");
    let tz: Tz = tz_name
        .parse()
        .map_err(|_| format!("Unknown timezone: {}", tz_name))?;

    let scheduler = FixtureScheduler::from_records(request.fixtures, request.config);
    let fixture = scheduler
        .fixture(&request.fixture_id)
        .ok_or_else(|| format!("Fixture {} not found in snapshot", request.fixture_id))?;

    let home = request.home_team_id.unwrap_or_else(|| fixture.home_team_id.clone());
    let away = request.away_team_id.unwrap_or_else(|| fixture.away_team_id.clone());
    if home == away {
        return Err(format!(
            "Fixture {} cannot have {} as both home and away team",
            fixture.id, home
        ));
    }

    let mut assignment = Assignment::for_fixture(fixture).with_teams(home, away);
    // A malformed override leaves the fixture unscheduled rather than failing the request.
    if let Some(raw) = request.kickoff_at.as_deref() {
        assignment = assignment.with_kickoff(parse_kickoff(raw));
    }

    let resolution = scheduler.resolve(&assignment);
    let message = resolution.message(&tz);
    info!(outcome = resolution.outcome.label(), message = %message, "Resolved fixture assignment");

    Ok(Response {
        fixture_id: resolution.fixture_id.clone(),
        outcome: resolution.outcome.label().to_string(),
        message,
        kickoff_at: resolution
            .kickoff()
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
    })
}

#[instrument(skip(event))]
pub async fn handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    let payload = event.payload;
    let hook_url = payload.notify_hook_url.clone();

    let response = match process(payload) {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "Failed to resolve fixture assignment");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e).into());
        }
    };

    if let Some(url) = hook_url.filter(|_| Notifier::wants(&response)) {
        // ureq is blocking; the task must own its inputs.
        let notifier = Notifier::new(url);
        let posted = response.clone();
        match tokio::task::spawn_blocking(move || notifier.post(&posted)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "Notification not delivered"),
            Err(e) => error!(error = %e, "Notification task join error"),
        }
    }

    Ok(response)
}
