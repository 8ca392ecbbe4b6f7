use serde_json::{json, Value};
use tracing::{error, info};

use crate::handler::Response;

/// Webhook client used to surface scheduling decisions to operators.
#[derive(Debug, Clone)]
pub struct Notifier {
    hook_url: String,
}

impl Notifier {
    pub fn new(hook_url: String) -> Self {
        Self { hook_url }
    }

    /// Only shifted kickoffs and aborted updates are worth an operator's attention.
    pub fn wants(response: &Response) -> bool {
        matches!(response.outcome.as_str(), "auto_rescheduled" | "no_free_slot")
    }

    /// Webhook body: chat-friendly `content` plus the decision fields for machine consumers.
    pub fn payload(response: &Response) -> Value {
        let icon = match response.outcome.as_str() {
            "auto_rescheduled" => ":calendar:",
            "no_free_slot" => ":warning:",
            _ => ":soccer:",
        };
        json!({
            "content": format!("{} {}", icon, response.message),
            "fixture_id": response.fixture_id,
            "outcome": response.outcome,
            "kickoff_at": response.kickoff_at,
        })
    }

    pub fn post(&self, response: &Response) -> Result<(), String> {
        match ureq::post(&self.hook_url).send_json(Self::payload(response)) {
            Ok(resp) => {
                info!(
                    status = resp.status().as_u16(),
                    fixture_id = %response.fixture_id,
                    outcome = %response.outcome,
                    "Posted scheduling notification"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    error = %e,
                    fixture_id = %response.fixture_id,
                    "Failed to post scheduling notification"
                );
                Err(format!("Failed to post to webhook: {}", e))
            }
        }
    }
}
