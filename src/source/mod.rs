mod client;
mod demo;

use log::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::models::{Issue, Summary};
use client::ApiClient;

pub const FALLBACK_NOTICE: &str = "Backend API not reachable. Showing demo data.";

/// Result of one load attempt. Loading never fails; a broken backend
/// yields `Fallback` with the demo dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Live {
        summary: Summary,
        issues: Vec<Issue>,
    },
    Fallback {
        summary: Summary,
        issues: Vec<Issue>,
        reason: String,
    },
}

impl LoadOutcome {
    pub fn fallback(reason: String) -> Self {
        Self::Fallback {
            summary: demo::demo_summary(),
            issues: demo::demo_issues(),
            reason,
        }
    }

    pub fn summary(&self) -> &Summary {
        match self {
            Self::Live { summary, .. } | Self::Fallback { summary, .. } => summary,
        }
    }

    pub fn issues(&self) -> &[Issue] {
        match self {
            Self::Live { issues, .. } | Self::Fallback { issues, .. } => issues,
        }
    }

    pub fn using_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Notice to show the user, if any.
    pub fn message(&self) -> Option<&'static str> {
        self.using_fallback().then_some(FALLBACK_NOTICE)
    }
}

pub struct DataSource {
    client: ApiClient,
}

impl DataSource {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new(config)?,
        })
    }

    pub async fn load(&self) -> LoadOutcome {
        let (summary, issues) = tokio::join!(self.client.fetch_summary(), self.client.fetch_issues());

        let outcome = match (summary, issues) {
            (Ok(summary), Ok(issues)) => LoadOutcome::Live { summary, issues },
            (Err(e), _) | (_, Err(e)) => {
                warn!("Backend not reachable, using demo data: {e}");
                LoadOutcome::fallback(e.to_string())
            }
        };

        info!(
            "Loaded {} issues for project {}",
            outcome.issues().len(),
            outcome.summary().project_label()
        );
        outcome
    }
}
