//! Dashboard state and the controller that owns it.
//!
//! State only changes through [`DashboardState::reduce`]. Each refresh is
//! tagged with a generation number; a load result carrying an older
//! generation than the current one is discarded, so overlapping refreshes
//! cannot overwrite newer data with older data.

use chrono::Utc;
use log::debug;

use crate::models::{DashboardSnapshot, Issue, Summary};
use crate::source::{DataSource, LoadOutcome};
use crate::view::{self, ChartSeries, Filter, FilterSelection, IssueField};

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub summary: Option<Summary>,
    pub issues: Vec<Issue>,
    pub loading: bool,
    pub using_fallback: bool,
    pub notice: Option<String>,
    pub selection: FilterSelection,
    pub generation: u64,
}

#[derive(Debug)]
pub enum Action {
    RefreshStarted,
    Loaded { generation: u64, outcome: LoadOutcome },
    SelectStatus(Filter),
    SelectAssignee(Filter),
}

impl DashboardState {
    #[must_use]
    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::RefreshStarted => Self {
                loading: true,
                using_fallback: false,
                notice: None,
                generation: self.generation + 1,
                ..self
            },
            Action::Loaded { generation, .. } if generation != self.generation => {
                debug!(
                    "Discarding stale load result (generation {generation}, current {})",
                    self.generation
                );
                self
            }
            Action::Loaded { outcome, .. } => {
                if let LoadOutcome::Fallback { reason, .. } = &outcome {
                    debug!("Applying demo data after failed load: {reason}");
                }

                let notice = outcome.message().map(str::to_string);
                let using_fallback = outcome.using_fallback();
                let (summary, issues) = match outcome {
                    LoadOutcome::Live { summary, issues }
                    | LoadOutcome::Fallback {
                        summary, issues, ..
                    } => (summary, issues),
                };

                Self {
                    summary: Some(summary),
                    issues,
                    loading: false,
                    using_fallback,
                    notice,
                    ..self
                }
            }
            Action::SelectStatus(status) => Self {
                selection: FilterSelection {
                    status,
                    ..self.selection
                },
                ..self
            },
            Action::SelectAssignee(assignee) => Self {
                selection: FilterSelection {
                    assignee,
                    ..self.selection
                },
                ..self
            },
        }
    }

    pub fn status_options(&self) -> Vec<String> {
        view::options_for(&self.issues, IssueField::Status)
    }

    pub fn assignee_options(&self) -> Vec<String> {
        view::options_for(&self.issues, IssueField::Assignee)
    }

    pub fn visible_issues(&self) -> Vec<Issue> {
        view::visible_issues(&self.issues, &self.selection)
    }

    /// Chart series for the loaded summary; empty until the first load lands.
    pub fn chart(&self) -> ChartSeries {
        self.summary
            .as_ref()
            .map(|summary| view::chart_series(&summary.status_counts))
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Option<DashboardSnapshot> {
        let summary = self.summary.clone()?;

        Some(DashboardSnapshot {
            project: summary.project_label().to_string(),
            generated_at: Utc::now(),
            using_fallback: self.using_fallback,
            notice: self.notice.clone(),
            selection: self.selection.clone(),
            status_options: self.status_options(),
            assignee_options: self.assignee_options(),
            visible_issues: self.visible_issues(),
            chart: self.chart(),
            summary,
        })
    }
}

pub struct Dashboard {
    source: DataSource,
    state: DashboardState,
}

impl Dashboard {
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            state: DashboardState::default(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(action);
    }

    pub async fn refresh(&mut self) {
        self.dispatch(Action::RefreshStarted);
        let generation = self.state.generation;

        let outcome = self.source.load().await;
        self.dispatch(Action::Loaded {
            generation,
            outcome,
        });
    }
}
