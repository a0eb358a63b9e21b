use std::collections::HashSet;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error;
use crate::view::{ChartSeries, FilterSelection};

/// Aggregate delivery metrics for one project snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub project: String,
    pub total_issues: u64,
    pub throughput_last_7_days: u64,
    pub avg_cycle_time_days: f64,
    pub status_counts: IndexMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub assignee: String,
    pub cycle_time_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
    pub hint: String,
}

impl Summary {
    pub fn project_label(&self) -> &str {
        if self.project.is_empty() {
            "DEMO"
        } else {
            &self.project
        }
    }

    pub fn metric_cards(&self) -> Vec<MetricCard> {
        vec![
            MetricCard {
                title: "Total issues",
                value: self.total_issues.to_string(),
                hint: format!("Project: {}", self.project_label()),
            },
            MetricCard {
                title: "Throughput (last 7 days)",
                value: self.throughput_last_7_days.to_string(),
                hint: "Issues moved to Done".to_string(),
            },
            MetricCard {
                title: "Avg cycle time",
                value: format!("{:.1} days", self.avg_cycle_time_days),
                hint: "From In Progress → Done".to_string(),
            },
        ]
    }

    /// Checks the constraints serde's type mapping cannot express.
    pub fn validate(&self) -> Result<(), String> {
        check_days("avg_cycle_time_days", self.avg_cycle_time_days)
    }
}

/// Validates a whole issue response: cycle times and key uniqueness.
pub fn validate_issues(issues: &[Issue]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(issues.len());

    for issue in issues {
        check_days(&format!("cycle_time_days of {}", issue.key), issue.cycle_time_days)?;

        if !seen.insert(issue.key.as_str()) {
            return Err(format!("duplicate issue key {}", issue.key));
        }
    }

    Ok(())
}

fn check_days(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{field} must be a non-negative number, got {value}"))
    }
}

/// Serializable view of the dashboard as currently filtered.
#[derive(Debug, Serialize)]
pub struct DashboardSnapshot {
    pub project: String,
    pub generated_at: DateTime<Utc>,
    pub using_fallback: bool,
    pub notice: Option<String>,
    pub summary: Summary,
    pub selection: FilterSelection,
    pub status_options: Vec<String>,
    pub assignee_options: Vec<String>,
    pub visible_issues: Vec<Issue>,
    pub chart: ChartSeries,
}

impl DashboardSnapshot {
    pub fn to_json(&self, pretty: bool) -> error::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
