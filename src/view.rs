//! Derived views over the raw issue list and status counts.
//!
//! Everything here is a pure function of its inputs: the filter option sets,
//! the visible issue subset and the series the status chart is drawn from.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Serialize, Serializer};

use crate::models::Issue;

pub const ALL: &str = "All";

/// One half of the filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Only(String),
}

impl Filter {
    /// `"All"` selects everything; any other text selects that exact value.
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(value) => f.write_str(value),
        }
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub status: Filter,
    pub assignee: Filter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueField {
    Status,
    Assignee,
}

impl IssueField {
    fn value<'a>(self, issue: &'a Issue) -> &'a str {
        match self {
            Self::Status => &issue.status,
            Self::Assignee => &issue.assignee,
        }
    }
}

/// `"All"` followed by the distinct values of `field`, in first-seen order.
pub fn options_for(issues: &[Issue], field: IssueField) -> Vec<String> {
    let distinct: IndexSet<&str> = issues.iter().map(|issue| field.value(issue)).collect();

    std::iter::once(ALL)
        .chain(distinct.into_iter().filter(|value| *value != ALL))
        .map(str::to_string)
        .collect()
}

/// Issues passing both filters, in input order.
pub fn visible_issues(issues: &[Issue], selection: &FilterSelection) -> Vec<Issue> {
    issues
        .iter()
        .filter(|issue| {
            selection.status.matches(&issue.status) && selection.assignee.matches(&issue.assignee)
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self { r, g, b, alpha }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.alpha)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub const PALETTE: [Color; 4] = [
    Color::rgba(96, 165, 250, 0.9),  // blue
    Color::rgba(52, 211, 153, 0.9),  // green
    Color::rgba(251, 191, 36, 0.9),  // yellow
    Color::rgba(248, 113, 113, 0.9), // red
];

pub fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    pub colors: Vec<Color>,
}

impl ChartSeries {
    /// False when there is nothing to plot and a placeholder should be shown.
    pub fn has_data(&self) -> bool {
        !self.labels.is_empty()
    }

    pub fn max_value(&self) -> u64 {
        self.values.iter().copied().max().unwrap_or(0)
    }
}

pub fn chart_series(status_counts: &IndexMap<String, u64>) -> ChartSeries {
    let mut series = ChartSeries::default();

    for (index, (label, value)) in status_counts.iter().enumerate() {
        series.labels.push(label.clone());
        series.values.push(*value);
        series.colors.push(palette_color(index));
    }

    series
}
