// Fixed dataset shown when the backend cannot be reached.

use indexmap::IndexMap;

use crate::models::{Issue, Summary};

pub fn demo_summary() -> Summary {
    let status_counts: IndexMap<String, u64> = [
        ("To Do", 8),
        ("In Progress", 5),
        ("Code Review", 3),
        ("Done", 12),
    ]
    .into_iter()
    .map(|(status, count)| (status.to_string(), count))
    .collect();

    Summary {
        project: "DEMO".to_string(),
        total_issues: 28,
        throughput_last_7_days: 7,
        avg_cycle_time_days: 3.4,
        status_counts,
    }
}

pub fn demo_issues() -> Vec<Issue> {
    [
        ("DEMO-1", "Implement login flow", "In Progress", "Fernando Sanchez", 4.0),
        ("DEMO-2", "Create engineering productivity dashboard", "In Progress", "Fernando Sanchez", 6.0),
        ("DEMO-3", "Add unit tests for API layer", "Code Review", "Marisol Sanchez", 3.0),
        ("DEMO-4", "Refactor legacy reporting job", "To Do", "Jose Gomez", 0.0),
        ("DEMO-5", "Improve deployment pipeline", "In Progress", "Jim Morales", 5.0),
        ("DEMO-6", "Fix flaky integration tests", "Code Review", "Fernando Sanchez", 2.0),
    ]
    .into_iter()
    .map(|(key, summary, status, assignee, cycle_time_days)| Issue {
        key: key.to_string(),
        summary: summary.to_string(),
        status: status.to_string(),
        assignee: assignee.to_string(),
        cycle_time_days,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validate_issues;

    #[test]
    fn test_demo_summary_headline_numbers() {
        let summary = demo_summary();

        assert_eq!(summary.project, "DEMO");
        assert_eq!(summary.total_issues, 28);
        assert_eq!(summary.throughput_last_7_days, 7);
        assert_eq!(summary.status_counts.len(), 4);
        assert_eq!(summary.status_counts.values().sum::<u64>(), 28);
    }

    #[test]
    fn test_demo_data_passes_validation() {
        assert!(demo_summary().validate().is_ok());
        assert!(validate_issues(&demo_issues()).is_ok());
    }

    #[test]
    fn test_demo_issues_keep_their_order() {
        let keys: Vec<_> = demo_issues().into_iter().map(|i| i.key).collect();

        assert_eq!(
            keys,
            vec!["DEMO-1", "DEMO-2", "DEMO-3", "DEMO-4", "DEMO-5", "DEMO-6"]
        );
    }
}
