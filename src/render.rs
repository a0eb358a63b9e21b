use std::fmt::Write;

use crossterm::style::{Color as TermColor, Stylize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::dashboard::DashboardState;
use crate::models::{Issue, Summary};
use crate::view::{ChartSeries, Color};

const BAR_WIDTH: u64 = 30;
const CARD_WIDTH: usize = 30;
const SUMMARY_WIDTH: usize = 42;

pub const NO_CHART_DATA: &str = "No status data available";
pub const NO_MATCHING_ISSUES: &str = "No issues match the selected filters.";

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub color: bool,
}

/// Renders the whole dashboard as terminal text.
pub fn render(state: &DashboardState, options: RenderOptions) -> String {
    let Some(summary) = &state.summary else {
        return "Loading dashboard…\n".to_string();
    };

    let mut out = String::new();

    if state.loading {
        let _ = writeln!(out, "Refreshing…\n");
    }

    if let Some(notice) = &state.notice {
        let banner = format!("! {notice}");
        let banner = if options.color {
            banner.yellow().bold().to_string()
        } else {
            banner
        };
        let _ = writeln!(out, "{banner}\n");
    }

    render_header(&mut out, summary, options);
    render_cards(&mut out, summary);
    render_status_table(&mut out, summary);
    render_chart(&mut out, &state.chart(), options);
    render_issues(&mut out, state, options);

    out
}

fn heading(text: &str, options: RenderOptions) -> String {
    if options.color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn render_header(out: &mut String, summary: &Summary, options: RenderOptions) {
    let _ = writeln!(
        out,
        "{}",
        heading("Engineering Productivity Dashboard", options)
    );
    let _ = writeln!(out, "Snapshot of delivery health for the engineering team.");
    let _ = writeln!(out, "Project: {}\n", summary.project_label());
}

fn render_cards(out: &mut String, summary: &Summary) {
    let cards = summary.metric_cards();

    let titles: Vec<String> = cards.iter().map(|c| c.title.to_uppercase()).collect();
    let values: Vec<&str> = cards.iter().map(|c| c.value.as_str()).collect();
    let hints: Vec<&str> = cards.iter().map(|c| c.hint.as_str()).collect();

    for row in [
        titles.iter().map(String::as_str).collect::<Vec<_>>(),
        values,
        hints,
    ] {
        let line: String = row
            .iter()
            .map(|cell| pad_right(cell, CARD_WIDTH))
            .collect();
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out.push('\n');
}

fn render_status_table(out: &mut String, summary: &Summary) {
    let width = summary
        .status_counts
        .keys()
        .map(|status| status.width())
        .chain(std::iter::once("Status".len()))
        .max()
        .unwrap_or(0);

    let _ = writeln!(out, "Issue status breakdown");
    let _ = writeln!(out, "{}  {:>5}", pad_right("Status", width), "Count");
    for (status, count) in &summary.status_counts {
        let _ = writeln!(out, "{}  {count:>5}", pad_right(status, width));
    }
    out.push('\n');
}

fn bar_length(value: u64, max: u64) -> usize {
    if max == 0 {
        return 0;
    }
    let scaled = (u128::from(value) * u128::from(BAR_WIDTH)).div_ceil(u128::from(max));
    usize::try_from(scaled.min(u128::from(BAR_WIDTH))).unwrap_or(0)
}

fn paint(text: &str, color: Color, options: RenderOptions) -> String {
    if options.color {
        text.with(TermColor::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        })
        .to_string()
    } else {
        text.to_string()
    }
}

fn render_chart(out: &mut String, chart: &ChartSeries, options: RenderOptions) {
    let _ = writeln!(out, "{}", heading("Issue Status Breakdown", options));

    if !chart.has_data() {
        let _ = writeln!(out, "  {NO_CHART_DATA}\n");
        return;
    }

    let max = chart.max_value();
    let width = chart
        .labels
        .iter()
        .map(|label| label.width())
        .max()
        .unwrap_or(0);

    for ((label, value), color) in chart.labels.iter().zip(&chart.values).zip(&chart.colors) {
        let bar = "█".repeat(bar_length(*value, max));
        let _ = writeln!(
            out,
            "  {} {}  {value:>4} {}",
            paint("●", *color, options),
            pad_right(label, width),
            paint(&bar, *color, options)
        );
    }
    out.push('\n');
}

/// Shortens `text` to at most `max` terminal columns, ending in `…`.
fn truncate(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if text.width() <= max {
        return text.to_string();
    }

    let budget = max - 1;
    let mut width = 0;
    let mut kept = String::new();
    for c in text.chars() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + cw > budget {
            break;
        }
        width += cw;
        kept.push(c);
    }
    kept.push('…');
    kept
}

fn pad_right(text: &str, width: usize) -> String {
    format!("{text}{}", " ".repeat(width.saturating_sub(text.width())))
}

fn pad_left(text: &str, width: usize) -> String {
    format!("{}{text}", " ".repeat(width.saturating_sub(text.width())))
}

fn render_issues(out: &mut String, state: &DashboardState, options: RenderOptions) {
    let _ = writeln!(out, "{}", heading("Active Issues", options));
    let _ = writeln!(
        out,
        "Status: {}  Assignee: {}",
        state.selection.status, state.selection.assignee
    );

    let visible = state.visible_issues();
    let rows: Vec<[String; 5]> = visible.iter().map(issue_row).collect();

    let headers = ["Key", "Summary", "Status", "Assignee", "Cycle time (days)"];
    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let _ = writeln!(out, "{}", format_row(&headers.map(str::to_string), &widths));
    for row in &rows {
        let _ = writeln!(out, "{}", format_row(row, &widths));
    }

    if rows.is_empty() {
        let _ = writeln!(out, "  {NO_MATCHING_ISSUES}");
    }
}

fn issue_row(issue: &Issue) -> [String; 5] {
    [
        issue.key.clone(),
        truncate(&issue.summary, SUMMARY_WIDTH),
        issue.status.clone(),
        issue.assignee.clone(),
        format!("{}d", issue.cycle_time_days),
    ]
}

fn format_row(cells: &[String; 5], widths: &[usize; 5]) -> String {
    let [key, summary, status, assignee, cycle] = cells;
    format!(
        "{}  {}  {}  {}  {}",
        pad_right(key, widths[0]),
        pad_right(summary, widths[1]),
        pad_right(status, widths[2]),
        pad_right(assignee, widths[3]),
        pad_left(cycle, widths[4]),
    )
}
