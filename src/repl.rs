use log::info;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::dashboard::{Action, Dashboard};
use crate::error::Result;
use crate::render::{render, RenderOptions};
use crate::view::Filter;

const HELP: &str = "\
Commands:
  r, refresh            reload data from the backend
  s, status <value>     filter by status (\"All\" clears)
  a, assignee <value>   filter by assignee (\"All\" clears)
  h, help               show this help
  q, quit               exit
";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Refresh,
    Status(Filter),
    Assignee(Filter),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim()),
            None => (line, ""),
        };

        match (verb, arg) {
            ("", _) => Self::Empty,
            ("r" | "refresh", "") => Self::Refresh,
            ("h" | "help", "") => Self::Help,
            ("q" | "quit" | "exit", "") => Self::Quit,
            ("s" | "status", value) if !value.is_empty() => Self::Status(Filter::parse(value)),
            ("a" | "assignee", value) if !value.is_empty() => Self::Assignee(Filter::parse(value)),
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// Runs the line-driven session until `quit` or end of input.
pub async fn run<R, W>(
    dashboard: &mut Dashboard,
    input: R,
    output: &mut W,
    options: RenderOptions,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    dashboard.refresh().await;
    write_screen(output, &render(dashboard.state(), options)).await?;
    prompt(output).await?;

    while let Some(line) = lines.next_line().await? {
        let screen = match Command::parse(&line) {
            Command::Quit => break,
            Command::Empty => None,
            Command::Help => Some(HELP.to_string()),
            Command::Unknown(input) => Some(format!("Unknown command '{input}'. Type 'help'.\n")),
            Command::Refresh => {
                info!("Refreshing dashboard");
                dashboard.refresh().await;
                Some(render(dashboard.state(), options))
            }
            Command::Status(filter) => {
                dashboard.dispatch(Action::SelectStatus(filter));
                Some(render(dashboard.state(), options))
            }
            Command::Assignee(filter) => {
                dashboard.dispatch(Action::SelectAssignee(filter));
                Some(render(dashboard.state(), options))
            }
        };

        if let Some(screen) = screen {
            write_screen(output, &screen).await?;
        }
        prompt(output).await?;
    }

    Ok(())
}

async fn write_screen<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.write_all(b"\n").await?;
    Ok(())
}

async fn prompt<W: AsyncWrite + Unpin>(out: &mut W) -> Result<()> {
    out.write_all(b"> ").await?;
    out.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::render::NO_MATCHING_ISSUES;
    use crate::source::DataSource;

    #[test]
    fn test_parse_refresh_aliases() {
        assert_eq!(Command::parse("r"), Command::Refresh);
        assert_eq!(Command::parse("  refresh  "), Command::Refresh);
    }

    #[test]
    fn test_parse_status_keeps_multiword_value() {
        assert_eq!(
            Command::parse("status Code Review"),
            Command::Status(Filter::Only("Code Review".to_string()))
        );
    }

    #[test]
    fn test_parse_assignee_all_clears_filter() {
        assert_eq!(Command::parse("a All"), Command::Assignee(Filter::All));
    }

    #[test]
    fn test_parse_filter_without_value_is_unknown() {
        assert_eq!(Command::parse("s"), Command::Unknown("s".to_string()));
    }

    #[test]
    fn test_parse_quit_and_help() {
        assert_eq!(Command::parse("q"), Command::Quit);
        assert_eq!(Command::parse("exit"), Command::Quit);
        assert_eq!(Command::parse("help"), Command::Help);
    }

    #[test]
    fn test_parse_blank_line_is_empty() {
        assert_eq!(Command::parse("   "), Command::Empty);
    }

    #[test]
    fn test_parse_refresh_with_argument_is_unknown() {
        assert_eq!(
            Command::parse("refresh now"),
            Command::Unknown("refresh now".to_string())
        );
    }

    #[tokio::test]
    async fn test_write_screen_appends_newline() {
        let mut buf: Vec<u8> = Vec::new();

        write_screen(&mut buf, "hello").await.unwrap();
        prompt(&mut buf).await.unwrap();

        assert_eq!(String::from_utf8(buf).unwrap(), "hello\n> ");
    }

    fn offline_dashboard() -> Dashboard {
        let config = Config::new("http://127.0.0.1:1", None).unwrap();
        Dashboard::new(DataSource::new(&config).unwrap())
    }

    #[tokio::test]
    async fn test_run_applies_scripted_commands() {
        let mut dashboard = offline_dashboard();
        let input: &[u8] = b"s Done\na Jose Gomez\nbogus\nq\nr\n";
        let mut output: Vec<u8> = Vec::new();

        run(&mut dashboard, input, &mut output, RenderOptions { color: false })
            .await
            .unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.starts_with("! Backend API not reachable. Showing demo data."));
        assert!(text.contains("Status: Done  Assignee: All"));
        assert!(text.contains("Status: Done  Assignee: Jose Gomez"));
        assert!(text.contains(NO_MATCHING_ISSUES));
        assert!(text.contains("Unknown command 'bogus'. Type 'help'."));
        assert!(text.ends_with("> "));
        assert_eq!(text.matches("> ").count(), 4);
        assert_eq!(dashboard.state().selection.status, Filter::parse("Done"));
        assert_eq!(dashboard.state().selection.assignee, Filter::parse("Jose Gomez"));
    }

    #[tokio::test]
    async fn test_run_stops_at_end_of_input() {
        let mut dashboard = offline_dashboard();
        let input: &[u8] = b"help\n\n";
        let mut output: Vec<u8> = Vec::new();

        run(&mut dashboard, input, &mut output, RenderOptions { color: false })
            .await
            .unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.contains("Commands:"));
        assert!(text.ends_with("\n> > "));
        assert!(dashboard.state().summary.is_some());
    }
}
