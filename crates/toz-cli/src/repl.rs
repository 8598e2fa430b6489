//! Line-oriented interactive session.
//!
//! Each confirmed line is one user action. Commands:
//!
//! ```text
//! count <n>                      set the charik count
//! edit <kind> <field> <value>    edit one field (alias: set)
//! reset                          back to the initial count
//! show                           print the current state
//! help                           list commands
//! quit | exit                    leave
//! ```
//!
//! Unparseable numbers are passed through as NaN and end up as zero, the
//! same as an empty form field. Unknown commands print a hint and the
//! session keeps going.

use std::io::{BufRead, Write};

use toz_core::{Field, Msg, Session, TozKind};

use crate::error::{CliError, Result};
use crate::format::parse_number;
use crate::report::{UpdateReport, render_update, render_view};

const HELP: &str = "\
commands:
  count <n>                    set the charik count
  edit <kind> <field> <value>  kind: alt|ust, field: first|second|third|fourth|total
  reset                        back to the initial count
  show                         print the current state
  quit                         leave the session
";

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Apply(Msg),
    Show,
    Help,
    Quit,
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    if head.starts_with('#') {
        return Ok(None);
    }
    let args: Vec<&str> = words.collect();

    let command = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("count" | "n", [value]) => Command::Apply(Msg::SetUnitCount(parse_number(value))),
        ("edit" | "set", [kind, field, value]) => {
            let kind: TozKind = kind.parse().map_err(|e| CliError::invalid(format!("{e}")))?;
            let field: Field = field.parse().map_err(|e| CliError::invalid(format!("{e}")))?;
            Command::Apply(Msg::Edit {
                kind,
                field,
                value: parse_number(value),
            })
        }
        ("reset", []) => Command::Apply(Msg::Reset),
        ("show", []) => Command::Show,
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit" | "q", []) => Command::Quit,
        (
            "count" | "n" | "edit" | "set" | "reset" | "show" | "help" | "?" | "quit" | "exit"
            | "q",
            _,
        ) => {
            return Err(CliError::invalid(format!(
                "wrong number of arguments for `{head}` (try `help`)"
            )));
        }
        _ => {
            return Err(CliError::invalid(format!(
                "unknown command `{head}` (try `help`)"
            )));
        }
    };
    Ok(Some(command))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReplOptions {
    pub json: bool,
    pub prompt: bool,
}

/// Counters reported when the session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplSummary {
    pub applied: usize,
    pub rejected: usize,
}

/// Drive `session` from `input` until EOF or `quit`.
pub fn run_repl<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    mut output: W,
    options: ReplOptions,
) -> Result<ReplSummary> {
    let mut summary = ReplSummary::default();

    if !options.json {
        write!(output, "{}", render_view(&session.view()))?;
    }
    prompt(&mut output, options)?;

    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => write!(output, "{HELP}")?,
            Ok(Some(Command::Show)) => {
                if options.json {
                    writeln!(output, "{}", serde_json::to_string(&session.view())?)?;
                } else {
                    write!(output, "{}", render_view(&session.view()))?;
                }
            }
            Ok(Some(Command::Apply(msg))) => {
                let transition = session.update(msg);
                summary.applied += 1;
                if options.json {
                    let report = UpdateReport {
                        transition: &transition,
                        view: session.view(),
                        inverse: None,
                    };
                    writeln!(output, "{}", serde_json::to_string(&report)?)?;
                } else {
                    write!(output, "{}", render_update(&transition, session))?;
                }
            }
            Err(error) => {
                summary.rejected += 1;
                tracing::debug!(target: "toz.repl", %error, line = %line, "rejected input");
                if options.json {
                    writeln!(
                        output,
                        "{}",
                        serde_json::json!({ "status": "error", "error": error.to_string() })
                    )?;
                } else {
                    writeln!(output, "error: {error}")?;
                }
            }
        }
        prompt(&mut output, options)?;
    }

    output.flush()?;
    tracing::info!(
        target: "toz.repl",
        applied = summary.applied,
        rejected = summary.rejected,
        "session closed"
    );
    Ok(summary)
}

fn prompt<W: Write>(output: &mut W, options: ReplOptions) -> Result<()> {
    if options.prompt {
        write!(output, "toz> ")?;
        output.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str, json: bool) -> (Session, ReplSummary, String) {
        let mut session = Session::new();
        let mut out = Vec::new();
        let summary = run_repl(
            &mut session,
            script.as_bytes(),
            &mut out,
            ReplOptions {
                json,
                prompt: false,
            },
        )
        .unwrap();
        (session, summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parse_count_and_edit() {
        assert_eq!(
            parse_command("count 3").unwrap(),
            Some(Command::Apply(Msg::SetUnitCount(3.0)))
        );
        assert_eq!(
            parse_command("  EDIT üst total 90 ").unwrap(),
            Some(Command::Apply(Msg::Edit {
                kind: TozKind::Ust,
                field: Field::Total,
                value: 90.0,
            }))
        );
    }

    #[test]
    fn parse_blank_and_comment_lines() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("# note").unwrap(), None);
    }

    #[test]
    fn parse_garbage_number_becomes_nan() {
        let Some(Command::Apply(Msg::SetUnitCount(value))) = parse_command("count abc").unwrap()
        else {
            panic!("expected count command");
        };
        assert!(value.is_nan());
    }

    #[test]
    fn parse_rejects_unknown_kind_and_arity() {
        let err = parse_command("edit middle first 1").unwrap_err();
        assert!(err.to_string().contains("middle"));
        let err = parse_command("count").unwrap_err();
        assert!(err.to_string().contains("wrong number of arguments"));
        let err = parse_command("frobnicate").unwrap_err();
        assert!(err.to_string().contains("unknown command"));
    }

    #[test]
    fn short_aliases_report_wrong_arity() {
        for line in ["q now", "? edit"] {
            let err = parse_command(line).unwrap_err();
            assert!(
                err.to_string().contains("wrong number of arguments"),
                "{line}: {err}"
            );
        }
    }

    #[test]
    fn script_applies_messages_in_order() {
        let (session, summary, out) = run("count 2\nedit alt second 78\n", false);
        assert_eq!(summary.applied, 2);
        assert_eq!(summary.rejected, 0);
        assert!((session.unit_count() - 200.0 / 121.0).abs() < 1e-12);
        assert!(out.contains("Chariks: 1.6529"));
        assert!(out.contains("78.00"));
    }

    #[test]
    fn quit_stops_reading() {
        let (session, summary, _) = run("count 5\nquit\ncount 9\n", false);
        assert_eq!(summary.applied, 1);
        assert_eq!(session.unit_count(), 5.0);
    }

    #[test]
    fn bad_lines_are_reported_and_skipped() {
        let (session, summary, out) = run("bogus\ncount 3\n", false);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.applied, 1);
        assert!(out.contains("error: invalid argument: unknown command `bogus`"));
        assert_eq!(session.unit_count(), 3.0);
    }

    #[test]
    fn json_mode_emits_one_line_per_message() {
        let (_, _, out) = run("count 2\nreset\nshow\n", true);
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["transition"]["driver"], "unit_count");
        assert_eq!(lines[0]["view"]["alt"]["total"], 242.0);
        assert_eq!(lines[1]["transition"]["driver"], "reset");
        assert_eq!(lines[2]["unit_count"], 1.0);
    }

    #[test]
    fn prompt_is_written_when_enabled() {
        let mut session = Session::new();
        let mut out = Vec::new();
        run_repl(
            &mut session,
            "show\n".as_bytes(),
            &mut out,
            ReplOptions {
                json: true,
                prompt: true,
            },
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("toz> ").count(), 2);
    }
}
