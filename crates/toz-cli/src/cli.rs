use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use toz_core::{Field, Msg, Session, TozConfig, TozKind};

use crate::error::Result;
use crate::format::parse_number;
use crate::logging;
use crate::repl::{ReplOptions, run_repl};
use crate::report::{UpdateReport, render_inverse, render_update};

#[derive(Debug, Parser)]
#[command(
    name = "tozcalc",
    about = "Charik to Alt/Üst toz breakdown calculator",
    version
)]
pub struct Cli {
    /// Configuration file (.toml or .json).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit JSON instead of text tables.
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to stderr as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Both breakdowns for a charik count.
    Forward(ForwardArgs),

    /// Back-solve from one edited field of one breakdown.
    Inverse(InverseArgs),

    /// Interactive session reading commands from stdin.
    Repl,

    /// Print the effective configuration.
    Config,
}

#[derive(Debug, Clone, Args)]
pub struct ForwardArgs {
    /// Charik count; invalid numbers count as zero and are raised to the minimum.
    #[arg(short = 'n', long, allow_hyphen_values = true)]
    pub count: String,
}

#[derive(Debug, Clone, Args)]
pub struct InverseArgs {
    /// Breakdown kind: alt or ust.
    #[arg(short, long)]
    pub kind: TozKind,

    /// Edited field: first, second, third, fourth or total.
    #[arg(short, long)]
    pub field: Field,

    /// New value of the field.
    #[arg(long, allow_hyphen_values = true)]
    pub value: String,
}

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose, cli.log_json);
    let stdout = std::io::stdout();
    let interactive = std::io::stdin().is_terminal();
    execute(&cli, &mut stdout.lock(), interactive)
}

/// Run a parsed command against `out`.
///
/// For `repl`, input comes from stdin; `interactive` controls the prompt.
pub fn execute<W: Write>(cli: &Cli, out: &mut W, interactive: bool) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    tracing::info!(
        target: "toz.cli",
        command = ?cli.command,
        cross_refresh = ?config.session.cross_refresh,
        "running"
    );

    match &cli.command {
        Commands::Forward(args) => run_forward(&config, args, cli.json, out),
        Commands::Inverse(args) => run_inverse(&config, args, cli.json, out),
        Commands::Repl => {
            let mut session = Session::with_config(&config);
            let stdin = std::io::stdin();
            run_repl(
                &mut session,
                stdin.lock(),
                out,
                ReplOptions {
                    json: cli.json,
                    prompt: interactive && !cli.json,
                },
            )?;
            Ok(())
        }
        Commands::Config => print_config(&config, cli.json, out),
    }
}

/// Load and validate `path`, or fall back to the built-in configuration.
pub fn load_config(path: Option<&Path>) -> Result<TozConfig> {
    match path {
        Some(path) => {
            let config = TozConfig::load_validated(path)?;
            tracing::debug!(target: "toz.cli", path = %path.display(), "configuration loaded");
            Ok(config)
        }
        None => Ok(TozConfig::default()),
    }
}

pub fn run_forward<W: Write>(
    config: &TozConfig,
    args: &ForwardArgs,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let mut session = Session::with_config(config);
    let transition = session.update(Msg::SetUnitCount(parse_number(&args.count)));
    if json {
        let report = UpdateReport {
            transition: &transition,
            view: session.view(),
            inverse: None,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(out, "{}", render_update(&transition, &session))?;
    }
    Ok(())
}

pub fn run_inverse<W: Write>(
    config: &TozConfig,
    args: &InverseArgs,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let value = parse_number(&args.value);
    let inverse = config.profile(args.kind).inverse(args.field, value);

    let mut session = Session::with_config(config);
    let transition = session.update(Msg::Edit {
        kind: args.kind,
        field: args.field,
        value,
    });

    if json {
        let report = UpdateReport {
            transition: &transition,
            view: session.view(),
            inverse: Some(&inverse),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(out, "{}", render_inverse(args.kind, args.field, &inverse))?;
        writeln!(out)?;
        write!(out, "{}", render_update(&transition, &session))?;
    }
    Ok(())
}

pub fn print_config<W: Write>(config: &TozConfig, json: bool, out: &mut W) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(config)?)?;
    } else {
        write!(out, "{}", config.to_toml_string()?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use toz_core::CrossRefresh;

    use super::*;
    use crate::error::CliError;

    fn cli(command: Commands, json: bool, config: Option<PathBuf>) -> Cli {
        Cli {
            config,
            json,
            verbose: 0,
            log_json: false,
            command,
        }
    }

    fn output(cli: &Cli) -> Result<String> {
        let mut out = Vec::new();
        execute(cli, &mut out, false)?;
        Ok(String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn forward_command_prints_table() {
        let text = output(&cli(
            Commands::Forward(ForwardArgs {
                count: "2".to_string(),
            }),
            false,
            None,
        ))
        .unwrap();
        assert!(text.starts_with("Chariks: 2\n"));
        assert!(text.contains("242.00"));
        assert!(text.contains("94.38"));
    }

    #[test]
    fn forward_command_clamps_invalid_count() {
        let text = output(&cli(
            Commands::Forward(ForwardArgs {
                count: "-4".to_string(),
            }),
            true,
            None,
        ))
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["transition"]["clamped"], true);
        assert_eq!(json["view"]["unit_count"], 1.0);
        assert_eq!(json["view"]["ust"]["total"], 45.0);
    }

    #[test]
    fn inverse_command_reports_implied_count() {
        let text = output(&cli(
            Commands::Inverse(InverseArgs {
                kind: TozKind::Alt,
                field: Field::Second,
                value: "78".to_string(),
            }),
            true,
            None,
        ))
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        let implied = json["inverse"]["implied_unit_count"].as_f64().unwrap();
        assert!((implied - 1.6529).abs() < 1e-4);
        let total = json["view"]["alt"]["total"].as_f64().unwrap();
        assert!((total - 200.0).abs() < 1e-9);
        assert_eq!(json["transition"]["propagated"], true);
    }

    #[test]
    fn inverse_command_text_includes_both_sections() {
        let text = output(&cli(
            Commands::Inverse(InverseArgs {
                kind: TozKind::Ust,
                field: Field::Total,
                value: "0".to_string(),
            }),
            false,
            None,
        ))
        .unwrap();
        assert!(text.contains("Üst Toz from total"));
        assert!(text.contains("Implied chariks: 0"));
        assert!(text.contains("raised to minimum 1"));
    }

    #[test]
    fn config_command_prints_toml() {
        let text = output(&cli(Commands::Config, false, None)).unwrap();
        let parsed = TozConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, TozConfig::default());
    }

    #[test]
    fn config_file_switches_cross_refresh() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("tozcalc.toml");
        std::fs::write(&path, "[session]\ncross_refresh = \"parity\"\n").expect("write");

        let text = output(&cli(
            Commands::Inverse(InverseArgs {
                kind: TozKind::Alt,
                field: Field::Total,
                value: "242".to_string(),
            }),
            true,
            Some(path.clone()),
        ))
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["transition"]["propagated"], false);
        assert_eq!(json["view"]["ust"]["total"], 45.0);

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.session.cross_refresh, CrossRefresh::Parity);
    }

    #[test]
    fn invalid_config_file_is_a_config_error() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("tozcalc.toml");
        std::fs::write(&path, "[session]\nmin_unit_count = -1.0\ninitial_unit_count = 1.0\n")
            .expect("write");

        let error = output(&cli(Commands::Config, false, Some(path))).unwrap_err();
        assert!(matches!(error, CliError::Config(_)));
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn clap_parses_inverse_arguments() {
        let parsed = Cli::try_parse_from([
            "tozcalc", "--json", "inverse", "--kind", "ust", "--field", "second", "--value", "54",
        ])
        .unwrap();
        assert!(parsed.json);
        match parsed.command {
            Commands::Inverse(args) => {
                assert_eq!(args.kind, TozKind::Ust);
                assert_eq!(args.field, Field::Second);
                assert_eq!(args.value, "54");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn clap_accepts_negative_count() {
        let parsed = Cli::try_parse_from(["tozcalc", "forward", "-n", "-3"]).unwrap();
        match parsed.command {
            Commands::Forward(args) => assert_eq!(args.count, "-3"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn clap_rejects_unknown_kind() {
        let result = Cli::try_parse_from([
            "tozcalc", "inverse", "--kind", "middle", "--field", "first", "--value", "1",
        ]);
        assert!(result.is_err());
    }
}
