//! Command line shell: hosts a session the way the task page would and prints the results.

pub mod script;

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use owo_colors::OwoColorize;

use crate::app::palette::Palette;
use crate::app::params::Language;
use crate::app::report::{Renderer, ReportStyle};
use crate::app::review::review_file;
use crate::app::session::Session;
use crate::app::validation::Validator;
use crate::infra::config::Config;
use crate::infra::logging;

use self::script::ReplayScript;

#[derive(Debug, Parser)]
#[command(
    name = "spanlink",
    author,
    version,
    about = "Link spans of a translated sentence to the entities of its source sentence"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Read configuration from this file instead of the layered defaults.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the canned demonstration task for a language.
    Preview {
        #[arg(long, short)]
        language: Option<Language>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run a replay script (JSON or YAML) of translator events.
    Replay {
        script: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Summarize submitted answer payloads.
    Review { answers: PathBuf },
    /// List supported target languages.
    Languages,
    /// Print shell completions.
    Completions { shell: Shell },
}

#[derive(Debug, Clone, Copy, clap::Args)]
pub struct OutputArgs {
    /// Print the answer payload instead of the report.
    #[arg(long, conflicts_with = "compact")]
    pub json: bool,
    /// One line per translation span.
    #[arg(long)]
    pub compact: bool,
}

impl OutputArgs {
    fn style(&self) -> ReportStyle {
        if self.compact {
            ReportStyle::Compact
        } else {
            ReportStyle::Full
        }
    }
}

/// Parse arguments, set up logging, and dispatch.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Preview { language, output } => {
            let config = load_config(cli.config.as_deref())?;
            let mut params = config.session_params()?;
            if let Some(language) = language {
                params.language = language;
            }
            let session = Session::preview(params)
                .with_validator(Validator::new(config.validation.options()));
            print_session(&mut out, &session, config.palette.palette()?, output)
        }
        Command::Replay { script, output } => {
            let config = load_config(cli.config.as_deref())?;
            let session = ReplayScript::from_path(&script)?
                .run(config.session_params()?)?
                .with_validator(Validator::new(config.validation.options()));
            print_session(&mut out, &session, config.palette.palette()?, output)?;
            if !output.json {
                print_submission(&mut out, &session)?;
            }
            Ok(())
        }
        Command::Review { answers } => print_review(&mut out, &answers),
        Command::Languages => {
            for language in Language::all() {
                writeln!(out, "{}\t{}", language.code(), language.label())?;
            }
            Ok(())
        }
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "spanlink", &mut out);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    };
    config.context("failed to load configuration")
}

fn print_session(
    out: &mut impl Write,
    session: &Session,
    palette: Palette,
    output: OutputArgs,
) -> Result<()> {
    if output.json {
        writeln!(out, "{}", session.answer_json()?)?;
        return Ok(());
    }

    if output.style() == ReportStyle::Full && io::stdout().is_terminal() {
        writeln!(out, "{}", highlighted(session, &palette))?;
    }
    let renderer = Renderer::new(palette)?;
    write!(out, "{}", renderer.render(session, output.style())?)?;
    Ok(())
}

/// The translation with each tagged span on its palette color.
fn highlighted(session: &Session, palette: &Palette) -> String {
    session
        .spans()
        .iter()
        .map(|span| match palette.tag_color(span.tag) {
            Some(color) => {
                let (r, g, b) = color.channels();
                span.text.on_truecolor(r, g, b).to_string()
            }
            None => span.text.clone(),
        })
        .collect()
}

fn print_submission(out: &mut impl Write, session: &Session) -> Result<()> {
    match session.submission() {
        Ok(submission) => {
            writeln!(out, "Submit to: {}", submission.action)?;
            for (name, value) in &submission.fields {
                writeln!(out, "  {name} = {value}")?;
            }
        }
        Err(err) => writeln!(out, "Submission unavailable: {err}")?,
    }
    Ok(())
}

fn print_review(out: &mut impl Write, path: &Path) -> Result<()> {
    let answers = review_file(path)?;
    for (index, answer) in answers.iter().enumerate() {
        writeln!(out, "{}. \"{}\"", index + 1, answer.translation)?;
        for link in &answer.links {
            writeln!(out, "   {} -> \"{}\"", link.alias, link.text)?;
        }
    }
    Ok(())
}
