//! Routing an invocation to exactly one outcome
//!
//! The guard clauses run in a fixed order before clap sees the arguments:
//! empty invocation, unknown first token, version anywhere, top-level help.
//! Only then is the matched subcommand parsed against its declared options.
//! Collaborators are only needed for `Version` and `Dispatched` outcomes;
//! [`run_with`] builds them lazily so help and usage errors never depend on
//! settings loading.

use std::ffi::OsStr;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use tracing::{debug, instrument};

use crate::cli::actions::Actions;
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::cli::registry::{self, Action, CommandSpec, SUB_ACTION};
use crate::domain::commands::HELP_TOKENS;
use crate::domain::{
    includes_version, is_known_command, CacheAction, Command, DomainError, OptionBag, UnknownKind,
};
use crate::exitcode;
use crate::infrastructure::traits::Console;

/// What an invocation resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this help text to stdout and exit 0.
    Help(String),
    /// Resolve and print versions.
    Version,
    /// First token is not a known command.
    UnknownCommand { name: String, help: String },
    /// Grammar violation inside a known subcommand.
    Usage { error: DomainError, help: String },
    /// Call one collaborator with normalized options.
    Dispatched(Command, OptionBag),
}

impl Outcome {
    /// True if carrying out this outcome calls a collaborator.
    pub fn needs_actions(&self) -> bool {
        matches!(self, Outcome::Version | Outcome::Dispatched(..))
    }
}

/// Decide what to do with `args` (program name first).
///
/// Pure: nothing is printed and no collaborator is called. Tokens that are
/// not valid UTF-8 are converted lossily.
#[instrument(skip_all)]
pub fn route<S: AsRef<OsStr>>(args: &[S]) -> Outcome {
    let args: Vec<String> = args
        .iter()
        .map(|a| a.as_ref().to_string_lossy().into_owned())
        .collect();
    debug!("cli starts with arguments {:?}", args);
    let mut root = registry::root_command();

    let Some(first) = args.get(1) else {
        debug!("printing help");
        return Outcome::Help(registry::program_help(&mut root));
    };

    if !is_known_command(first) {
        debug!("unknown command {}", first);
        return Outcome::UnknownCommand {
            name: first.clone(),
            help: registry::program_help(&mut root),
        };
    }

    // Pre-empt the parser: a top-level -v combined with a `version`
    // subcommand is not parsed consistently across parser versions.
    if includes_version(&args[1..]) {
        return Outcome::Version;
    }

    if HELP_TOKENS.contains(&first.as_str()) {
        return Outcome::Help(registry::program_help(&mut root));
    }

    debug!("program parsing arguments");
    let matches = match root.try_get_matches_from_mut(&args) {
        Ok(m) => m,
        Err(err) => return usage_outcome(err, &mut root, first),
    };

    let Some((name, sub_matches)) = matches.subcommand() else {
        return Outcome::Help(registry::program_help(&mut root));
    };
    let Some(spec) = registry::find(name) else {
        return Outcome::UnknownCommand {
            name: name.to_string(),
            help: registry::program_help(&mut root),
        };
    };

    dispatch(spec, sub_matches, &mut root)
}

fn dispatch(spec: &CommandSpec, matches: &clap::ArgMatches, root: &mut clap::Command) -> Outcome {
    let command = match spec.action {
        Action::Help => return Outcome::Help(registry::program_help(root)),
        Action::Version => return Outcome::Version,
        Action::Run => Command::Run,
        Action::Open => Command::Open,
        Action::Install => Command::Install,
        Action::Verify => Command::Verify,
        Action::Cache => {
            let tokens: Vec<&str> = matches
                .get_many::<String>(SUB_ACTION)
                .map(|v| v.map(String::as_str).collect())
                .unwrap_or_default();
            let joined = tokens.join(" ");
            let action = CacheAction::parse_token((!tokens.is_empty()).then_some(joined.as_str()));
            return match action {
                Ok(action) => Outcome::Dispatched(Command::Cache(action), OptionBag::default()),
                Err(error) => Outcome::Usage {
                    error,
                    help: registry::command_help(root, spec.name),
                },
            };
        }
    };

    let mut options = OptionBag::from_parsed(spec.parsed_options(matches));
    if command == Command::Verify {
        options.set("force", true);
    }
    Outcome::Dispatched(command, options)
}

/// Map a clap failure inside subcommand `name` onto an outcome.
fn usage_outcome(err: clap::Error, root: &mut clap::Command, name: &str) -> Outcome {
    let help = registry::command_help(root, name);
    match err.kind() {
        ErrorKind::DisplayHelp => Outcome::Help(help),
        ErrorKind::UnknownArgument | ErrorKind::InvalidSubcommand => {
            let flag = match err.get(ContextKind::InvalidArg) {
                Some(ContextValue::String(s)) => s.clone(),
                _ => String::new(),
            };
            Outcome::Usage {
                error: DomainError::UnknownOption {
                    kind: UnknownKind::Option,
                    flag,
                },
                help,
            }
        }
        _ => {
            let message = err.to_string();
            Outcome::Usage {
                error: DomainError::InvalidArgs(first_line(&message).to_string()),
                help,
            }
        }
    }
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or_default().trim_end()
}

/// Carries out an [`Outcome`] and yields the exit code.
pub struct Dispatcher<'a> {
    actions: &'a dyn Actions,
    console: &'a dyn Console,
}

impl<'a> Dispatcher<'a> {
    pub fn new(actions: &'a dyn Actions, console: &'a dyn Console) -> Self {
        Self { actions, console }
    }

    /// Route and execute; the return value is the process exit code.
    pub fn run<S: AsRef<OsStr>>(&self, args: &[S]) -> i32 {
        let outcome = route(args);
        self.execute(outcome)
    }

    pub fn execute(&self, outcome: Outcome) -> i32 {
        match outcome {
            Outcome::Version => self.show_versions(),
            Outcome::Dispatched(command, options) => self.dispatch(command, &options),
            local => answer_locally(local, self.console),
        }
    }

    fn show_versions(&self) -> i32 {
        debug!("printing Cypress version");
        match self.actions.versions() {
            Ok(versions) => {
                self.console
                    .out(&format!("Cypress package version: {}", versions.package));
                self.console
                    .out(&format!("Cypress binary version: {}", versions.binary));
                exitcode::OK
            }
            Err(e) => self.fail(&e),
        }
    }

    #[instrument(skip(self, options))]
    fn dispatch(&self, command: Command, options: &OptionBag) -> i32 {
        debug!("dispatching {} with {:?}", command, options);
        let result = match command {
            Command::Run => self.actions.run(options).map(|code| code.unwrap_or(exitcode::OK)),
            Command::Open => self.actions.open(options).map(|_| exitcode::OK),
            Command::Install => self.actions.install(options).map(|_| exitcode::OK),
            Command::Verify => self.actions.verify(options, false).map(|_| exitcode::OK),
            Command::Cache(action) => self.actions.cache(action).map(|_| exitcode::OK),
        };
        result.unwrap_or_else(|e| self.fail(&e))
    }

    fn fail(&self, error: &dyn std::error::Error) -> i32 {
        self.console.err(&error.to_string());
        exitcode::FAILURE
    }
}

/// Print an outcome that needs no collaborator.
fn answer_locally(outcome: Outcome, console: &dyn Console) -> i32 {
    match outcome {
        Outcome::Help(help) => {
            console.out(help.trim_end());
            exitcode::OK
        }
        Outcome::UnknownCommand { name, help } => {
            console.err(&DomainError::UnknownCommand(name).to_string());
            console.err(help.trim_end());
            exitcode::FAILURE
        }
        Outcome::Usage { error, help } => {
            if let DomainError::UnknownOption { .. } = error {
                console.err("");
                console.err(&format!("  {}", error));
                console.err("");
                console.err(help.trim_end());
                console.err("");
            } else {
                console.err(&error.to_string());
                console.err("");
                console.err(help.trim_end());
            }
            exitcode::FAILURE
        }
        Outcome::Version | Outcome::Dispatched(..) => {
            debug!("outcome needs a collaborator: {:?}", outcome);
            exitcode::FAILURE
        }
    }
}

/// Route `args`, building the collaborators only if the outcome calls one.
///
/// A failure to build them (e.g. a malformed config file) is reported on
/// `console` and exits with its code; help and usage errors are unaffected.
pub fn run_with<S, A, F>(args: &[S], console: &dyn Console, build: F) -> i32
where
    S: AsRef<OsStr>,
    A: Actions,
    F: FnOnce() -> CliResult<A>,
{
    let outcome = route(args);
    if !outcome.needs_actions() {
        return answer_locally(outcome, console);
    }
    match build() {
        Ok(actions) => Dispatcher::new(&actions, console).execute(outcome),
        Err(e) => {
            console.err(&output::error(&e));
            e.exit_code()
        }
    }
}
