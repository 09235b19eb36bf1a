//! Static command registry and its clap rendition
//!
//! Each [`CommandSpec`] lists the only options its subcommand accepts. The
//! clap `Command` tree is built from this table, never the other way round.

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::domain::{coerce_false, OptionValue, ParsedOptions};

/// Program name shown in usage lines.
pub const PROGRAM: &str = "cypress";

/// Arg id of the positional sub-action list (`cache <command>`).
pub const SUB_ACTION: &str = "subAction";

/// How an option takes its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// `--headed`: present means true.
    Flag,
    /// `-k, --key <record-key>`: exactly one value.
    Value(&'static str),
    /// `--record [bool]`: optional value, coerced with [`coerce_false`].
    OptionalBool,
    /// `--no-exit`: key defaults to true, the flag turns it off.
    Negated,
    /// `cache list`: a positional token selecting one exclusive action.
    SubAction,
}

/// One declared option of a subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    /// Key in the parsed options (camelCase).
    pub key: &'static str,
    pub short: Option<char>,
    /// Long flag without dashes, or the sub-action token.
    pub long: &'static str,
    pub arity: Arity,
    pub description: &'static str,
}

/// Collaborator entry point a subcommand routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Help,
    Version,
    Run,
    Open,
    Install,
    Verify,
    Cache,
}

/// A recognized subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: Option<&'static str>,
    pub about: &'static str,
    pub options: &'static [OptionSpec],
    pub action: Action,
}

mod text {
    pub const RECORD: &str =
        "records the run. sends test results, screenshots and videos to your Cypress Dashboard.";
    pub const KEY: &str =
        "your secret Record Key. you can omit this if you set a CYPRESS_RECORD_KEY environment variable.";
    pub const SPEC: &str = "runs a specific spec file. defaults to \"all\"";
    pub const REPORTER: &str =
        "runs a specific mocha reporter. pass a path to use a custom reporter. defaults to \"spec\"";
    pub const REPORTER_OPTIONS: &str = "options for the mocha reporter. defaults to \"null\"";
    pub const PORT: &str = "runs Cypress on a specific port. overrides any value in cypress.json.";
    pub const ENV: &str = "sets environment variables. separate multiple values with a comma. overrides any value in cypress.json or cypress.env.json";
    pub const CONFIG: &str = "sets configuration values. separate multiple values with a comma. overrides any value in cypress.json.";
    pub const BROWSER: &str = "runs Cypress in the browser with the given name. note: using an external browser will not record a video.";
    pub const DETACHED: &str = "runs Cypress application in detached mode";
    pub const PROJECT: &str = "path to the project";
    pub const GLOBAL: &str = "force Cypress into global mode as if its globally installed";
    pub const VERSION: &str = "prints Cypress version";
    pub const HEADED: &str = "displays the Electron browser instead of running headlessly";
    pub const DEV: &str = "runs cypress in development and bypasses binary check";
    pub const FORCE_INSTALL: &str = "force install the Cypress binary";
    pub const EXIT: &str = "keep the browser open after tests finish";
    pub const CACHE_PATH: &str = "print the cypress binary cache path";
    pub const CACHE_LIST: &str = "list the currently cached versions";
    pub const CACHE_CLEAR: &str = "delete the Cypress binary cache";
    pub const GROUP: &str = "a named group for recorded runs in the Cypress dashboard";
    pub const PARALLEL: &str = "enables concurrent runs and automatic load balancing of specs across multiple machines or processes";
    pub const CI_BUILD_ID: &str = "the unique identifier for a run on your CI provider. typically a \"BUILD_ID\" env var. this value is automatically detected for most CI providers";
}

const fn opt(
    key: &'static str,
    short: Option<char>,
    long: &'static str,
    arity: Arity,
    description: &'static str,
) -> OptionSpec {
    OptionSpec {
        key,
        short,
        long,
        arity,
        description,
    }
}

const RUN_OPTIONS: &[OptionSpec] = &[
    opt("record", None, "record", Arity::OptionalBool, text::RECORD),
    opt("headed", None, "headed", Arity::Flag, text::HEADED),
    opt("key", Some('k'), "key", Arity::Value("record-key"), text::KEY),
    opt("spec", Some('s'), "spec", Arity::Value("spec"), text::SPEC),
    opt("reporter", Some('r'), "reporter", Arity::Value("reporter"), text::REPORTER),
    opt(
        "reporterOptions",
        Some('o'),
        "reporter-options",
        Arity::Value("reporter-options"),
        text::REPORTER_OPTIONS,
    ),
    opt("port", Some('p'), "port", Arity::Value("port"), text::PORT),
    opt("env", Some('e'), "env", Arity::Value("env"), text::ENV),
    opt("config", Some('c'), "config", Arity::Value("config"), text::CONFIG),
    opt("browser", Some('b'), "browser", Arity::Value("browser-name"), text::BROWSER),
    opt("project", Some('P'), "project", Arity::Value("project-path"), text::PROJECT),
    opt("parallel", None, "parallel", Arity::Flag, text::PARALLEL),
    opt("group", None, "group", Arity::Value("name"), text::GROUP),
    opt("ciBuildId", None, "ci-build-id", Arity::Value("id"), text::CI_BUILD_ID),
    opt("exit", None, "no-exit", Arity::Negated, text::EXIT),
    opt("dev", None, "dev", Arity::OptionalBool, text::DEV),
];

const OPEN_OPTIONS: &[OptionSpec] = &[
    opt("port", Some('p'), "port", Arity::Value("port"), text::PORT),
    opt("env", Some('e'), "env", Arity::Value("env"), text::ENV),
    opt("config", Some('c'), "config", Arity::Value("config"), text::CONFIG),
    opt("detached", Some('d'), "detached", Arity::OptionalBool, text::DETACHED),
    opt("project", Some('P'), "project", Arity::Value("project path"), text::PROJECT),
    opt("global", None, "global", Arity::Flag, text::GLOBAL),
    opt("dev", None, "dev", Arity::OptionalBool, text::DEV),
];

const INSTALL_OPTIONS: &[OptionSpec] = &[opt(
    "force",
    Some('f'),
    "force",
    Arity::Flag,
    text::FORCE_INSTALL,
)];

const CACHE_OPTIONS: &[OptionSpec] = &[
    opt("cacheList", None, "list", Arity::SubAction, text::CACHE_LIST),
    opt("cachePath", None, "path", Arity::SubAction, text::CACHE_PATH),
    opt("cacheClear", None, "clear", Arity::SubAction, text::CACHE_CLEAR),
];

/// Every subcommand, in help order.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "help",
        usage: None,
        about: "Shows CLI help and exits",
        options: &[],
        action: Action::Help,
    },
    CommandSpec {
        name: "version",
        usage: None,
        about: text::VERSION,
        options: &[],
        action: Action::Version,
    },
    CommandSpec {
        name: "run",
        usage: Some("[options]"),
        about: "Runs Cypress tests from the CLI without the GUI",
        options: RUN_OPTIONS,
        action: Action::Run,
    },
    CommandSpec {
        name: "open",
        usage: Some("[options]"),
        about: "Opens Cypress in the interactive GUI.",
        options: OPEN_OPTIONS,
        action: Action::Open,
    },
    CommandSpec {
        name: "install",
        usage: Some("[options]"),
        about: "Installs the Cypress executable matching this package's version",
        options: INSTALL_OPTIONS,
        action: Action::Install,
    },
    CommandSpec {
        name: "verify",
        usage: Some("[options]"),
        about: "Verifies that Cypress is installed correctly and executable",
        options: &[],
        action: Action::Verify,
    },
    CommandSpec {
        name: "cache",
        usage: Some("[command]"),
        about: "Manages the Cypress binary cache",
        options: CACHE_OPTIONS,
        action: Action::Cache,
    },
];

/// Look up a subcommand by name.
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name == name)
}

impl OptionSpec {
    fn to_arg(self) -> Arg {
        let mut arg = Arg::new(self.key).long(self.long).help(self.description);
        if let Some(short) = self.short {
            arg = arg.short(short);
        }
        match self.arity {
            Arity::Flag | Arity::Negated | Arity::SubAction => arg.action(ArgAction::SetTrue),
            Arity::Value(name) => arg.value_name(name).num_args(1).action(ArgAction::Set),
            Arity::OptionalBool => arg
                .value_name("bool")
                .num_args(0..=1)
                .default_missing_value("true")
                .action(ArgAction::Set),
        }
    }
}

impl CommandSpec {
    fn sub_actions(&self) -> impl Iterator<Item = &'static OptionSpec> {
        self.options.iter().filter(|o| o.arity == Arity::SubAction)
    }

    /// clap rendition of this subcommand.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(self.name)
            .about(self.about)
            .args_override_self(true);
        if let Some(usage) = self.usage {
            cmd = cmd.override_usage(format!("{} {} {}", PROGRAM, self.name, usage));
        }

        for option in self.options.iter().filter(|o| o.arity != Arity::SubAction) {
            cmd = cmd.arg(option.to_arg());
        }

        let sub_actions: Vec<String> = self
            .sub_actions()
            .map(|o| format!("  {:<8}{}", o.long, o.description))
            .collect();
        if !sub_actions.is_empty() {
            cmd = cmd
                .arg(
                    Arg::new(SUB_ACTION)
                        .value_name("command")
                        .num_args(0..)
                        .action(ArgAction::Append)
                        .hide(true),
                )
                .after_help(format!("Commands:\n{}", sub_actions.join("\n")));
        }
        cmd
    }

    /// Raw parser output for this subcommand's declared options.
    ///
    /// Flags only appear when given; `Negated` keys always appear.
    pub fn parsed_options(&self, matches: &ArgMatches) -> ParsedOptions {
        let mut parsed = ParsedOptions::new();
        for option in self.options {
            let key = option.key.to_string();
            match option.arity {
                Arity::Flag => {
                    if matches.get_flag(option.key) {
                        parsed.insert(key, OptionValue::Bool(true));
                    }
                }
                Arity::Negated => {
                    parsed.insert(key, OptionValue::Bool(!matches.get_flag(option.key)));
                }
                Arity::Value(_) => {
                    if let Some(value) = matches.get_one::<String>(option.key) {
                        parsed.insert(key, OptionValue::Str(value.clone()));
                    }
                }
                Arity::OptionalBool => {
                    if let Some(value) = matches.get_one::<String>(option.key) {
                        parsed.insert(key, OptionValue::Bool(coerce_false(Some(value))));
                    }
                }
                Arity::SubAction => {}
            }
        }
        parsed
    }
}

/// The whole command tree, with bin names resolved for usage lines.
pub fn root_command() -> Command {
    let mut root = Command::new(PROGRAM)
        .bin_name(PROGRAM)
        .disable_version_flag(true)
        .disable_help_subcommand(true)
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .action(ArgAction::SetTrue)
                .help(text::VERSION),
        );
    for spec in COMMANDS {
        root = root.subcommand(spec.to_command());
    }
    root.build();
    root
}

/// Full help text for the program.
pub fn program_help(root: &mut Command) -> String {
    root.render_help().to_string()
}

/// Help text for one subcommand, falling back to the program help.
pub fn command_help(root: &mut Command, name: &str) -> String {
    match root.find_subcommand_mut(name) {
        Some(sub) => sub.render_help().to_string(),
        None => root.render_help().to_string(),
    }
}
