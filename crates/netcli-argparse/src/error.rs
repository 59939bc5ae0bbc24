use thiserror::Error;

use crate::value::Kind;

/// Errors raised while registering, parsing or querying options.
///
/// The `Display` output of each variant is the one-line diagnostic printed by
/// [`ArgParser::parse_or_exit`](crate::ArgParser::parse_or_exit) as
/// `Error: <message>.`.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A long (`--name`) or short (`-n`) option that was never registered.
    /// `option` carries the dash prefix as it appeared on the command line.
    #[error("{option} is not a recognised option")]
    UnrecognizedOption { option: String },

    /// A non-flag option was not followed by a value-shaped token.
    #[error("missing argument for the {option} option")]
    MissingArgument { option: String },

    /// `--flag=value` on a boolean flag, or `--name=` with nothing after `=`.
    #[error("{}", equals_form_message(.option, .flag))]
    InvalidEqualsForm { option: String, flag: bool },

    /// `help <name>` where `<name>` is not a registered command.
    #[error("'{name}' is not a recognised command")]
    UnrecognizedCommand { name: String },

    #[error("'{input}' is out of range")]
    NumericOutOfRange { input: String },

    #[error("cannot parse '{input}' as {}", .target.article_name())]
    NumericInvalidFormat { input: String, target: Kind },

    /// The caller asked for an option name that was never registered.
    #[error("'{name}' is not a registered option")]
    UnregisteredOption { name: String },

    #[error("'{name}' holds {actual} values, not {requested} values")]
    KindMismatch {
        name: String,
        actual: Kind,
        requested: Kind,
    },

    #[error("'{name}' has no value")]
    NoValue { name: String },

    #[error("'{key}' is already registered")]
    DuplicateKey { key: String },

    #[error("a name must contain at least one key")]
    EmptyName,

    #[error("the '{name}' command failed: {source:#}")]
    CommandFailed {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

fn equals_form_message(option: &str, flag: &bool) -> String {
    if *flag {
        format!("invalid format for boolean flag {option}")
    } else {
        format!("missing argument for the {option} option")
    }
}

impl ParseError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
