//! Recursive command-line parsing with aliased options, typed values and
//! nested commands.
//!
//! A parser is built in two phases. First register options (flags, text,
//! integer and real values, each as a scalar with a default or as a list)
//! and commands, each command getting a parser of its own. Then parse the
//! process arguments once and query the tree.
//!
//! - `--name value`, `--name=value`, `-n value`, `-n=value` and bundled short
//!   flags (`-abc`) are recognised.
//! - `--` ends option parsing; `-` and `-<digit>` are always positional.
//! - A matched command receives the rest of the token stream.
//! - `--help`, `help <command>` and `--version` are reported as
//!   [`ParseOutcome`] values instead of exiting, except through
//!   [`ArgParser::parse_or_exit`].
//!
//! ```
//! use netcli_argparse::{ArgParser, NodeId, ParseOutcome};
//!
//! # fn main() -> Result<(), netcli_argparse::ParseError> {
//! let argv = ["app", "-v", "push", "--tag", "a", "b", "file.txt"];
//!
//! let mut ap = ArgParser::new(Some("Usage: app [push]"), Some("app 1.0"));
//! ap.add_flag("v verbose")?;
//! let push = ap.add_cmd(NodeId::ROOT, "push", "Usage: app push [FILE]", None)?;
//! ap.node_mut(push).add_str_list("t tag", true)?;
//!
//! assert_eq!(ap.parse(&argv)?, ParseOutcome::Parsed);
//! assert!(ap.get_flag("verbose")?);
//! assert_eq!(ap.cmd_name(), Some("push"));
//!
//! let push = ap.node(push);
//! assert_eq!(push.get_str_list("tag")?, vec!["a", "b", "file.txt"]);
//! assert!(!push.has_args());
//! # Ok(())
//! # }
//! ```

mod error;
mod parser;
mod registry;
mod stream;
mod value;

pub use error::{ParseError, ParseResult};
pub use parser::{ArgParser, Callback, NodeId, NodeRef, ParseOutcome, ParserNode};
pub use registry::Registry;
pub use stream::{TokenStream, is_value_shaped};
pub use value::{Kind, OptionValue, Value, parse_float, parse_int};
