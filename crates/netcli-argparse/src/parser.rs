//! The parser tree and the recursive-descent parsing algorithm.

use std::borrow::Cow;
use std::fmt;
use std::ops::{Deref, DerefMut};

use tracing::{debug, trace};

use crate::error::{ParseError, ParseResult};
use crate::registry::Registry;
use crate::stream::{TokenStream, is_value_shaped};
use crate::value::{Kind, OptionValue, Value, parse_float, parse_int};

/// Dispatch callback invoked with a command's node after the command's
/// arguments have been parsed.
pub type Callback = for<'p, 'a> fn(NodeRef<'p, 'a>) -> anyhow::Result<()>;

/// Index of a node in an [`ArgParser`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// What a successful parse asks the caller to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// All tokens were consumed.
    Parsed,
    /// `--help` or `help <command>`: print this text and exit successfully.
    Help(String),
    /// `--version`: print this text and exit successfully.
    Version(String),
}

#[derive(Debug, Clone, Copy)]
struct CommandEntry {
    node: NodeId,
    callback: Option<Callback>,
}

/// One parser in the command tree: the options, commands and positional
/// arguments of the root or of a single command.
#[derive(Debug)]
pub struct ParserNode<'a> {
    helptext: Option<String>,
    version: Option<String>,
    options: Registry<OptionValue<'a>>,
    commands: Registry<CommandEntry>,
    arguments: Vec<&'a str>,
    command: Option<(&'a str, NodeId)>,
    parent: Option<NodeId>,
}

impl<'a> ParserNode<'a> {
    fn new(helptext: Option<&str>, version: Option<&str>, parent: Option<NodeId>) -> Self {
        Self {
            helptext: helptext.map(str::to_string),
            version: version.map(str::to_string),
            options: Registry::new(),
            commands: Registry::new(),
            arguments: Vec::new(),
            command: None,
            parent,
        }
    }

    pub fn helptext(&self) -> Option<&str> {
        self.helptext.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    // Registration.

    /// Register an option under one or more whitespace-separated names.
    pub fn add_option(&mut self, name: &str, option: OptionValue<'a>) -> ParseResult<()> {
        self.options.insert(name, option).map(|_| ())
    }

    /// Register a boolean flag, `false` until found.
    pub fn add_flag(&mut self, name: &str) -> ParseResult<()> {
        self.add_option(name, OptionValue::flag())
    }

    pub fn add_str(&mut self, name: &str, default: impl Into<Cow<'a, str>>) -> ParseResult<()> {
        self.add_option(name, OptionValue::scalar(Value::Text(default.into())))
    }

    pub fn add_int(&mut self, name: &str, default: i64) -> ParseResult<()> {
        self.add_option(name, OptionValue::scalar(default))
    }

    pub fn add_float(&mut self, name: &str, default: f64) -> ParseResult<()> {
        self.add_option(name, OptionValue::scalar(default))
    }

    /// Register a repeatable flag; each occurrence appends `true`.
    pub fn add_flag_list(&mut self, name: &str) -> ParseResult<()> {
        self.add_option(name, OptionValue::list(Kind::Flag, false))
    }

    pub fn add_str_list(&mut self, name: &str, greedy: bool) -> ParseResult<()> {
        self.add_option(name, OptionValue::list(Kind::Text, greedy))
    }

    pub fn add_int_list(&mut self, name: &str, greedy: bool) -> ParseResult<()> {
        self.add_option(name, OptionValue::list(Kind::Integer, greedy))
    }

    pub fn add_float_list(&mut self, name: &str, greedy: bool) -> ParseResult<()> {
        self.add_option(name, OptionValue::list(Kind::Real, greedy))
    }

    // Option queries.

    pub fn option(&self, name: &str) -> ParseResult<&OptionValue<'a>> {
        self.options
            .get(name)
            .ok_or_else(|| ParseError::UnregisteredOption {
                name: name.to_string(),
            })
    }

    pub fn option_mut(&mut self, name: &str) -> ParseResult<&mut OptionValue<'a>> {
        self.options
            .get_mut(name)
            .ok_or_else(|| ParseError::UnregisteredOption {
                name: name.to_string(),
            })
    }

    /// Whether the option appeared on the command line.
    pub fn found(&self, name: &str) -> ParseResult<bool> {
        Ok(self.option(name)?.found())
    }

    fn values_of<'s, T: 's>(
        &'s self,
        name: &str,
        requested: Kind,
        pick: impl FnOnce(&'s OptionValue<'a>) -> Option<&'s [T]>,
    ) -> ParseResult<&'s [T]> {
        let opt = self.option(name)?;
        pick(opt).ok_or_else(|| ParseError::KindMismatch {
            name: name.to_string(),
            actual: opt.kind(),
            requested,
        })
    }

    fn last_of<'s, T: 's>(&self, name: &str, values: &'s [T]) -> ParseResult<&'s T> {
        values.last().ok_or_else(|| ParseError::NoValue {
            name: name.to_string(),
        })
    }

    pub fn get_flag(&self, name: &str) -> ParseResult<bool> {
        let values = self.values_of(name, Kind::Flag, OptionValue::flags)?;
        self.last_of(name, values).copied()
    }

    pub fn get_str(&self, name: &str) -> ParseResult<&str> {
        let values = self.values_of(name, Kind::Text, OptionValue::texts)?;
        self.last_of(name, values).map(|s| s.as_ref())
    }

    pub fn get_int(&self, name: &str) -> ParseResult<i64> {
        let values = self.values_of(name, Kind::Integer, OptionValue::integers)?;
        self.last_of(name, values).copied()
    }

    pub fn get_float(&self, name: &str) -> ParseResult<f64> {
        let values = self.values_of(name, Kind::Real, OptionValue::reals)?;
        self.last_of(name, values).copied()
    }

    /// Number of values held by the option.
    pub fn len_list(&self, name: &str) -> ParseResult<usize> {
        Ok(self.option(name)?.len())
    }

    pub fn get_flag_list(&self, name: &str) -> ParseResult<Vec<bool>> {
        Ok(self.values_of(name, Kind::Flag, OptionValue::flags)?.to_vec())
    }

    pub fn get_str_list(&self, name: &str) -> ParseResult<Vec<&str>> {
        let values = self.values_of(name, Kind::Text, OptionValue::texts)?;
        Ok(values.iter().map(|s| s.as_ref()).collect())
    }

    pub fn get_int_list(&self, name: &str) -> ParseResult<Vec<i64>> {
        Ok(self.values_of(name, Kind::Integer, OptionValue::integers)?.to_vec())
    }

    pub fn get_float_list(&self, name: &str) -> ParseResult<Vec<f64>> {
        Ok(self.values_of(name, Kind::Real, OptionValue::reals)?.to_vec())
    }

    /// Registered option keys with their values, in registration order.
    pub fn options(&self) -> impl Iterator<Item = (&str, &OptionValue<'a>)> {
        self.options.iter()
    }

    // Option setters.

    /// Remove every value from the option, including a scalar's default.
    pub fn clear_list(&mut self, name: &str) -> ParseResult<()> {
        self.option_mut(name)?.clear();
        Ok(())
    }

    fn set_value(&mut self, name: &str, value: Value<'a>) -> ParseResult<()> {
        let opt = self.option_mut(name)?;
        opt.append(value)
            .map_err(|requested| ParseError::KindMismatch {
                name: name.to_string(),
                actual: opt.kind(),
                requested,
            })
    }

    pub fn set_flag(&mut self, name: &str, value: bool) -> ParseResult<()> {
        self.set_value(name, Value::Flag(value))
    }

    pub fn set_str(&mut self, name: &str, value: impl Into<Cow<'a, str>>) -> ParseResult<()> {
        self.set_value(name, Value::Text(value.into()))
    }

    pub fn set_int(&mut self, name: &str, value: i64) -> ParseResult<()> {
        self.set_value(name, Value::Integer(value))
    }

    pub fn set_float(&mut self, name: &str, value: f64) -> ParseResult<()> {
        self.set_value(name, Value::Real(value))
    }

    // Positional arguments.

    pub fn has_args(&self) -> bool {
        !self.arguments.is_empty()
    }

    pub fn len_args(&self) -> usize {
        self.arguments.len()
    }

    pub fn get_arg(&self, index: usize) -> Option<&'a str> {
        self.arguments.get(index).copied()
    }

    pub fn args(&self) -> &[&'a str] {
        &self.arguments
    }

    pub fn get_args(&self) -> Vec<&'a str> {
        self.arguments.clone()
    }

    /// Coerce every positional argument to an integer, failing on the first
    /// one that does not parse.
    pub fn get_args_as_ints(&self) -> ParseResult<Vec<i64>> {
        self.arguments.iter().map(|arg| parse_int(arg)).collect()
    }

    pub fn get_args_as_floats(&self) -> ParseResult<Vec<f64>> {
        self.arguments.iter().map(|arg| parse_float(arg)).collect()
    }

    // Commands.

    pub fn has_cmd(&self) -> bool {
        self.command.is_some()
    }

    /// The matched command name as it was typed.
    pub fn cmd_name(&self) -> Option<&'a str> {
        self.command.map(|(name, _)| name)
    }

    pub fn cmd_id(&self) -> Option<NodeId> {
        self.command.map(|(_, id)| id)
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn has_command_named(&self, name: &str) -> bool {
        self.commands.contains(name)
    }
}

impl fmt::Display for ParserNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Options:")?;
        if self.options.is_empty() {
            writeln!(f, "  [none]")?;
        }
        for (name, opt) in self.options() {
            writeln!(f, "  {name}: {opt}")?;
        }

        writeln!(f, "\nArguments:")?;
        if self.arguments.is_empty() {
            writeln!(f, "  [none]")?;
        }
        for arg in &self.arguments {
            writeln!(f, "  {arg}")?;
        }

        writeln!(f, "\nCommand:")?;
        match self.cmd_name() {
            Some(name) => writeln!(f, "  {name}"),
            None => writeln!(f, "  [none]"),
        }
    }
}

/// A read-only view of one node that can also walk the tree.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'p, 'a> {
    tree: &'p ArgParser<'a>,
    id: NodeId,
}

impl<'p, 'a> NodeRef<'p, 'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The parser this command was registered on. `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'p, 'a>> {
        self.tree.nodes[self.id.0]
            .parent
            .map(|id| self.tree.node(id))
    }

    /// The command matched while parsing this node, if any.
    pub fn command(&self) -> Option<NodeRef<'p, 'a>> {
        self.tree.nodes[self.id.0]
            .cmd_id()
            .map(|id| self.tree.node(id))
    }
}

impl<'a> Deref for NodeRef<'_, 'a> {
    type Target = ParserNode<'a>;

    fn deref(&self) -> &Self::Target {
        &self.tree.nodes[self.id.0]
    }
}

/// The root of a command tree. Every node, including nested commands, lives
/// in one arena owned by this value and is addressed by [`NodeId`].
///
/// `ArgParser` dereferences to the root [`ParserNode`], so root options are
/// registered and queried directly on it. Tokens are borrowed from the
/// argument storage passed to [`parse`](Self::parse) for `'a`.
#[derive(Debug)]
pub struct ArgParser<'a> {
    nodes: Vec<ParserNode<'a>>,
}

impl<'a> ArgParser<'a> {
    /// Create a root parser. Help text enables `--help`; version text enables
    /// `--version`.
    pub fn new(helptext: Option<&str>, version: Option<&str>) -> Self {
        Self {
            nodes: vec![ParserNode::new(helptext, version, None)],
        }
    }

    pub fn root(&self) -> NodeRef<'_, 'a> {
        self.node(NodeId::ROOT)
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this parser.
    pub fn node(&self, id: NodeId) -> NodeRef<'_, 'a> {
        assert!(id.0 < self.nodes.len(), "unknown parser node {}", id.0);
        NodeRef { tree: self, id }
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this parser.
    pub fn node_mut(&mut self, id: NodeId) -> &mut ParserNode<'a> {
        &mut self.nodes[id.0]
    }

    /// Register a command on `parent` under one or more whitespace-separated
    /// names. The command gets its own parser with `helptext`, so
    /// `<command> --help` and `help <command>` both work.
    pub fn add_cmd(
        &mut self,
        parent: NodeId,
        name: &str,
        helptext: &str,
        callback: Option<Callback>,
    ) -> ParseResult<NodeId> {
        let id = NodeId(self.nodes.len());
        self.node_mut(parent)
            .commands
            .insert(name, CommandEntry { node: id, callback })?;
        self.nodes
            .push(ParserNode::new(Some(helptext), None, Some(parent)));
        Ok(id)
    }

    /// Parse a full argument vector; the first element is the program name
    /// and is skipped.
    pub fn parse<S: AsRef<str>>(&mut self, argv: &'a [S]) -> ParseResult<ParseOutcome> {
        self.parse_args(argv.get(1..).unwrap_or_default())
    }

    /// Parse tokens that do not include the program name.
    pub fn parse_args<S: AsRef<str>>(&mut self, args: &'a [S]) -> ParseResult<ParseOutcome> {
        let mut stream = TokenStream::new(args);
        self.parse_stream(NodeId::ROOT, &mut stream)
    }

    /// Parse `argv` and handle the outcome the way a command-line program
    /// expects: help and version text go to stdout with exit status 0, errors
    /// go to stderr as `Error: <message>.` with exit status 1.
    pub fn parse_or_exit<S: AsRef<str>>(&mut self, argv: &'a [S]) {
        match self.parse(argv) {
            Ok(ParseOutcome::Parsed) => {}
            Ok(ParseOutcome::Help(text) | ParseOutcome::Version(text)) => {
                println!("{text}");
                std::process::exit(0);
            }
            Err(err) => {
                eprintln!("Error: {err}.");
                std::process::exit(err.exit_code());
            }
        }
    }

    fn parse_stream(&mut self, id: NodeId, stream: &mut TokenStream<'a>) -> ParseResult<ParseOutcome> {
        let mut parsing = true;

        while let Some(arg) = stream.next() {
            if !parsing {
                self.nodes[id.0].arguments.push(arg);
                continue;
            }

            if arg == "--" {
                trace!("option parsing disabled");
                parsing = false;
                continue;
            }

            if let Some(name) = arg.strip_prefix("--") {
                if let Some(outcome) = self.parse_long_option(id, name, stream)? {
                    return Ok(outcome);
                }
                continue;
            }

            if let Some(name) = arg.strip_prefix('-') {
                if is_value_shaped(arg) {
                    trace!(token = arg, "positional");
                    self.nodes[id.0].arguments.push(arg);
                } else {
                    self.parse_short_option(id, name, stream)?;
                }
                continue;
            }

            if let Some(entry) = self.nodes[id.0].commands.get(arg).copied() {
                debug!(command = arg, "dispatching to command");
                self.nodes[id.0].command = Some((arg, entry.node));

                let outcome = self.parse_stream(entry.node, stream)?;
                if outcome != ParseOutcome::Parsed {
                    return Ok(outcome);
                }
                if let Some(callback) = entry.callback {
                    callback(self.node(entry.node)).map_err(|source| ParseError::CommandFailed {
                        name: arg.to_string(),
                        source,
                    })?;
                }
                return Ok(ParseOutcome::Parsed);
            }

            if arg == "help" {
                if let Some(name) = stream.next() {
                    return self.command_help(id, name);
                }
            }

            trace!(token = arg, "positional");
            self.nodes[id.0].arguments.push(arg);
        }

        Ok(ParseOutcome::Parsed)
    }

    fn command_help(&self, id: NodeId, name: &str) -> ParseResult<ParseOutcome> {
        let Some(entry) = self.nodes[id.0].commands.get(name) else {
            return Err(ParseError::UnrecognizedCommand {
                name: name.to_string(),
            });
        };
        debug!(command = name, "help requested");
        let text = self.nodes[entry.node.0].helptext.clone().unwrap_or_default();
        Ok(ParseOutcome::Help(text))
    }

    fn parse_long_option(
        &mut self,
        id: NodeId,
        name: &'a str,
        stream: &mut TokenStream<'a>,
    ) -> ParseResult<Option<ParseOutcome>> {
        if name.contains('=') {
            self.parse_equals_option(id, "--", name)?;
            return Ok(None);
        }

        let node = &mut self.nodes[id.0];
        if let Some(opt) = node.options.get_mut(name) {
            consume_option(opt, "--", name, stream)?;
            return Ok(None);
        }

        match (name, &node.helptext, &node.version) {
            ("help", Some(text), _) => {
                debug!("help requested");
                Ok(Some(ParseOutcome::Help(text.clone())))
            }
            ("version", _, Some(text)) => {
                debug!("version requested");
                Ok(Some(ParseOutcome::Version(text.clone())))
            }
            _ => Err(ParseError::UnrecognizedOption {
                option: format!("--{name}"),
            }),
        }
    }

    fn parse_short_option(
        &mut self,
        id: NodeId,
        name: &'a str,
        stream: &mut TokenStream<'a>,
    ) -> ParseResult<()> {
        if name.contains('=') {
            return self.parse_equals_option(id, "-", name);
        }

        // `-abc` is `-a -b -c`; a non-flag takes the next token and ends
        // the bundle.
        let node = &mut self.nodes[id.0];
        for c in name.chars() {
            let key = c.to_string();
            let Some(opt) = node.options.get_mut(&key) else {
                return Err(ParseError::UnrecognizedOption {
                    option: format!("-{key}"),
                });
            };
            if consume_option(opt, "-", &key, stream)? {
                break;
            }
        }
        Ok(())
    }

    /// `--name=value` or `-n=value`.
    fn parse_equals_option(&mut self, id: NodeId, prefix: &str, arg: &'a str) -> ParseResult<()> {
        let Some((key, value)) = arg.split_once('=') else {
            return Ok(());
        };
        let Some(opt) = self.nodes[id.0].options.get_mut(key) else {
            return Err(ParseError::UnrecognizedOption {
                option: format!("{prefix}{key}"),
            });
        };
        opt.mark_found();

        if opt.kind() == Kind::Flag || value.is_empty() {
            return Err(ParseError::InvalidEqualsForm {
                option: format!("{prefix}{key}"),
                flag: opt.kind() == Kind::Flag,
            });
        }
        opt.append_raw(value)
    }
}

/// Apply one occurrence of an option. Flags record `true`; other kinds take
/// the next value-shaped token, and greedy lists keep taking them. Returns
/// whether a following token was consumed.
fn consume_option<'a>(
    opt: &mut OptionValue<'a>,
    prefix: &str,
    key: &str,
    stream: &mut TokenStream<'a>,
) -> ParseResult<bool> {
    opt.mark_found();
    if opt.kind() == Kind::Flag {
        let _ = opt.append(Value::Flag(true));
        return Ok(false);
    }

    let Some(first) = stream.next_value() else {
        return Err(ParseError::MissingArgument {
            option: format!("{prefix}{key}"),
        });
    };
    opt.append_raw(first)?;

    if opt.is_greedy() {
        while let Some(value) = stream.next_value() {
            opt.append_raw(value)?;
        }
    }
    Ok(true)
}

impl<'a> Deref for ArgParser<'a> {
    type Target = ParserNode<'a>;

    fn deref(&self) -> &Self::Target {
        &self.nodes[NodeId::ROOT.0]
    }
}

impl DerefMut for ArgParser<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.nodes[NodeId::ROOT.0]
    }
}
