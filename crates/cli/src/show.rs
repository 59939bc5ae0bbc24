use anyhow::{Context, Result, bail};
use netcli_argparse::NodeRef;
use std::process::Command;

/// Program run when `NETCLI_IFCONFIG` is unset.
pub const DEFAULT_PROGRAM: &str = "ifconfig";
pub const PROGRAM_ENV: &str = "NETCLI_IFCONFIG";

pub const HELP: &str = "\
Usage: netcli show [OPTIONS] [IFACE]

Show the configuration of one interface, or of all interfaces when IFACE
is omitted.

Options:
  -n, --dry-run   Print the command instead of running it
      --help      Show this help";

/// The external command `show` runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, iface: Option<&str>) -> Self {
        Self {
            program: program.into(),
            args: iface.map(str::to_string).into_iter().collect(),
        }
    }

    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn program() -> String {
    std::env::var(PROGRAM_ENV)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PROGRAM.to_string())
}

/// Dispatch callback for the `show` command.
pub fn run(cmd: NodeRef<'_, '_>) -> Result<()> {
    tracing::debug!("executing show command");

    if cmd.len_args() > 1 {
        bail!("show takes at most one interface, got {}", cmd.len_args());
    }
    let invocation = Invocation::new(program(), cmd.get_arg(0));

    if cmd.get_flag("dry-run")? {
        println!("{}", invocation.display());
        return Ok(());
    }

    tracing::debug!(command = %invocation.display(), "spawning");
    let status = Command::new(&invocation.program)
        .args(&invocation.args)
        .status()
        .with_context(|| format!("failed to run {}", invocation.program))?;
    if !status.success() {
        bail!("{} exited with {status}", invocation.display());
    }
    Ok(())
}
