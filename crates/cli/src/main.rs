mod show;

use anyhow::{Context, Result, bail};
use netcli_argparse::{ArgParser, NodeId};
use tracing_subscriber::{EnvFilter, fmt};

const HELP: &str = "\
Usage: netcli <COMMAND> [ARGS]

Inspect network interfaces.

Commands:
  show [IFACE]    Show interface configuration
  help <COMMAND>  Show help for a command

Options:
  --help          Show this help
  --version       Show version information";

const VERSION: &str = concat!("netcli ", env!("CARGO_PKG_VERSION"));

fn build_parser<'a>() -> Result<ArgParser<'a>> {
    let mut ap = ArgParser::new(Some(HELP), Some(VERSION));

    let show = ap
        .add_cmd(NodeId::ROOT, "show", show::HELP, Some(show::run))
        .context("failed to register the show command")?;
    ap.node_mut(show).add_flag("n dry-run")?;

    Ok(ap)
}

fn main() -> Result<()> {
    init_tracing();
    let argv: Vec<String> = std::env::args().collect();

    let mut ap = build_parser()?;
    ap.parse_or_exit(&argv);
    if !ap.has_cmd() {
        bail!("missing command (see `netcli --help`)");
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
