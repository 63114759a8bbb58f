// ============================================================================
// options.rs — Command-line arguments (CLI)
// ============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use iconforge::config::parse_size_list;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the whole pipeline: SVG → PNG → ICO (default)
    Generate,

    /// Only rasterize the SVG to PNG
    Png,

    /// Only pack the existing PNG into an ICO
    Ico,

    /// Report which image backends this build includes
    Check,

    /// List the images stored in an ICO file
    Inspect {
        /// ICO file (default: the configured output icon)
        file: Option<PathBuf>,
    },

    /// Write a default iconforge.toml into the asset directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Source SVG file name
    #[arg(long, value_name = "NAME", global = true)]
    pub svg: Option<String>,

    /// Intermediate PNG file name
    #[arg(long, value_name = "NAME", global = true)]
    pub png: Option<String>,

    /// Output ICO file name
    #[arg(long, value_name = "NAME", global = true)]
    pub ico: Option<String>,

    /// PNG edge length in pixels (default: 256)
    #[arg(short, long, value_name = "PX", global = true)]
    pub size: Option<u32>,

    /// Comma-separated ICO sizes (default: 16,32,48,64,128,256)
    #[arg(long, value_name = "LIST", value_parser = parse_sizes, global = true)]
    pub sizes: Option<SizeList>,
}

/// `--sizes 16,32,48`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeList(pub Vec<u32>);

fn parse_sizes(s: &str) -> Result<SizeList, String> {
    parse_size_list(s).map(SizeList)
}

#[derive(Parser, Debug)]
#[command(name = "iconforge", version)]
#[command(about = "iconforge - Render an SVG app icon to PNG and a multi-size Windows ICO", long_about = None)]
pub struct Options {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory holding the source SVG and receiving the outputs (default: current directory)
    #[arg(short, long, value_name = "DIR", global = true)]
    pub dir: Option<PathBuf>,

    /// Configuration file (default: <dir>/iconforge.toml when present)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    /// Install missing backends without asking
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Do not wait for Enter after a failure
    #[arg(long, global = true)]
    pub no_pause: bool,

    /// Verbose output (backends, digests, debug logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only errors and summary
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Options {
    pub fn show_quiet_output(&self) -> bool {
        self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults() {
        let opts = Options::try_parse_from(["iconforge"]).unwrap();
        assert!(opts.command.is_none());
        assert!(opts.dir.is_none());
        assert!(opts.overrides.sizes.is_none());
        assert!(!opts.yes);
    }

    #[test]
    fn test_overrides_after_subcommand() {
        let opts = Options::try_parse_from([
            "iconforge", "ico", "--sizes", "16,32", "-d", "assets", "--ico", "setup.ico",
        ])
        .unwrap();
        assert!(matches!(opts.command, Some(Command::Ico)));
        assert_eq!(opts.overrides.sizes, Some(SizeList(vec![16, 32])));
        assert_eq!(opts.dir, Some(PathBuf::from("assets")));
        assert_eq!(opts.overrides.ico.as_deref(), Some("setup.ico"));
    }

    #[test]
    fn test_bad_size_list_rejected() {
        assert!(Options::try_parse_from(["iconforge", "--sizes", "16,x"]).is_err());
    }
}
