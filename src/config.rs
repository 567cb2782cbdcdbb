// Command line flags and the run configuration derived from them.

use std::path::PathBuf;

use clap::Parser;

use crate::alias::AliasSource;

pub const DEFAULT_MODULE_ROOT: &str = "github.com/golang/protobuf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Print a unified diff per file; leave destinations alone.
    #[default]
    DryRun,
    /// Replace destinations with the generated content.
    Execute,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    /// Prefix stripped from generated file names to get the destination.
    pub module_root: PathBuf,
    /// Directory destinations are relative to.
    pub out_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::DryRun,
            module_root: PathBuf::from(DEFAULT_MODULE_ROOT),
            out_dir: PathBuf::from("."),
        }
    }
}

/// Generate forwarding shims for legacy protobuf package paths.
#[derive(Debug, Parser)]
#[command(name = "protocrap-alias", version, about)]
pub struct Cli {
    /// Write generated files to destination.
    #[arg(long)]
    pub execute: bool,

    /// Encoded FileDescriptorSet holding the canonical files ("-" for stdin).
    /// Defaults to the built-in well-known types.
    #[arg(long, value_name = "FILE")]
    pub descriptor_set: Option<PathBuf>,

    /// Replace the default alias table; repeatable.
    #[arg(long = "alias", value_name = "LEGACY=CANONICAL")]
    pub aliases: Vec<AliasSource>,

    /// Run this protoc plugin instead of the built-in shim generator.
    #[arg(long, value_name = "PATH")]
    pub plugin: Option<PathBuf>,

    /// Parameter string passed to the generator.
    #[arg(long)]
    pub parameter: Option<String>,

    /// Prefix stripped from generated file names.
    #[arg(long, default_value = DEFAULT_MODULE_ROOT)]
    pub module_root: PathBuf,

    /// Directory destinations are written under.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            mode: if self.execute {
                Mode::Execute
            } else {
                Mode::DryRun
            },
            module_root: self.module_root.clone(),
            out_dir: self.out_dir.clone(),
        }
    }

    pub fn alias_sources(&self) -> Vec<AliasSource> {
        if self.aliases.is_empty() {
            AliasSource::defaults()
        } else {
            self.aliases.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_dry_run() {
        let cli = Cli::try_parse_from(["protocrap-alias"]).unwrap();
        let config = cli.config();
        assert_eq!(config.mode, Mode::DryRun);
        assert_eq!(config.module_root, PathBuf::from(DEFAULT_MODULE_ROOT));
        assert_eq!(config.out_dir, PathBuf::from("."));
        assert_eq!(cli.alias_sources(), AliasSource::defaults());
    }

    #[test]
    fn test_execute_and_aliases() {
        let cli = Cli::try_parse_from([
            "protocrap-alias",
            "--execute",
            "--alias",
            "pkg/any;any=google/protobuf/any.proto",
            "--alias",
            "pkg/empty;empty=google/protobuf/empty.proto",
            "--module-root",
            "pkg",
        ])
        .unwrap();
        assert_eq!(cli.config().mode, Mode::Execute);
        assert_eq!(cli.config().module_root, PathBuf::from("pkg"));
        assert_eq!(
            cli.alias_sources(),
            vec![
                AliasSource::new("pkg/any;any", "google/protobuf/any.proto"),
                AliasSource::new("pkg/empty;empty", "google/protobuf/empty.proto"),
            ]
        );
    }

    #[test]
    fn test_bad_alias_is_usage_error() {
        assert!(Cli::try_parse_from(["protocrap-alias", "--alias", "pkg/any;any"]).is_err());
    }
}
