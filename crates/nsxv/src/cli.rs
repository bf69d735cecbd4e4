//! Clap derive structures for the `nsxv` CLI.
//!
//! Defines the command tree, global flags, and shared types. This file is
//! also compiled by `build.rs` for man page generation, so it may only
//! depend on clap and clap_complete.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// nsxv -- NSX-V network virtualization from the command line
#[derive(Debug, Parser)]
#[command(
    name = "nsxv",
    version,
    about = "Automate VMware NSX-V network virtualization operations",
    long_about = "Prepare clusters for NSX-V network virtualization and query fabric\n\
        and host communication status against an NSX Manager.\n\n\
        Targets are given as a managed object id, a vCenter inventory path,\n\
        or a vCenter object name; the latter two need a [vcenter] section.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// INI file with NSX Manager and vCenter settings
    #[arg(long, env = "NSXV_INI", value_name = "FILE", global = true)]
    pub ini: Option<PathBuf>,

    /// Log NSX Manager and vCenter requests
    #[arg(long, global = true)]
    pub debug: bool,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NSXV_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Seconds between job status polls (overrides [jobs] poll_interval)
    #[arg(long, value_name = "SECS", global = true)]
    pub poll_interval: Option<u64>,

    /// Job status polls before giving up (overrides [jobs] max_attempts)
    #[arg(long, value_name = "N", global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_polls: Option<u32>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// psql-style table (default)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Network virtualization components and VXLAN on clusters
    Cluster(ClusterArgs),

    /// ESXi host status
    Host(HostArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── cluster ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClusterArgs {
    /// Operation to run
    #[arg(
        value_name = "COMMAND",
        long_help = "Operation to run:\n  \
            show_nwfabric_status              Network fabric status of the cluster\n  \
            install_network_virtualization    Install network virtualization components\n  \
            uninstall_network_virtualization  Uninstall network virtualization components"
    )]
    pub command: String,

    #[command(flatten)]
    pub target: ClusterTarget,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ClusterTarget {
    /// Cluster moid, e.g. domain-c1
    #[arg(short = 'm', long = "cluster-moid", value_name = "MOID")]
    pub moid: Option<String>,

    /// Cluster inventory path, e.g. dc/host/folder/cluster1
    #[arg(short = 'i', long = "cluster-inventory-path", value_name = "PATH")]
    pub inventory_path: Option<String>,

    /// Cluster name, e.g. cluster001
    #[arg(short = 'n', long = "cluster-name", value_name = "NAME")]
    pub name: Option<String>,
}

// ── host ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct HostArgs {
    /// Operation to run
    #[arg(
        value_name = "COMMAND",
        long_help = "Operation to run:\n  \
            communication_status  Communication status between NSX Manager and the host"
    )]
    pub command: String,

    #[command(flatten)]
    pub target: HostTarget,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct HostTarget {
    /// Host moid, e.g. host-1
    #[arg(short = 'm', long = "host-moid", value_name = "MOID")]
    pub moid: Option<String>,

    /// Host inventory path, e.g. dc/host/cluster1/host1
    #[arg(short = 'i', long = "host-inventory-path", value_name = "PATH")]
    pub inventory_path: Option<String>,

    /// Host name, e.g. esx01.corp.local
    #[arg(short = 'n', long = "host-name", value_name = "NAME")]
    pub name: Option<String>,
}

// ── completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
