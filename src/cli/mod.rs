//! CLI commands module

pub mod cache;
pub mod dispatch;
pub mod dns;
pub mod help;
pub mod params;
pub mod registry;
pub mod zones;

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;

use crate::api::types::Filters;
use crate::config::{Config, OutputFormat};
use registry::CommandSpec;

/// cfcli - Cloudflare DNS from the command line
#[derive(Parser, Debug, Default)]
#[command(name = "cfcli")]
#[command(version)]
#[command(about = "Manage Cloudflare DNS records, zones and cache from the shell", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Domain (zone) to operate on
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Record type (A, AAAA, CNAME, TXT, MX, SRV, ...)
    #[arg(short = 't', long = "type")]
    pub record_type: Option<String>,

    /// Account email, switches to global API key auth
    #[arg(short, long)]
    pub email: Option<String>,

    /// API token (or global API key together with --email)
    #[arg(short = 'k', long)]
    pub token: Option<String>,

    /// Config file (default ~/.cfcli.yml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Turn on Cloudflare proxying for added or edited records
    #[arg(short, long)]
    pub activate: bool,

    /// Output format for listings
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// TTL in seconds (1 = auto)
    #[arg(short = 'l', long)]
    pub ttl: Option<u32>,

    /// Account profile from the config file
    #[arg(short = 'u', long)]
    pub account: Option<String>,

    /// Record priority (MX, SRV)
    #[arg(short, long)]
    pub priority: Option<u16>,

    /// Extra filters, e.g. "type:A,content:1.2.3.4"
    #[arg(long)]
    pub query: Option<String>,

    /// SRV service label, e.g. _sip
    #[arg(short, long)]
    pub service: Option<String>,

    /// SRV owner name
    #[arg(short = 'n', long)]
    pub srvname: Option<String>,

    /// SRV protocol label, e.g. _tcp
    #[arg(short = 'r', long)]
    pub protocol: Option<String>,

    /// SRV weight
    #[arg(short, long)]
    pub weight: Option<u16>,

    /// SRV port
    #[arg(short = 'o', long)]
    pub port: Option<u16>,

    /// SRV target host
    #[arg(short = 'g', long)]
    pub target: Option<String>,

    /// Command followed by its arguments
    pub args: Vec<String>,
}

/// SRV fields given as flags; each one wins over the decomposed value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SrvOverrides {
    pub service: Option<String>,
    pub name: Option<String>,
    pub proto: Option<String>,
    pub priority: Option<u16>,
    pub weight: Option<u16>,
    pub port: Option<u16>,
    pub target: Option<String>,
}

/// Flags merged with configuration
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub domain: Option<String>,
    pub email: Option<String>,
    pub token: Option<String>,
    pub record_type: Option<String>,
    pub activate: Option<bool>,
    pub format: OutputFormat,
    pub ttl: Option<u32>,
    pub priority: Option<u16>,
    pub srv: SrvOverrides,
}

impl Options {
    /// Flags win over config, config already carries the environment
    pub fn merge(cli: &Cli, config: Config) -> Self {
        Self {
            domain: cli.domain.clone().or(config.domain),
            email: cli.email.clone().or(config.email),
            token: cli.token.clone().or(config.token),
            record_type: cli.record_type.as_ref().map(|t| t.to_uppercase()),
            activate: cli.activate.then_some(true),
            format: cli.format.or(config.format).unwrap_or_default(),
            ttl: cli.ttl,
            priority: cli.priority,
            srv: SrvOverrides {
                service: cli.service.clone(),
                name: cli.srvname.clone(),
                proto: cli.protocol.clone(),
                priority: cli.priority,
                weight: cli.weight,
                port: cli.port,
                target: cli.target.clone(),
            },
        }
    }
}

/// A resolved command with its arguments bound
#[derive(Debug)]
pub struct Invocation {
    pub spec: &'static CommandSpec,
    /// Raw positional words, command name first
    pub positional: Vec<String>,
    pub params: BTreeMap<String, String>,
    /// Parsed `--query` filters
    pub query: Filters,
    pub options: Options,
}

impl Invocation {
    pub fn new(positional: Vec<String>, query: Option<&str>, options: Options) -> Self {
        let spec = registry::resolve(positional.first().map(String::as_str));
        let params = params::map_parameters(spec, &positional);
        let query = query.map(params::parse_query).unwrap_or_default();

        Self {
            spec,
            positional,
            params,
            query,
            options,
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}
