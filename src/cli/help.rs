//! Usage text built from the command registry

use crate::cli::registry::{CommandKind, CommandSpec, COMMANDS};
use crate::output::CommandOutput;

const GLOBAL_OPTIONS: &[(&str, &str)] = &[
    ("-d, --domain <DOMAIN>", "Domain (zone) to operate on"),
    ("-t, --type <TYPE>", "Record type, CNAME when adding without one"),
    ("-k, --token <TOKEN>", "API token, or global API key with --email"),
    ("-e, --email <EMAIL>", "Account email for global API key auth"),
    ("-c, --config <PATH>", "Config file (default ~/.cfcli.yml)"),
    ("-u, --account <NAME>", "Account profile from the config file"),
    ("-a, --activate", "Enable proxying on add/edit"),
    ("-f, --format <FORMAT>", "table, csv or json"),
    ("-l, --ttl <SECONDS>", "Record TTL, 1 means automatic"),
    ("-p, --priority <N>", "MX/SRV priority"),
    ("--query <FILTERS>", "Extra filters: key:value,key:value"),
    ("-s/-r/-n/-w/-o/-g", "SRV service, protocol, name, weight, port, target"),
];

/// Render the usage text
pub fn show() -> CommandOutput {
    let mut text = String::from("Usage: cfcli [options] <command> [parameters]\n\nCommands:\n");

    for spec in COMMANDS {
        text.push_str(&format!("  {:<32}{}\n", usage(spec), spec.description));
        let others: Vec<&str> = spec
            .aliases
            .iter()
            .chain(spec.shortcut.iter())
            .filter(|alias| **alias != spec.name)
            .copied()
            .collect();
        if !others.is_empty() {
            text.push_str(&format!("  {:<32}aliases: {}\n", "", others.join(", ")));
        }
    }

    text.push_str("\nOptions:\n");
    for (flag, description) in GLOBAL_OPTIONS {
        text.push_str(&format!("  {:<32}{}\n", flag, description));
    }

    CommandOutput::message(text.trim_end())
}

fn usage(spec: &CommandSpec) -> String {
    let mut parts = vec![spec.name.to_string()];
    parts.extend(spec.required_params.iter().map(|p| format!("<{}>", p)));
    parts.extend(spec.optional_params.iter().map(|p| format!("[{}]", p)));
    if spec.kind == CommandKind::Purge {
        parts.push("[url...]".to_string());
    }
    parts.join(" ")
}
