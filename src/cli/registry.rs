//! Command registry
//!
//! Every command is a row in [`COMMANDS`]. Lookups go through an alias index
//! built once on first use.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::output::{Formatter, TableLayout};

/// Which handler a command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Add,
    DevMode,
    Disable,
    Edit,
    Enable,
    Find,
    Help,
    Purge,
    Remove,
    List,
    Zones,
    AddZone,
    RemoveZone,
}

/// Static description of one command
#[derive(Debug)]
pub struct CommandSpec {
    pub name: &'static str,
    pub kind: CommandKind,
    pub aliases: &'static [&'static str],
    pub shortcut: Option<&'static str>,
    pub description: &'static str,
    pub required_params: &'static [&'static str],
    pub optional_params: &'static [&'static str],
    /// Join surplus positional words into the last declared parameter
    pub merge_trailing_params: bool,
    /// Runs against a zone, so `--domain` is mandatory
    pub needs_domain: bool,
    /// `None` prints the raw result
    pub formatter: Option<Formatter>,
}

impl CommandSpec {
    /// Required then optional parameter names, in binding order
    pub fn params(&self) -> impl Iterator<Item = &'static str> {
        self.required_params
            .iter()
            .chain(self.optional_params.iter())
            .copied()
    }
}

const RECORD_TABLE: TableLayout = TableLayout {
    head: &["Type", "Name", "Value", "TTL", "Active"],
    widths: &[8, 40, 50, 10, 10],
    fields: &["type", "name", "content", "ttl", "proxied"],
};

const ZONE_TABLE: TableLayout = TableLayout {
    head: &["Name", "Plan", "Active", "ID"],
    widths: &[50, 20, 10, 40],
    fields: &["name", "planName", "status", "id"],
};

pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "add",
        kind: CommandKind::Add,
        aliases: &["add", "addrecord"],
        shortcut: None,
        description: "Add a new record",
        required_params: &["name", "content"],
        optional_params: &[],
        merge_trailing_params: true,
        needs_domain: true,
        formatter: Some(Formatter::Message),
    },
    CommandSpec {
        name: "devmode",
        kind: CommandKind::DevMode,
        aliases: &["devmode"],
        shortcut: None,
        description: "Turn development mode on or off",
        required_params: &["mode"],
        optional_params: &[],
        merge_trailing_params: false,
        needs_domain: true,
        formatter: Some(Formatter::Message),
    },
    CommandSpec {
        name: "disable",
        kind: CommandKind::Disable,
        aliases: &["disable", "disablecf"],
        shortcut: None,
        description: "Disable Cloudflare proxying for the given record",
        required_params: &["name"],
        optional_params: &["content"],
        merge_trailing_params: false,
        needs_domain: true,
        formatter: Some(Formatter::Message),
    },
    CommandSpec {
        name: "edit",
        kind: CommandKind::Edit,
        aliases: &["edit", "editrecord"],
        shortcut: None,
        description: "Edit a DNS record",
        required_params: &["name", "content"],
        optional_params: &[],
        merge_trailing_params: false,
        needs_domain: true,
        formatter: Some(Formatter::Message),
    },
    CommandSpec {
        name: "enable",
        kind: CommandKind::Enable,
        aliases: &["enable", "enablecf"],
        shortcut: None,
        description: "Enable Cloudflare proxying for the given record",
        required_params: &["name"],
        optional_params: &["content"],
        merge_trailing_params: false,
        needs_domain: true,
        formatter: Some(Formatter::Message),
    },
    CommandSpec {
        name: "find",
        kind: CommandKind::Find,
        aliases: &["find"],
        shortcut: None,
        description: "Find records",
        required_params: &["name"],
        optional_params: &["content"],
        merge_trailing_params: false,
        needs_domain: true,
        formatter: Some(Formatter::Table(RECORD_TABLE)),
    },
    CommandSpec {
        name: "help",
        kind: CommandKind::Help,
        aliases: &["help"],
        shortcut: Some("h"),
        description: "Show help",
        required_params: &[],
        optional_params: &[],
        merge_trailing_params: false,
        needs_domain: false,
        formatter: Some(Formatter::Message),
    },
    CommandSpec {
        name: "purge",
        kind: CommandKind::Purge,
        aliases: &["purge", "purgefile", "purgecache"],
        shortcut: None,
        description: "Purge files (or everything) from the cache",
        required_params: &[],
        optional_params: &[],
        merge_trailing_params: false,
        needs_domain: true,
        formatter: None,
    },
    CommandSpec {
        name: "rm",
        kind: CommandKind::Remove,
        aliases: &["rm", "removerecord"],
        shortcut: None,
        description: "Remove every record matching the filter",
        required_params: &["name"],
        optional_params: &["content"],
        merge_trailing_params: false,
        needs_domain: true,
        formatter: Some(Formatter::Message),
    },
    CommandSpec {
        name: "ls",
        kind: CommandKind::List,
        aliases: &["ls", "listrecords", "list"],
        shortcut: None,
        description: "List records for the given domain",
        required_params: &[],
        optional_params: &[],
        merge_trailing_params: false,
        needs_domain: true,
        formatter: Some(Formatter::Table(RECORD_TABLE)),
    },
    CommandSpec {
        name: "zones",
        kind: CommandKind::Zones,
        aliases: &["zones", "listdomains"],
        shortcut: None,
        description: "List zones in your Cloudflare account",
        required_params: &[],
        optional_params: &[],
        merge_trailing_params: false,
        needs_domain: false,
        formatter: Some(Formatter::Table(ZONE_TABLE)),
    },
    CommandSpec {
        name: "addzone",
        kind: CommandKind::AddZone,
        aliases: &["addzone"],
        shortcut: None,
        description: "Add a zone to your account",
        required_params: &["name"],
        optional_params: &[],
        merge_trailing_params: false,
        needs_domain: false,
        formatter: Some(Formatter::Message),
    },
    CommandSpec {
        name: "rmzone",
        kind: CommandKind::RemoveZone,
        aliases: &["rmzone", "removezone"],
        shortcut: None,
        description: "Remove a zone from your account",
        required_params: &["name"],
        optional_params: &[],
        merge_trailing_params: false,
        needs_domain: false,
        formatter: Some(Formatter::Message),
    },
];

static BY_ALIAS: Lazy<HashMap<&'static str, &'static CommandSpec>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for spec in COMMANDS {
        for alias in spec.aliases.iter().chain(spec.shortcut.iter()) {
            let previous = index.insert(*alias, spec);
            assert!(previous.is_none(), "alias '{}' registered twice", alias);
        }
    }
    index
});

/// Look a command up by any alias or shortcut
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    BY_ALIAS.get(name).copied()
}

/// Like [`find`], falling back to `help` for unknown names
pub fn resolve(name: Option<&str>) -> &'static CommandSpec {
    name.and_then(find).unwrap_or_else(help)
}

fn help() -> &'static CommandSpec {
    COMMANDS
        .iter()
        .find(|spec| spec.kind == CommandKind::Help)
        .unwrap_or(&COMMANDS[0])
}
