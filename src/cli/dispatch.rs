//! Command dispatch: validate, run the handler, format the result

use anyhow::Result;
use tracing::debug;

use crate::api::client::Credentials;
use crate::api::{CloudflareClient, DnsProvider};
use crate::cli::dns::{self, RecordArgs};
use crate::cli::registry::CommandKind;
use crate::cli::{cache, help, params, zones, Invocation};
use crate::error::CliError;
use crate::output::{self, CommandOutput};

/// Check global options and positional parameters before anything is sent.
/// Returns the credentials to authenticate with.
pub fn validate(inv: &Invocation) -> Result<Credentials, CliError> {
    let mut missing = Vec::new();
    if inv.options.token.is_none() {
        missing.push("token".to_string());
    }
    if inv.spec.needs_domain && inv.options.domain.is_none() {
        missing.push("domain".to_string());
    }
    if !missing.is_empty() {
        return Err(CliError::MissingOptions(missing));
    }

    let missing_params = params::missing_required(inv.spec, &inv.params);
    if !missing_params.is_empty() {
        return Err(CliError::MissingParameters(missing_params));
    }

    let token = inv.options.token.as_deref().unwrap_or_default();
    Ok(Credentials::new(token, inv.options.email.as_deref()))
}

/// Run the handler behind the invocation's command
pub async fn execute(
    provider: &dyn DnsProvider,
    inv: &Invocation,
) -> Result<CommandOutput, CliError> {
    debug!("running {} with {:?}", inv.spec.name, inv.params);

    match inv.spec.kind {
        CommandKind::Help => Ok(help::show()),
        CommandKind::Add => dns::add(provider, &RecordArgs::from_invocation(inv)?).await,
        CommandKind::Edit => dns::edit(provider, &RecordArgs::from_invocation(inv)?).await,
        CommandKind::Enable => {
            dns::enable_proxy(provider, &RecordArgs::from_invocation(inv)?).await
        }
        CommandKind::Disable => {
            dns::disable_proxy(provider, &RecordArgs::from_invocation(inv)?).await
        }
        CommandKind::Find => dns::find_record(provider, &RecordArgs::from_invocation(inv)?).await,
        CommandKind::Remove => dns::remove(provider, &RecordArgs::from_invocation(inv)?).await,
        CommandKind::List => dns::list_records(provider, domain(inv)?).await,
        CommandKind::Purge => cache::purge(provider, domain(inv)?, &inv.positional[1..]).await,
        CommandKind::DevMode => cache::dev_mode(provider, domain(inv)?, param(inv, "mode")?).await,
        CommandKind::Zones => zones::list_zones(provider).await,
        CommandKind::AddZone => zones::add_zone(provider, param(inv, "name")?).await,
        CommandKind::RemoveZone => zones::remove_zone(provider, param(inv, "name")?).await,
    }
}

fn domain(inv: &Invocation) -> Result<&str, CliError> {
    inv.options
        .domain
        .as_deref()
        .ok_or_else(|| CliError::MissingOptions(vec!["domain".to_string()]))
}

fn param<'a>(inv: &'a Invocation, name: &str) -> Result<&'a str, CliError> {
    inv.param(name)
        .ok_or_else(|| CliError::MissingParameters(vec![name.to_string()]))
}

/// Turn a handler result into output lines using the command's formatter
pub fn render(inv: &Invocation, output: &CommandOutput) -> Result<Vec<String>> {
    match &inv.spec.formatter {
        Some(formatter) => formatter.render(output, inv.options.format),
        None => raw(output),
    }
}

/// Commands without a formatter print their result as-is
fn raw(output: &CommandOutput) -> Result<Vec<String>> {
    Ok(match output {
        CommandOutput::Messages(lines) => lines.clone(),
        CommandOutput::Rows(rows) => rows
            .iter()
            .map(serde_json::to_string_pretty)
            .collect::<std::result::Result<_, _>>()?,
    })
}

/// Validate, call the API and print. Any error means a non-zero exit.
pub async fn run(inv: Invocation) -> Result<()> {
    let lines = if inv.spec.kind == CommandKind::Help {
        render(&inv, &help::show())?
    } else {
        let credentials = validate(&inv)?;
        let client = CloudflareClient::new(credentials)?;
        let result = execute(&client, &inv).await?;
        render(&inv, &result)?
    };

    output::print_lines(&lines);
    Ok(())
}
