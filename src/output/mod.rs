//! Output formatting module

use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ColumnConstraint, ContentArrangement, Table, Width};
use owo_colors::OwoColorize;
use serde_json::Value;

use crate::config::OutputFormat;

/// What a command handler produced
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Informational lines, printed verbatim
    Messages(Vec<String>),
    /// Record-shaped rows for tabular display
    Rows(Vec<Value>),
}

impl CommandOutput {
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Messages(vec![msg.into()])
    }
}

/// Fixed table shape declared alongside a command
#[derive(Debug)]
pub struct TableLayout {
    pub head: &'static [&'static str],
    pub widths: &'static [u16],
    pub fields: &'static [&'static str],
}

/// How a command's output is rendered
#[derive(Debug)]
pub enum Formatter {
    Message,
    Table(TableLayout),
}

impl Formatter {
    /// Render to the lines that end up on stdout
    pub fn render(&self, output: &CommandOutput, format: OutputFormat) -> Result<Vec<String>> {
        match self {
            Formatter::Message => Ok(render_messages(output)),
            Formatter::Table(layout) => layout.render(output, format),
        }
    }
}

fn render_messages(output: &CommandOutput) -> Vec<String> {
    match output {
        CommandOutput::Messages(lines) => lines.clone(),
        CommandOutput::Rows(rows) => rows.iter().map(|row| cell(Some(row))).collect(),
    }
}

impl TableLayout {
    fn render(&self, output: &CommandOutput, format: OutputFormat) -> Result<Vec<String>> {
        let rows = match output {
            CommandOutput::Rows(rows) => rows,
            CommandOutput::Messages(_) => return Ok(render_messages(output)),
        };

        match format {
            OutputFormat::Json => Ok(vec![serde_json::to_string(rows)?]),
            OutputFormat::Csv => Ok(rows
                .iter()
                .map(|row| self.project(row).join(","))
                .collect()),
            OutputFormat::Table => {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(self.head.to_vec())
                    .set_constraints(
                        self.widths
                            .iter()
                            .map(|w| ColumnConstraint::UpperBoundary(Width::Fixed(*w))),
                    );
                for row in rows {
                    table.add_row(self.project(row));
                }
                Ok(vec![table.to_string()])
            }
        }
    }

    /// Pick the configured fields of a row, in order
    fn project(&self, row: &Value) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| cell(row.get(*field)))
            .collect()
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Print rendered lines
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

/// Print error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}
