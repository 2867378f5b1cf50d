//! Shared output formatting for tasktrack CLI commands.

use serde::Serialize;

use crate::error::{Error, JsonError, Result};

pub const SCHEMA_VERSION: &str = "tasktrack.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    lines: Vec<String>,
    warnings: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            lines: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Body line printed verbatim below the header
    pub fn push_line(&mut self, value: impl Into<String>) {
        self.lines.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let warnings = human.map(|h| h.warnings.clone()).unwrap_or_default();

        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            data: &'a T,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            warnings: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            warnings,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }

    if let Some(human) = human {
        println!("{}", format_human(human));
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let hint = error_hint(err);
    if json {
        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: JsonError,
            #[serde(skip_serializing_if = "Option::is_none")]
            hint: Option<&'a str>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: JsonError::from(err),
            hint,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = Vec::with_capacity(output.lines.len() + output.warnings.len() + 1);
    if !output.header.is_empty() {
        lines.push(output.header.clone());
    }
    lines.extend(output.lines.iter().cloned());
    for warning in &output.warnings {
        lines.push(format!("warning: {warning}"));
    }
    lines.join("\n")
}

/// Best-effort name of the subcommand being run, for error envelopes.
pub fn infer_command_name_from_args() -> String {
    command_name_from(std::env::args().skip(1))
}

/// Global options that consume the following argument as their value
const OPTIONS_WITH_VALUE: [&str; 1] = ["--file"];

fn command_name_from<I>(args: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if OPTIONS_WITH_VALUE.contains(&arg.as_str()) {
            args.next();
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        return arg;
    }
    "tasktrack".to_string()
}

fn error_hint(err: &Error) -> Option<&'static str> {
    match err {
        Error::NotFound(_) => Some("tasktrack list"),
        Error::InvalidConfig(_) | Error::TomlParse(_) => Some("fix .tasktrack.toml then retry"),
        Error::CorruptStorage { .. } => Some("move the unreadable task file aside and retry"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_output_lists_lines_after_header() {
        let mut human = HumanOutput::new("Tasks:");
        human.push_line("1. a - todo");
        human.push_line("2. b - done");
        human.push_warning("repaired file");

        assert_eq!(
            format_human(&human),
            "Tasks:\n1. a - todo\n2. b - done\nwarning: repaired file"
        );
    }

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn command_name_skips_option_values() {
        assert_eq!(
            command_name_from(args(&["--file", "x.json", "delete", "9", "--json"])),
            "delete"
        );
        assert_eq!(
            command_name_from(args(&["--file=x.json", "-q", "list"])),
            "list"
        );
        assert_eq!(command_name_from(args(&["--json"])), "tasktrack");
        assert_eq!(command_name_from(args(&["--file"])), "tasktrack");
    }

    #[test]
    fn empty_header_is_skipped() {
        let mut human = HumanOutput::new("");
        human.push_line("No tasks.");
        assert_eq!(format_human(&human), "No tasks.");
    }
}
