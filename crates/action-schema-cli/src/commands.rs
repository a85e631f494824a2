use action_schema_config::Config;
use action_schema_engine::{
    ActionSchema, DRAFT_07, Document, depends_on_to_csv, io, read_schema_file, write_schema_file,
};
use anyhow::{Context, Result, bail};
use std::fmt::Write as _;
use std::fs;
use std::path::{self, Path};

use crate::cli::Command;

/// Run one command against the schema file at `path`, returning what to print
pub fn run(command: &Command, path: &Path, lenient: bool) -> Result<String> {
    match command {
        Command::Init { force, .. } => {
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            write_schema_file(path, &ActionSchema::new())?;
            Ok(format!("Created {}", path.display()))
        }
        Command::Show => {
            let schema = read_schema_file(path)?;
            Ok(render_summary(&schema, path))
        }
        Command::Export => Ok(io::export_schema(&read_schema_file(path)?)),
        Command::Import { source } => {
            let text = fs::read_to_string(source)
                .with_context(|| format!("Failed to read {}", source.display()))?;
            let mut doc = load_or_new(path)?;
            let patch = doc.import(&text)?;
            write_schema_file(path, doc.schema())?;
            Ok(format!(
                "Imported {} actions into {}",
                patch.changed.len(),
                path.display()
            ))
        }
        _ => {
            let Some(cmd) = command.edit()? else {
                bail!("not an edit command");
            };
            let mut doc = Document::from_schema(read_schema_file(path)?);

            let patch = if lenient {
                doc.apply_lenient(cmd)
            } else {
                doc.apply(cmd)?
            };

            if patch.is_noop() {
                return Ok("No changes".to_string());
            }
            write_schema_file(path, doc.schema())?;
            Ok(format!("Updated {}", patch.changed.join(", ")))
        }
    }
}

/// The config to save after `init --remember`, keeping other settings of
/// `existing`
pub fn remembered_config(schema_path: &Path, existing: Option<Config>) -> Result<Config> {
    let schema_path = path::absolute(schema_path)
        .with_context(|| format!("Failed to resolve {}", schema_path.display()))?;
    Ok(match existing {
        Some(config) => Config {
            schema_path,
            ..config
        },
        None => Config::new(schema_path),
    })
}

fn load_or_new(path: &Path) -> Result<Document> {
    if path.exists() {
        Ok(Document::from_schema(read_schema_file(path)?))
    } else {
        Ok(Document::new())
    }
}

/// Human-readable overview of a schema
pub fn render_summary(schema: &ActionSchema, path: &Path) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {} actions", path.display(), schema.len());
    if schema.dialect != DRAFT_07 {
        let _ = writeln!(out, "dialect: {}", schema.dialect);
    }

    for (name, action) in &schema.properties {
        let _ = writeln!(out);
        let _ = writeln!(out, "{name}");
        if !action.description.is_empty() {
            let _ = writeln!(out, "  description: {}", action.description);
        }
        if let Some(action_type) = action.action_type {
            let _ = writeln!(out, "  type: {action_type}");
        }
        if let Some(webhook) = &action.webhook_constants {
            let method = webhook.method.map(|m| m.as_str()).unwrap_or("?");
            let url = webhook.url.as_deref().unwrap_or("?");
            let _ = writeln!(out, "  webhook: {method} {url}");
        }
        if let Some(validators) = &action.validators {
            let enabled: Vec<_> = validators
                .iter()
                .filter(|(_, on)| **on)
                .map(|(v, _)| v.short_name())
                .collect();
            if !enabled.is_empty() {
                let _ = writeln!(out, "  validators: {}", enabled.join(", "));
            }
        }
        if let Some(paths) = action.depends_on.as_deref().filter(|p| !p.is_empty()) {
            let _ = writeln!(out, "  depends on: {}", depends_on_to_csv(paths));
        }

        for (index, example) in action.examples().iter().enumerate() {
            let includes: Vec<String> = example
                .assistant_action_includes
                .iter()
                .map(|(reference, fields)| {
                    let mut label = reference.clone();
                    if !fields.is_empty() {
                        let pairs: Vec<_> =
                            fields.iter().map(|(k, v)| format!("{k}={v}")).collect();
                        label.push_str(&format!(" ({})", pairs.join(", ")));
                    }
                    if !schema.contains(reference) {
                        label.push_str(" [missing]");
                    }
                    label
                })
                .collect();
            let _ = write!(out, "  [{index}] {:?}", example.user_says);
            if !includes.is_empty() {
                let _ = write!(out, " -> {}", includes.join(", "));
            }
            let _ = writeln!(out);
        }
    }

    out
}
