//! Documentation generator for the recognized settings
//!
//! Generates a markdown reference from [`catalog`](crate::config::catalog).

use crate::config::{SettingMetadata, catalog};
use std::fmt::Write;

/// Configuration for docs generation
#[derive(Debug, Clone, Default)]
pub struct DocsConfig {
    /// Title for the documentation
    pub title: Option<String>,
    /// Description/introduction text
    pub description: Option<String>,
    /// Whether to group by namespace
    pub group_by_namespace: bool,
}

impl DocsConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            group_by_namespace: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    #[must_use]
    pub fn flat(mut self) -> Self {
        self.group_by_namespace = false;
        self
    }
}

/// Generate markdown documentation for every recognized setting
#[must_use]
pub fn generate_docs(config: DocsConfig) -> String {
    generate_docs_from_metadata(&catalog(), config)
}

/// Generate docs from an arbitrary list of rows
#[must_use]
pub fn generate_docs_from_metadata(metadata: &[SettingMetadata], config: DocsConfig) -> String {
    let mut output = String::new();

    let title = config
        .title
        .unwrap_or_else(|| "Server Configuration Reference".to_string());
    let _ = writeln!(output, "# {title}\n");

    if let Some(desc) = config.description {
        let _ = writeln!(output, "{desc}\n");
    }

    let mut settings: Vec<&SettingMetadata> = metadata.iter().collect();
    settings.sort_by(|a, b| (a.namespace(), a.key).cmp(&(b.namespace(), b.key)));

    if config.group_by_namespace {
        let mut current: Option<&str> = None;

        for meta in settings {
            let namespace = meta.namespace();
            if current != Some(namespace) {
                if current.is_some() {
                    output.push('\n');
                }
                let _ = writeln!(output, "## `{namespace}`\n");
                write_table_header(&mut output);
                current = Some(namespace);
            }
            format_setting(&mut output, meta);
        }
    } else {
        output.push_str("## Settings\n\n");
        write_table_header(&mut output);
        for meta in settings {
            format_setting(&mut output, meta);
        }
    }

    output
}

fn write_table_header(out: &mut String) {
    out.push_str("| Key | Type | Default | Description |\n");
    out.push_str("|-----|------|---------|-------------|\n");
}

fn format_setting(out: &mut String, meta: &SettingMetadata) {
    let mut description = meta.description.replace('|', "\\|");
    if let Some(rule) = meta.rule {
        let note = match rule {
            crate::config::PostRule::CeilPow2 => "Rounded up to a power of two.",
        };
        if !description.is_empty() {
            description.push(' ');
        }
        description.push_str(note);
    }

    let _ = writeln!(
        out,
        "| `{}` | {} | `{}` | {} |",
        meta.key, meta.kind, meta.default, description
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DefaultValue, KEYS, SettingKind};

    #[test]
    fn test_generate_docs() {
        let docs = generate_docs(
            DocsConfig::new()
                .with_title("Server Settings")
                .with_description("Keys read from server.conf"),
        );

        assert!(docs.starts_with("# Server Settings\n"));
        assert!(docs.contains("Keys read from server.conf"));
        assert!(docs.contains("## `http.net`"));
        assert!(docs.contains("## `cairo`"));
        assert!(docs.contains("## `line.udp`"));
        for key in KEYS {
            assert!(docs.contains(&format!("`{key}`")), "{key} missing");
        }
    }

    #[test]
    fn test_row_format() {
        let rows = [SettingMetadata {
            key: "http.worker.count",
            kind: SettingKind::Int,
            default: DefaultValue::Int(2),
            rule: None,
            description: "Workers | threads",
        }];

        let docs = generate_docs_from_metadata(&rows, DocsConfig::new().flat());

        assert!(docs.contains("## Settings"));
        assert!(docs.contains("| `http.worker.count` | int | `2` | Workers \\| threads |"));
    }

    #[test]
    fn test_post_rule_is_noted() {
        let docs = generate_docs(DocsConfig::new());
        let row = docs
            .lines()
            .find(|l| l.contains("`cairo.index.value.block.size`"))
            .unwrap();
        assert!(row.contains("power of two"));
    }
}
