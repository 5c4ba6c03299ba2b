//! Output formatting for suggestions and tokens.

use spec_complete_engine::{CommandToken, SuggestionBlob};

/// Supported output formats.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// Formats a completion result in the requested output format.
pub fn format_suggestions(blob: &SuggestionBlob, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(blob)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(blob).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(suggestions_to_table(blob)),
    }
}

/// Formats tokenizer output in the requested output format.
pub fn format_tokens(tokens: &[CommandToken], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(tokens)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(tokens).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(tokens_to_table(tokens)),
    }
}

fn suggestions_to_table(blob: &SuggestionBlob) -> String {
    let mut out = String::new();

    if let Some(ref desc) = blob.argument_description {
        out.push_str(&format!("Argument: {desc}\n"));
    }

    let max_name = blob
        .suggestions
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(4);

    for suggestion in &blob.suggestions {
        out.push_str(&format!(
            "{} {:<width$}  {:>3}",
            suggestion.icon.glyph(),
            suggestion.name,
            suggestion.priority,
            width = max_name
        ));
        if let Some(ref desc) = suggestion.description {
            out.push_str(&format!("  {desc}"));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "{} suggestion(s), drop {} character(s)\n",
        blob.suggestions.len(),
        blob.characters_to_drop
    ));
    out
}

fn tokens_to_table(tokens: &[CommandToken]) -> String {
    let mut out = String::new();
    let max_text = tokens
        .iter()
        .map(|t| t.text.chars().count())
        .max()
        .unwrap_or(4);

    for token in tokens {
        let mut flags = Vec::new();
        if token.complete {
            flags.push("complete");
        }
        if token.is_option {
            flags.push("option");
        }
        if token.is_quoted {
            flags.push("quoted");
        }
        out.push_str(&format!("{:<width$}  {}\n", token.text, flags.join(","), width = max_text));
    }
    out
}
