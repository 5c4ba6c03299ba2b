//! Built-in template expansion.

use std::io;
use std::path::Path;

use rayon::prelude::*;
use spec_complete_core::{SpecSuggestion, SuggestionKind, TemplateKind, TemplateSuggestion};
use tracing::debug;

use crate::env::{EntryKind, Environment};

/// Priority of every template entry.
pub const TEMPLATE_PRIORITY: i32 = 55;

/// Expands `templates` against `cwd`, kinds in parallel.
///
/// Results keep the order of `templates`. A kind that fails contributes
/// nothing.
pub fn run_templates(
    templates: &[TemplateKind],
    env: &dyn Environment,
    cwd: &Path,
) -> Vec<TemplateSuggestion> {
    templates
        .par_iter()
        .map(|kind| match run_template(*kind, env, cwd) {
            Ok(suggestions) => suggestions,
            Err(e) => {
                debug!(cwd = %cwd.display(), template = %kind, error = %e, "Template failed");
                Vec::new()
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

fn run_template(
    kind: TemplateKind,
    env: &dyn Environment,
    cwd: &Path,
) -> io::Result<Vec<TemplateSuggestion>> {
    let include_files = match kind {
        TemplateKind::Filepaths => true,
        TemplateKind::Folders => false,
        TemplateKind::History | TemplateKind::Help => return Ok(Vec::new()),
    };

    let mut entries = env.read_dir(cwd)?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            let suggestion_kind = match entry.kind {
                EntryKind::Directory => SuggestionKind::Folder,
                EntryKind::File if include_files => SuggestionKind::File,
                _ => return None,
            };
            Some(TemplateSuggestion {
                suggestion: SpecSuggestion::named(entry.name)
                    .with_kind(suggestion_kind)
                    .with_priority(TEMPLATE_PRIORITY),
                template: kind,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostEnvironment;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("utils")).unwrap();
        std::fs::create_dir(dir.path().join("components")).unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        dir
    }

    fn names(suggestions: &[TemplateSuggestion]) -> Vec<&str> {
        suggestions
            .iter()
            .map(|s| s.suggestion.name[0].as_str())
            .collect()
    }

    #[test]
    fn test_filepaths_lists_files_and_folders_sorted() {
        let dir = fixture();
        let result = run_templates(&[TemplateKind::Filepaths], &HostEnvironment::new(), dir.path());
        assert_eq!(names(&result), ["a.txt", "b.txt", "components", "utils"]);
        assert_eq!(result[0].suggestion.kind, Some(SuggestionKind::File));
        assert_eq!(result[2].suggestion.kind, Some(SuggestionKind::Folder));
        assert!(result.iter().all(|s| s.suggestion.priority == Some(TEMPLATE_PRIORITY)));
    }

    #[test]
    fn test_folders_only_lists_directories() {
        let dir = fixture();
        let result = run_templates(&[TemplateKind::Folders], &HostEnvironment::new(), dir.path());
        assert_eq!(names(&result), ["components", "utils"]);
        assert!(result.iter().all(|s| s.template == TemplateKind::Folders));
    }

    #[test]
    fn test_history_and_help_are_empty() {
        let dir = fixture();
        let result = run_templates(
            &[TemplateKind::History, TemplateKind::Help],
            &HostEnvironment::new(),
            dir.path(),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_kinds_keep_order_and_failures_are_isolated() {
        let dir = fixture();
        let env = HostEnvironment::new();
        let result = run_templates(
            &[TemplateKind::Folders, TemplateKind::Filepaths],
            &env,
            dir.path(),
        );
        assert_eq!(result.len(), 6);
        assert_eq!(result[0].template, TemplateKind::Folders);
        assert_eq!(result[2].template, TemplateKind::Filepaths);

        let missing = dir.path().join("missing");
        assert!(run_templates(&[TemplateKind::Filepaths], &env, &missing).is_empty());
    }
}
