//! Project records from the external registry.

use serde::{Deserialize, Serialize};

/// A project row in the registry. Read-only from the pipeline's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

/// Normalize a human-readable project name into a URL-safe identifier.
///
/// Same rule as identifier generation: lowercase, non `[a-z0-9-]` collapsed
/// to hyphens, runs of hyphens collapsed, leading/trailing hyphens trimmed.
pub fn sanitize_project_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_hyphen = false;

    for c in name.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            out.push('-');
            prev_hyphen = true;
        }
    }

    out.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_lowercases_and_hyphenates() {
        assert_eq!(sanitize_project_name("My Project"), "my-project");
        assert_eq!(sanitize_project_name("ACME Corp."), "acme-corp");
    }

    #[test]
    fn test_sanitize_collapses_hyphen_runs() {
        assert_eq!(sanitize_project_name("a -- b__c"), "a-b-c");
    }

    #[test]
    fn test_sanitize_trims_edges() {
        assert_eq!(sanitize_project_name("  spaced  "), "spaced");
        assert_eq!(sanitize_project_name("!!!"), "");
    }

    #[test]
    fn test_sanitize_keeps_existing_hyphens_and_digits() {
        assert_eq!(sanitize_project_name("proj-42"), "proj-42");
    }
}
