//! Resolves the CLI's `paths` argument into a concrete, filtered, ordered
//! list of source files.

use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "vue"];

fn has_source_extension(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// One `+pattern` (include) or `-pattern` (exclude) filter rule.
struct FilterRule {
    include: bool,
    regex: Regex,
}

/// Parses the `--filter` list. A leading `+` or `-` selects include/exclude;
/// patterns with neither prefix default to include.
fn parse_filters(patterns: &[String]) -> Result<Vec<FilterRule>, regex::Error> {
    patterns
        .iter()
        .map(|raw| {
            let (include, pattern) = match raw.strip_prefix('-') {
                Some(rest) => (false, rest),
                None => (true, raw.strip_prefix('+').unwrap_or(raw)),
            };
            Regex::new(pattern).map(|regex| FilterRule { include, regex })
        })
        .collect()
}

/// A file survives iff the last matching rule is an include, or no rule
/// matches at all (default include, matching a plain allowlist having no
/// effect on files it never mentions).
fn passes_filters(path: &str, rules: &[FilterRule]) -> bool {
    let mut verdict = true;
    for rule in rules {
        if rule.regex.is_match(path) {
            verdict = rule.include;
        }
    }
    verdict
}

/// Walks `paths` (files used directly, directories walked recursively),
/// collects candidate source files, and applies the ordered filter list.
/// Output order: the order `paths` were given, then walk order within each
/// directory — stable so two runs over the same tree produce the same file
/// list.
pub fn discover(paths: &[PathBuf], filters: &[String]) -> Result<Vec<PathBuf>, regex::Error> {
    let rules = parse_filters(filters)?;
    let mut found = Vec::new();
    for root in paths {
        if root.is_dir() {
            for entry in WalkDir::new(root).sort_by_file_name() {
                let Ok(entry) = entry else { continue };
                if entry.file_type().is_file() && has_source_extension(entry.path()) {
                    found.push(entry.into_path());
                }
            }
        } else {
            found.push(root.clone());
        }
    }
    found.retain(|path| passes_filters(&path.to_string_lossy(), &rules));
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_exclude_rule_wins_over_earlier_include() {
        let rules = parse_filters(&["+.*".to_owned(), "-vendor".to_owned()]).unwrap();
        assert!(passes_filters("src/app.js", &rules));
        assert!(!passes_filters("src/vendor/lib.js", &rules));
    }

    #[test]
    fn no_matching_rule_defaults_to_included() {
        let rules = parse_filters(&["-vendor".to_owned()]).unwrap();
        assert!(passes_filters("src/app.js", &rules));
    }

    #[test]
    fn non_source_extensions_are_never_discovered() {
        assert!(!has_source_extension(Path::new("README.md")));
        assert!(has_source_extension(Path::new("index.mjs")));
    }
}
