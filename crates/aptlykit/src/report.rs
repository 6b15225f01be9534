//! Parser for aptly `show` reports
//!
//! `aptly snapshot show` and `aptly publish show` print unindented
//! `Field: value` headers. One header may be exactly `Sources:`; the
//! indented lines right after it are the sources, each shaped
//! `[<component>: ]<name> [<tag>]`:
//!
//! ```text
//! Prefix: s3:mybucket
//! Sources:
//!   main: my-snap [snapshot]
//!   contrib: other-snap [snapshot]
//! Distribution: stable
//! ```

use std::collections::BTreeSet;

/// Kind marker of a source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceTag {
    /// `[snapshot]`
    Snapshot,
    /// `[repo]`
    Repo,
    /// Any other marker, kept verbatim
    Other(String),
}

impl SourceTag {
    fn parse(tag: &str) -> Self {
        match tag {
            "snapshot" => Self::Snapshot,
            "repo" => Self::Repo,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One entry of a `Sources:` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Component, present in publish reports only
    pub component: Option<String>,
    pub name: String,
    pub tag: SourceTag,
}

/// A parsed report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Unindented `Field: value` headers, in report order
    pub fields: Vec<(String, String)>,
    /// Entries of the `Sources:` section, in report order
    pub sources: Vec<SourceEntry>,
}

impl Report {
    /// Parse a report. Lines that fit no known shape are ignored.
    pub fn parse(text: &str) -> Self {
        let mut report = Self::default();
        let mut in_sources = false;

        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }

            if !line.starts_with(char::is_whitespace) {
                let header = line.trim_end();
                in_sources = header == "Sources:";
                if !in_sources && let Some((key, value)) = header.split_once(':') {
                    report
                        .fields
                        .push((key.trim().to_string(), value.trim().to_string()));
                }
                continue;
            }

            if in_sources && let Some(entry) = parse_source_line(line) {
                report.sources.push(entry);
            }
        }

        report
    }

    /// Value of the first header named `key`
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Names of all snapshot-tagged sources, regardless of component
    pub fn snapshot_sources(&self) -> BTreeSet<String> {
        self.sources
            .iter()
            .filter(|s| s.tag == SourceTag::Snapshot)
            .map(|s| s.name.clone())
            .collect()
    }
}

/// Parse `[<component>: ]<name> [<tag>]`
fn parse_source_line(line: &str) -> Option<SourceEntry> {
    let line = line.trim();
    let body = line.strip_suffix(']')?;
    let open = body.rfind('[')?;
    let tag = &body[open + 1..];
    let head = body[..open].trim();

    let (component, name) = match head.split_once(": ") {
        Some((component, name)) => (Some(component.trim().to_string()), name.trim()),
        None => (None, head),
    };

    if name.is_empty() || tag.is_empty() {
        return None;
    }

    Some(SourceEntry {
        component,
        name: name.to_string(),
        tag: SourceTag::parse(tag),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_report_keeps_only_snapshot_sources() {
        let report = Report::parse(
            "Name: my-snap\n\
             Sources:\n  other-snap [snapshot]\n  unrelated [repo]\n\
             Description: test\n",
        );
        assert_eq!(report.field("Name"), Some("my-snap"));
        assert_eq!(report.field("Description"), Some("test"));
        assert_eq!(report.sources.len(), 2);
        assert_eq!(
            report.snapshot_sources(),
            BTreeSet::from(["other-snap".to_string()])
        );
    }

    #[test]
    fn test_publish_report_unions_components() {
        let report = Report::parse(
            "Prefix: s3:mybucket\n\
             Sources:\n  main: my-snap [snapshot]\n  contrib: other-snap [snapshot]\n\
             Distribution: stable\n",
        );
        assert_eq!(report.field("Prefix"), Some("s3:mybucket"));
        assert_eq!(report.sources[0].component.as_deref(), Some("main"));
        assert_eq!(report.sources[1].component.as_deref(), Some("contrib"));
        assert_eq!(
            report.snapshot_sources(),
            BTreeSet::from(["my-snap".to_string(), "other-snap".to_string()])
        );
    }

    #[test]
    fn test_same_snapshot_in_two_components_counted_once() {
        let report = Report::parse(
            "Sources:\n  main: shared [snapshot]\n  non-free: shared [snapshot]\n",
        );
        assert_eq!(report.snapshot_sources().len(), 1);
    }

    #[test]
    fn test_missing_sources_section() {
        let report = Report::parse("Name: lonely\nDescription: nothing here\n");
        assert!(report.sources.is_empty());
        assert!(report.snapshot_sources().is_empty());
    }

    #[test]
    fn test_section_ends_at_unindented_line() {
        let report = Report::parse(
            "Sources:\n  first [snapshot]\nNumber of packages: 3\n  stray [snapshot]\n",
        );
        assert_eq!(
            report.snapshot_sources(),
            BTreeSet::from(["first".to_string()])
        );
    }

    #[test]
    fn test_section_runs_to_end_of_report() {
        let report = Report::parse("Name: s\nSources:\n\ta [snapshot]\n  b [snapshot]");
        assert_eq!(
            report.snapshot_sources(),
            BTreeSet::from(["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_untagged_and_malformed_lines_are_discarded() {
        let report = Report::parse("Sources:\n  no-tag\n  [snapshot]\n  ok [snapshot]\n");
        assert_eq!(report.sources.len(), 1);
        assert_eq!(report.sources[0].name, "ok");
    }

    #[test]
    fn test_other_tags_are_kept_but_not_snapshots() {
        let report = Report::parse("Sources:\n  main: local-repo [local]\n");
        assert_eq!(report.sources[0].tag, SourceTag::Other("local".into()));
        assert!(report.snapshot_sources().is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let report = Report::parse("Name: s\r\nSources:\r\n  a [snapshot]\r\n");
        assert_eq!(report.field("Name"), Some("s"));
        assert_eq!(
            report.snapshot_sources(),
            BTreeSet::from(["a".to_string()])
        );
    }
}
