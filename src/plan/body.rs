//! Release pull request body parsing.
//!
//! A release PR body lists one release per component. Multi-component bodies
//! wrap each release in `<details><summary>component: 1.2.3</summary>...`;
//! single-component bodies hold one changelog section between the `---`
//! header and footer rules, headed by `## [1.2.3](...)` or `## 1.2.3`.

use regex::Regex;
use std::sync::LazyLock;

static DETAILS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<details[^>]*>\s*<summary>(?P<summary>.*?)</summary>(?P<notes>.*?)</details>")
        .expect("details regex is valid")
});

static SUMMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:(?P<component>[^:\s]+):?\s+)?v?(?P<version>\d+\.\d+\.\d+\S*)\s*$")
        .expect("summary regex is valid")
});

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#{1,3}\s+\[?v?(?P<version>\d+\.\d+\.\d+[^\]\s)]*)")
        .expect("heading regex is valid")
});

/// One release announced in a pull request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSection {
    /// Component name, absent for single-component bodies
    pub component: Option<String>,
    /// Version string as written in the body
    pub version: String,
    /// Release notes
    pub notes: String,
}

/// Extract every release announced in `body`
pub fn parse_release_sections(body: &str) -> Vec<ReleaseSection> {
    let detailed: Vec<ReleaseSection> = DETAILS_RE
        .captures_iter(body)
        .filter_map(|caps| {
            let summary = SUMMARY_RE.captures(caps.name("summary")?.as_str())?;
            Some(ReleaseSection {
                component: summary.name("component").map(|m| m.as_str().to_string()),
                version: summary["version"].to_string(),
                notes: caps["notes"].trim().to_string(),
            })
        })
        .collect();

    if !detailed.is_empty() {
        return detailed;
    }

    let content = strip_header_and_footer(body);
    HEADING_RE
        .captures(content)
        .map(|caps| ReleaseSection {
            component: None,
            version: caps["version"].to_string(),
            notes: content.trim().to_string(),
        })
        .into_iter()
        .collect()
}

/// Text between the first and last `---` rule, or the whole body
fn strip_header_and_footer(body: &str) -> &str {
    let rules: Vec<usize> = body
        .match_indices("---")
        .filter(|(index, _)| {
            let line_start = *index == 0 || body[..*index].ends_with('\n');
            let line_end = body[index + 3..].starts_with('\n')
                || body[index + 3..].starts_with("\r\n")
                || index + 3 == body.len();
            line_start && line_end
        })
        .map(|(index, _)| index)
        .collect();

    match (rules.first(), rules.last()) {
        (Some(&first), Some(&last)) if first != last => &body[first + 3..last],
        (Some(&first), _) => &body[first + 3..],
        _ => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: &str = ":robot: I have created a release *beep* *boop*
---


## [1.2.0](https://github.com/cyrup-ai/kodegen/compare/v1.1.0...v1.2.0) (2024-05-01)


### Features

* add tag fallback

---
This PR was generated with [Release Please](https://github.com/googleapis/release-please).";

    const MULTI: &str = ":robot: I have created a release *beep* *boop*
---


<details><summary>core: 1.0.0</summary>

## 1.0.0 (2024-05-01)

* first release
</details>

<details><summary>cli: 1.2.0</summary>

## [1.2.0](https://github.com/cyrup-ai/kodegen/compare/cli-v1.1.0...cli-v1.2.0) (2024-05-01)

* new flag
</details>

---
This PR was generated with [Release Please](https://github.com/googleapis/release-please).";

    #[test]
    fn test_single_component_body() {
        let sections = parse_release_sections(SINGLE);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].component, None);
        assert_eq!(sections[0].version, "1.2.0");
        assert!(sections[0].notes.starts_with("## [1.2.0]"));
        assert!(sections[0].notes.contains("* add tag fallback"));
        assert!(!sections[0].notes.contains("This PR was generated"));
    }

    #[test]
    fn test_multi_component_body() {
        let sections = parse_release_sections(MULTI);
        assert_eq!(sections.len(), 2);

        assert_eq!(sections[0].component.as_deref(), Some("core"));
        assert_eq!(sections[0].version, "1.0.0");
        assert!(sections[0].notes.contains("* first release"));

        assert_eq!(sections[1].component.as_deref(), Some("cli"));
        assert_eq!(sections[1].version, "1.2.0");
    }

    #[test]
    fn test_summary_without_component() {
        let body = "<details><summary>2.0.0</summary>\n\nnotes\n</details>";
        let sections = parse_release_sections(body);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].component, None);
        assert_eq!(sections[0].version, "2.0.0");
        assert_eq!(sections[0].notes, "notes");
    }

    #[test]
    fn test_body_without_release() {
        assert!(parse_release_sections("Just a regular pull request").is_empty());
        assert!(parse_release_sections("").is_empty());
    }
}
