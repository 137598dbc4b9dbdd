//! Release tag names.

use semver::Version;
use std::fmt;

/// Tag identifier of a release: `[<component>-]v<version>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagName {
    component: Option<String>,
    version: Version,
}

impl TagName {
    /// Tag for `version`, prefixed with `component` when given
    pub fn new(component: Option<String>, version: Version) -> Self {
        Self { component, version }
    }

    /// Component prefix, if any
    pub fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }

    /// Semantic version carried by the tag
    pub fn version(&self) -> &Version {
        &self.version
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.component {
            Some(component) => write!(f, "{}-v{}", component, self.version),
            None => write!(f, "v{}", self.version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_without_component() {
        let tag = TagName::new(None, Version::new(1, 2, 3));
        assert_eq!(tag.to_string(), "v1.2.3");
    }

    #[test]
    fn test_format_with_component() {
        let tag = TagName::new(
            Some("kodegen-core".to_string()),
            Version::parse("2.0.0-beta.1").expect("valid version"),
        );
        assert_eq!(tag.to_string(), "kodegen-core-v2.0.0-beta.1");
        assert_eq!(tag.version().major, 2);
        assert_eq!(tag.component(), Some("kodegen-core"));
    }
}
