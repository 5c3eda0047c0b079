use std::fmt;

/// A package name with an optional version, written `name@version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageId {
    pub name: String,
    pub version: Option<String>,
}

impl PackageId {
    /// Parse `"name@version"`, splitting on the last `@`.
    ///
    /// A string without a separator has no version. A leading `@` belongs to
    /// a scoped name such as `@babel/core` and never separates a version.
    pub fn parse(s: &str) -> Self {
        match s.rfind('@') {
            Some(idx) if idx > 0 => Self {
                name: s[..idx].to_string(),
                version: Some(s[idx + 1..].to_string()),
            },
            _ => Self {
                name: s.to_string(),
                version: None,
            },
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}@{}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}
