//! Guard names and the ordered guard list used for resolution.
use std::fmt;
use std::str::FromStr;

/// Name of one authentication guard (ex: `web`, `api`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GuardName(String);

impl GuardName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GuardName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Raw guard specification, before normalization.
///
/// Accepts the two shapes callers hand us:
/// - `Delimited("web, api")`
/// - `Names(vec!["web", "api"])`
#[derive(Debug, Clone)]
pub enum GuardSpec {
    Delimited(String),
    Names(Vec<String>),
}

impl From<&str> for GuardSpec {
    fn from(s: &str) -> Self {
        Self::Delimited(s.to_string())
    }
}

impl From<String> for GuardSpec {
    fn from(s: String) -> Self {
        Self::Delimited(s)
    }
}

impl From<Vec<String>> for GuardSpec {
    fn from(names: Vec<String>) -> Self {
        Self::Names(names)
    }
}

impl From<Vec<&str>> for GuardSpec {
    fn from(names: Vec<&str>) -> Self {
        Self::Names(names.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for GuardSpec {
    fn from(names: [&str; N]) -> Self {
        Self::Names(names.iter().map(|s| s.to_string()).collect())
    }
}

/// Ordered, normalized list of guards. Earlier entries win.
///
/// - names are trimmed
/// - empty names are dropped (`"web,,api"` == `["web", "api"]`)
/// - duplicates are kept as-is (the second occurrence is simply never reached)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardList(Vec<GuardName>);

impl GuardList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            names
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .map(GuardName)
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &GuardName> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<GuardSpec> for GuardList {
    fn from(spec: GuardSpec) -> Self {
        match spec {
            GuardSpec::Delimited(s) => Self::new(s.split(',')),
            GuardSpec::Names(names) => Self::new(names),
        }
    }
}

impl FromStr for GuardList {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.split(',')))
    }
}

impl fmt::Display for GuardList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(GuardName::as_str).collect();
        f.write_str(&names.join(","))
    }
}

impl<'a> IntoIterator for &'a GuardList {
    type Item = &'a GuardName;
    type IntoIter = std::slice::Iter<'a, GuardName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
