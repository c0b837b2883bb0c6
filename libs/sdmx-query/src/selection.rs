//! One-or-many value selections used by query fields

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wildcard matching every value
pub const REST_ALL: &str = "*";

/// Token selecting the latest version
pub const REST_LATEST: &str = "~";

/// Translate a symbolic token into its SDMX-REST 1.x keyword
pub(crate) fn v1_keyword(value: &str) -> &str {
    match value {
        REST_ALL => "all",
        REST_LATEST => "latest",
        other => other,
    }
}

/// Translate an SDMX-REST 1.x keyword back into its symbolic token
pub(crate) fn from_v1_keyword(value: &str) -> &str {
    match value {
        "all" => REST_ALL,
        "latest" => REST_LATEST,
        other => other,
    }
}

/// The values selected for a query field: a single value or a list.
///
/// An empty selection is the wildcard: building from `""` or from an empty
/// list yields `*`, so "not specified" and "everything" are the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "SelectionRepr", into = "SelectionRepr")]
pub struct Selection(Vec<String>);

impl Selection {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values
            .into_iter()
            .map(|v| {
                let v: String = v.into();
                v.trim().to_string()
            })
            .filter(|v| !v.is_empty())
            .collect();

        if values.is_empty() {
            Self::all()
        } else {
            Self(values)
        }
    }

    /// The wildcard selection (`*`)
    pub fn all() -> Self {
        Self(vec![REST_ALL.to_string()])
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn is_all(&self) -> bool {
        self.is(REST_ALL)
    }

    /// Whether this selection is exactly the single value `value`
    pub fn is(&self, value: &str) -> bool {
        matches!(self.0.as_slice(), [only] if only == value)
    }

    /// Whether this selection is one of the given single values
    pub fn is_any_of(&self, values: &[&str]) -> bool {
        values.iter().any(|v| self.is(v))
    }

    pub fn is_multiple(&self) -> bool {
        self.0.len() > 1
    }

    /// Join the values with `,` after passing each through `map`
    pub fn join_with<'a, F>(&'a self, map: F) -> String
    where
        F: Fn(&'a str) -> &'a str,
    {
        self.0
            .iter()
            .map(|v| map(v.as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parse a comma-separated list, as found in SDMX-REST URLs
    pub fn parse_list(raw: &str) -> Self {
        Self::new(raw.split(','))
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        Self::new([value])
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        Self::new([value])
    }
}

impl From<&String> for Selection {
    fn from(value: &String) -> Self {
        Self::new([value.as_str()])
    }
}

impl From<Vec<&str>> for Selection {
    fn from(values: Vec<&str>) -> Self {
        Self::new(values)
    }
}

impl From<Vec<String>> for Selection {
    fn from(values: Vec<String>) -> Self {
        Self::new(values)
    }
}

impl From<&[&str]> for Selection {
    fn from(values: &[&str]) -> Self {
        Self::new(values.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Selection {
    fn from(values: [&str; N]) -> Self {
        Self::new(values)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SelectionRepr {
    One(String),
    Many(Vec<String>),
}

impl From<SelectionRepr> for Selection {
    fn from(repr: SelectionRepr) -> Self {
        match repr {
            SelectionRepr::One(value) => Selection::from(value),
            SelectionRepr::Many(values) => Selection::new(values),
        }
    }
}

impl From<Selection> for SelectionRepr {
    fn from(selection: Selection) -> Self {
        let mut values = selection.0;
        if values.len() == 1 {
            SelectionRepr::One(values.remove(0))
        } else {
            SelectionRepr::Many(values)
        }
    }
}
