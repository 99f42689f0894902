use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Family of feature-test identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Queried with `__has_cpp_attribute(NAME)`.
    Attributes,
    /// Language macros, queried directly.
    Language,
    /// Library macros, queried directly after including `<version>`.
    Library,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Attributes, Kind::Language, Kind::Library];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Attributes => "attributes",
            Kind::Language => "language",
            Kind::Library => "library",
        }
    }

    /// Preprocessor expression that yields the identifier's value.
    pub fn query(self, name: &str) -> String {
        match self {
            Kind::Attributes => format!("__has_cpp_attribute({name})"),
            Kind::Language | Kind::Library => name.to_string(),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown kind: {s}"))
    }
}

/// Compiler and standard library implementation tracked by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Implementation {
    Clang,
    Gcc,
    Msvc,
}

impl Implementation {
    pub const ALL: [Implementation; 3] = [
        Implementation::Clang,
        Implementation::Gcc,
        Implementation::Msvc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Implementation::Clang => "clang",
            Implementation::Gcc => "gcc",
            Implementation::Msvc => "msvc",
        }
    }
}

impl fmt::Display for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Implementation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Implementation::ALL
            .into_iter()
            .find(|implementation| implementation.as_str() == s)
            .ok_or_else(|| format!("unknown implementation: {s}"))
    }
}
