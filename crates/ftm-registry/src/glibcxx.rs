//! Import of libstdc++ support data from its `version.def` AutoGen file.
//!
//! The file is a tree of `name = value;` and `name = { ... };` definitions.
//! Each `ftms` group describes one library macro and the values libstdc++
//! defines it to, newest first.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::error::{RegistryError, Result};

/// Macros in `version.def` are named without this prefix.
pub const LIBRARY_MACRO_PREFIX: &str = "__cpp_lib_";
const INTERNAL_MACRO_PREFIX: &str = "__glibcxx_";
const GTHREADS_MACRO: &str = "_GLIBCXX_HAS_GTHREADS";
const CXX11_ABI_MACRO: &str = "_GLIBCXX_USE_CXX11_ABI";

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//[^\n]*").expect("static regex"));
static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("static regex"));
static AUTOGEN_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"AutoGen Definitions[^\n]*;").expect("static regex"));
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(\w+|"[^"]*")"#).expect("static regex"));
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+$").expect("static regex"));

/// One definition's right-hand side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    Text(String),
    /// A name repeated with `{ ... }` bodies collects every body.
    Groups(Vec<Definitions>),
}

pub type Definitions = BTreeMap<String, Definition>;

/// Split the file into words, quoted strings and single punctuation characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let text = LINE_COMMENT.replace_all(text, "");
    let text = BLOCK_COMMENT.replace_all(&text, "");
    let text = AUTOGEN_HEADER.replace_all(&text, "");

    let mut rest = text.trim();
    let mut tokens = Vec::new();
    while let Some(first) = rest.chars().next() {
        let len = TOKEN
            .find(rest)
            .map_or(first.len_utf8(), |token| token.end());
        tokens.push(rest[..len].to_string());
        rest = rest[len..].trim_start();
    }
    tokens
}

struct Parser<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        match self.peek() {
            Some(found) if found == token => {
                self.pos += 1;
                Ok(())
            }
            found => Err(RegistryError::version_def(format!(
                "expected `{token}`, found {}",
                found.map_or_else(|| "end of input".to_string(), |t| format!("`{t}`"))
            ))),
        }
    }

    fn find(&self, token: &str) -> Result<usize> {
        self.tokens[self.pos..]
            .iter()
            .position(|t| t == token)
            .map(|offset| self.pos + offset)
            .ok_or_else(|| RegistryError::version_def(format!("missing `{token}`")))
    }

    fn definitions(&mut self) -> Result<Definitions> {
        let mut result = Definitions::new();
        while let Some(token) = self.peek()
            && WORD.is_match(token)
        {
            let equals = self.find("=")?;
            let name = self.tokens[self.pos..equals].concat();
            self.pos = equals + 1;

            if self.peek() == Some("{") {
                self.pos += 1;
                let body = self.definitions()?;
                self.expect("}")?;
                self.expect(";")?;
                match result
                    .entry(name)
                    .or_insert_with(|| Definition::Groups(Vec::new()))
                {
                    Definition::Groups(groups) => groups.push(body),
                    Definition::Text(_) => {
                        return Err(RegistryError::version_def(
                            "name used both as a value and a group",
                        ));
                    }
                }
            } else {
                let semicolon = self.find(";")?;
                let parts = &self.tokens[self.pos..semicolon];
                if parts.len() != 1 && !parts.first().is_some_and(|p| p.starts_with('"')) {
                    return Err(RegistryError::version_def(format!(
                        "unquoted multi-token value for {name}"
                    )));
                }
                if result.contains_key(&name) {
                    return Err(RegistryError::version_def(format!(
                        "duplicate value for {name}"
                    )));
                }
                result.insert(name, Definition::Text(parts.concat()));
                self.pos = semicolon + 1;
            }
        }
        Ok(result)
    }
}

pub fn parse_definitions(text: &str) -> Result<Definitions> {
    let tokens = tokenize(text);
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
    };
    let definitions = parser.definitions()?;
    if let Some(token) = parser.peek() {
        return Err(RegistryError::version_def(format!("unexpected `{token}`")));
    }
    Ok(definitions)
}

/// One value libstdc++ may define a macro to, and under which conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlibcxxValue {
    pub value: u32,
    /// Standard number without the `C++` prefix.
    pub cxxmin: Option<String>,
    pub gthread: Option<bool>,
    pub cxx11abi: Option<bool>,
    pub extra_cond: Option<String>,
}

impl GlibcxxValue {
    /// Preprocessor condition over libstdc++ configuration macros.
    pub fn depends(&self) -> Option<String> {
        let mut depends = Vec::new();
        match self.gthread {
            Some(true) => depends.push(format!("defined({GTHREADS_MACRO})")),
            Some(false) => depends.push(format!("!defined({GTHREADS_MACRO})")),
            None => {}
        }
        match self.cxx11abi {
            Some(true) => depends.push(CXX11_ABI_MACRO.to_string()),
            Some(false) => depends.push(format!("!{CXX11_ABI_MACRO}")),
            None => {}
        }
        if let Some(extra) = &self.extra_cond {
            depends.push(
                extra
                    .replace('"', "")
                    .replace(INTERNAL_MACRO_PREFIX, LIBRARY_MACRO_PREFIX),
            );
        }
        (!depends.is_empty()).then(|| depends.join(" && "))
    }

    /// Support entry in registry key order.
    pub fn to_support_entry(&self) -> Mapping {
        let mut entry = Mapping::new();
        if let Some(cxxmin) = &self.cxxmin {
            entry.insert("since".into(), format!("C++{cxxmin}").into());
        }
        if let Some(depends) = self.depends() {
            entry.insert("depends".into(), depends.into());
        }
        entry.insert("value".into(), self.value.into());
        entry
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlibcxxMacro {
    /// Full macro name including `__cpp_lib_`.
    pub name: String,
    /// In file order, newest first.
    pub values: Vec<GlibcxxValue>,
}

impl GlibcxxMacro {
    /// Support list in registry order, ascending by value.
    pub fn support(&self) -> Vec<Value> {
        self.values
            .iter()
            .rev()
            .map(|value| Value::Mapping(value.to_support_entry()))
            .collect()
    }
}

fn text<'a>(definitions: &'a Definitions, key: &str) -> Option<&'a str> {
    match definitions.get(key) {
        Some(Definition::Text(text)) => Some(text),
        _ => None,
    }
}

fn groups<'a>(definitions: &'a Definitions, key: &str) -> &'a [Definitions] {
    match definitions.get(key) {
        Some(Definition::Groups(groups)) => groups,
        _ => &[],
    }
}

fn yes_no(definitions: &Definitions, key: &str) -> Result<Option<bool>> {
    match text(definitions, key) {
        None => Ok(None),
        Some("yes") => Ok(Some(true)),
        Some("no") => Ok(Some(false)),
        Some(other) => Err(RegistryError::version_def(format!(
            "{key} must be yes or no, not {other}"
        ))),
    }
}

fn glibcxx_value(definitions: &Definitions) -> Result<GlibcxxValue> {
    let raw =
        text(definitions, "v").ok_or_else(|| RegistryError::version_def("value without v"))?;
    let value = raw
        .parse()
        .map_err(|_| RegistryError::version_def(format!("invalid value {raw}")))?;
    Ok(GlibcxxValue {
        value,
        cxxmin: text(definitions, "cxxmin").map(str::to_string),
        gthread: yes_no(definitions, "gthread")?,
        cxx11abi: yes_no(definitions, "cxx11abi")?,
        extra_cond: text(definitions, "extra_cond").map(str::to_string),
    })
}

/// Parse every `ftms` entry of a `version.def` file.
pub fn parse_version_def(text_input: &str) -> Result<Vec<GlibcxxMacro>> {
    let definitions = parse_definitions(text_input)?;
    let ftms = groups(&definitions, "ftms");
    if ftms.is_empty() {
        return Err(RegistryError::version_def("no ftms entries"));
    }
    ftms.iter()
        .map(|ftm| {
            let name = text(ftm, "name")
                .ok_or_else(|| RegistryError::version_def("ftms entry without name"))?;
            let values = groups(ftm, "values")
                .iter()
                .map(glibcxx_value)
                .collect::<Result<Vec<_>>>()?;
            Ok(GlibcxxMacro {
                name: format!("{LIBRARY_MACRO_PREFIX}{name}"),
                values,
            })
        })
        .collect()
}

/// Outcome of replacing gcc support in a registry document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub updated: Vec<String>,
    /// Macros libstdc++ knows about that the registry does not list.
    pub missing: Vec<String>,
}

/// Replace the gcc support list of every library feature libstdc++ defines.
///
/// Works on the untyped document so that keys keep their order when the
/// registry is written back.
pub fn apply_glibcxx(document: &mut Value, macros: &[GlibcxxMacro]) -> Result<ImportSummary> {
    let library = document
        .get_mut("library")
        .and_then(Value::as_sequence_mut)
        .ok_or_else(|| RegistryError::InvalidDocument {
            message: "missing library section".to_string(),
        })?;

    let mut summary = ImportSummary::default();
    for ftm in macros {
        let Some(feature) = library
            .iter_mut()
            .find(|feature| feature.get("name").and_then(Value::as_str) == Some(ftm.name.as_str()))
        else {
            warn!(name = %ftm.name, "cannot find macro");
            summary.missing.push(ftm.name.clone());
            continue;
        };
        let Some(feature) = feature.as_mapping_mut() else {
            continue;
        };
        if !feature.get("support").is_some_and(Value::is_mapping) {
            feature.insert("support".into(), Value::Mapping(Mapping::new()));
        }
        if let Some(support) = feature.get_mut("support").and_then(Value::as_mapping_mut) {
            support.insert("gcc".into(), Value::Sequence(ftm.support()));
        }
        debug!(name = %ftm.name, values = ftm.values.len(), "updated gcc support");
        summary.updated.push(ftm.name.clone());
    }
    Ok(summary)
}
