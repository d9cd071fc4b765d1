use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::helpers::Helpers;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("reading intermediate file '{}'", .path.display())]
    ReadSource { path: PathBuf, source: io::Error },

    #[error("'{}' is not valid json", .path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("'{}' has no \"types\" field", .path.display())]
    MissingTypes { path: PathBuf },

    #[error("\"types\" in '{}' is {found}, expected a string", .path.display())]
    TypesNotString { path: PathBuf, found: &'static str },

    #[error("writing '{}'", .path.display())]
    WriteDestination { path: PathBuf, source: io::Error },

    #[error("invalid alias '{0}', expected <name> or <Alias>=<name>")]
    InvalidAlias(String),

    #[error("alias '{0}' is declared more than once")]
    DuplicateAlias(String),
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Reads the intermediate file and returns its `"types"` string. No other key
/// is looked at.
pub fn read_generated_types(path: &Path) -> Result<String, SyncError> {
    let raw = std::fs::read(path).map_err(|source| SyncError::ReadSource {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = raw.len(), "read intermediate file");

    let mut document: Value = serde_json::from_slice(&raw).map_err(|source| SyncError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let types = document
        .get_mut("types")
        .map(Value::take)
        .ok_or_else(|| SyncError::MissingTypes {
            path: path.to_path_buf(),
        })?;

    match types {
        Value::String(types) => Ok(types),
        other => Err(SyncError::TypesNotString {
            path: path.to_path_buf(),
            found: json_kind(&other),
        }),
    }
}

pub fn compose(types: &str, helpers: &Helpers) -> String {
    format!("{types}\n{helpers}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    File(PathBuf),
    Stdout,
}

impl Target {
    fn display_path(&self) -> PathBuf {
        match self {
            Target::File(path) => path.clone(),
            Target::Stdout => PathBuf::from("<stdout>"),
        }
    }
}

#[derive(Debug)]
pub struct Job {
    pub source: PathBuf,
    pub target: Target,
    pub helpers: Helpers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub bytes: usize,
    pub target: Target,
}

impl Job {
    /// Runs one synchronisation. The source is read and decoded in full before
    /// the destination is opened, so a failing source never touches it.
    pub fn run(&self) -> Result<Outcome, SyncError> {
        let types = read_generated_types(&self.source)?;
        tracing::debug!(
            tables = self.helpers.tables().len(),
            enums = self.helpers.enums().len(),
            "rendering helper types"
        );
        let content = compose(&types, &self.helpers);

        let written = match &self.target {
            // truncates, no backup
            Target::File(path) => std::fs::write(path, &content),
            Target::Stdout => io::stdout().lock().write_all(content.as_bytes()),
        };
        written.map_err(|source| SyncError::WriteDestination {
            path: self.target.display_path(),
            source,
        })?;

        tracing::info!(
            destination = %self.target.display_path().display(),
            bytes = content.len(),
            "wrote type definitions"
        );

        Ok(Outcome {
            bytes: content.len(),
            target: self.target.clone(),
        })
    }
}
