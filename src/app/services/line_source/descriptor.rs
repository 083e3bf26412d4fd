//! Source descriptors
//!
//! Parses the strings users hand us (`prices.csv`, `file:///data/prices.csv`,
//! `-`) into concrete [`LineSource`]s. Network schemes are recognised only to
//! be refused with a clear error.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use super::sources::{FileSource, LineSource, StreamSource};
use crate::constants::STDIN_DESCRIPTOR;
use crate::{Error, Result};

/// Where a load should read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    /// Standard input of the process
    Stdin,
    /// A file on the local filesystem
    File(PathBuf),
}

impl SourceDescriptor {
    /// Build the line source this descriptor names
    pub fn into_source(self) -> Arc<dyn LineSource> {
        match self {
            SourceDescriptor::Stdin => Arc::new(StreamSource::stdin()),
            SourceDescriptor::File(path) => Arc::new(FileSource::new(path)),
        }
    }
}

impl FromStr for SourceDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::configuration("Source descriptor cannot be empty"));
        }

        if trimmed == STDIN_DESCRIPTOR {
            return Ok(SourceDescriptor::Stdin);
        }

        if let Some((scheme, rest)) = trimmed.split_once("://") {
            if is_uri_scheme(scheme) {
                if scheme.eq_ignore_ascii_case("file") {
                    if rest.is_empty() {
                        return Err(Error::unsupported_source(trimmed, "file URI has no path"));
                    }
                    return Ok(SourceDescriptor::File(PathBuf::from(rest)));
                }
                return Err(Error::unsupported_source(
                    trimmed,
                    format!(
                        "scheme '{}' is not supported; fetch the data and pass a file or '-'",
                        scheme
                    ),
                ));
            }
        }

        Ok(SourceDescriptor::File(PathBuf::from(trimmed)))
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceDescriptor::Stdin => write!(f, "{}", STDIN_DESCRIPTOR),
            SourceDescriptor::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// RFC 3986 scheme: a letter followed by letters, digits, `+`, `-` or `.`
fn is_uri_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}
