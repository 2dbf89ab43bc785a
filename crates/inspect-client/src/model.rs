//! Request and response types exchanged with the inspection service

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::proto;

/// Source languages the inspection service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageId {
    /// Python
    #[serde(rename = "Python")]
    Python,
    /// Kotlin
    #[serde(rename = "kotlin")]
    Kotlin,
}

impl LanguageId {
    /// Every supported language.
    pub const ALL: [LanguageId; 2] = [LanguageId::Python, LanguageId::Kotlin];

    /// The identifier the service resolves languages by.
    pub fn as_str(self) -> &'static str {
        match self {
            LanguageId::Python => "Python",
            LanguageId::Kotlin => "kotlin",
        }
    }

    /// Guess the language from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "py" => Some(LanguageId::Python),
            "kt" | "kts" => Some(LanguageId::Kotlin),
            _ => None,
        }
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageId {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageId::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ClientError::InvalidArgument(format!("unsupported language: {s:?}")))
    }
}

impl From<LanguageId> for proto::LanguageId {
    fn from(lang: LanguageId) -> Self {
        match lang {
            LanguageId::Python => proto::LanguageId::Python,
            LanguageId::Kotlin => proto::LanguageId::Kotlin,
        }
    }
}

impl From<proto::LanguageId> for LanguageId {
    fn from(lang: proto::LanguageId) -> Self {
        match lang {
            proto::LanguageId::Python => LanguageId::Python,
            proto::LanguageId::Kotlin => LanguageId::Kotlin,
        }
    }
}

/// Source text tagged with its language.
///
/// Immutable once built; passed by value into [`InspectionClient::inspect`].
///
/// [`InspectionClient::inspect`]: crate::InspectionClient::inspect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Code {
    text: String,
    language_id: LanguageId,
}

impl Code {
    /// Create a request for `text` written in `language_id`.
    pub fn new(text: impl Into<String>, language_id: LanguageId) -> Self {
        Self {
            text: text.into(),
            language_id,
        }
    }

    /// Create a request from a textual language identifier.
    ///
    /// Fails with [`ClientError::InvalidArgument`] if the language is unknown.
    pub fn parse(text: impl Into<String>, language: &str) -> Result<Self, ClientError> {
        Ok(Self::new(text, language.parse()?))
    }

    /// The source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The source language.
    pub fn language_id(&self) -> LanguageId {
        self.language_id
    }
}

impl From<Code> for proto::Code {
    fn from(code: Code) -> Self {
        proto::Code {
            text: code.text,
            language_id: proto::LanguageId::from(code.language_id).into(),
        }
    }
}

impl TryFrom<proto::Code> for Code {
    type Error = ClientError;

    fn try_from(code: proto::Code) -> Result<Self, Self::Error> {
        let lang = proto::LanguageId::try_from(code.language_id).map_err(|_| {
            ClientError::InvalidArgument(format!("unknown language id {}", code.language_id))
        })?;
        Ok(Code::new(code.text, lang.into()))
    }
}

/// A single diagnostic reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// Human-readable description
    pub name: String,
    /// Short name of the inspection that produced it
    pub inspector: String,
    /// Line the problem was reported on
    pub line_number: i64,
    /// Text offset of the element, or -1 if unknown
    pub offset: i64,
    /// Length of the element, or -1 if unknown
    pub length: i64,
}

/// Diagnostics returned for one [`Code`] submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionResult {
    /// Problems in the order the service reported them
    pub problems: Vec<Problem>,
}

impl From<proto::Problem> for Problem {
    fn from(p: proto::Problem) -> Self {
        Self {
            name: p.name,
            inspector: p.inspector,
            line_number: p.line_number,
            offset: p.offset,
            length: p.length,
        }
    }
}

impl From<Problem> for proto::Problem {
    fn from(p: Problem) -> Self {
        Self {
            name: p.name,
            inspector: p.inspector,
            line_number: p.line_number,
            offset: p.offset,
            length: p.length,
        }
    }
}

impl From<proto::InspectionResult> for InspectionResult {
    fn from(result: proto::InspectionResult) -> Self {
        Self {
            problems: result.problems.into_iter().map(Problem::from).collect(),
        }
    }
}

impl From<InspectionResult> for proto::InspectionResult {
    fn from(result: InspectionResult) -> Self {
        Self {
            problems: result.problems.into_iter().map(proto::Problem::from).collect(),
        }
    }
}
