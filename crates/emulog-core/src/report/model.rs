use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a renderer needs a field the parsing session never produced.
///
/// Renderers are only defined over sessions that reached the terminal phase;
/// a missing key means the caller rendered too early or the phase schema
/// drifted, and must surface loudly instead of printing a blank report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("missing report field: {0}")]
    MissingField(&'static str),
    #[error("report requested before product identification ran")]
    NoProductInfo,
}

/// Structured report: a titled document with named sections.
///
/// This is the stable JSON contract of the crate; how it is delivered
/// (chat embed, web view, ...) is up to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmbedReport {
    pub title: String,
    pub description: String,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedReport {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            fields: Vec::new(),
        }
    }

    pub fn add_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }
}
