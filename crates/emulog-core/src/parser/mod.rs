//! Incremental, phased parser for the emulator's diagnostic log.
//!
//! The log is fed one line at a time. A fixed table of phases drives the
//! session: each phase accumulates raw text until its end marker appears,
//! then extracts structured fields from the accumulated buffer and runs its
//! post-processing steps. The session terminates on the final phase marker
//! (`Stop`), a prohibited-content hit (`Piracy`), a pattern mismatch
//! (`Fail`) or a runaway section (`Overflow`).

mod normalize;
mod phases;

use std::collections::BTreeMap;

use tracing::debug;

use crate::api::{ProductCatalog, ProductInfo, Sanitizer};
use crate::report::model::{EmbedReport, ReportError};
use crate::report::render;
use crate::triggers::TriggerList;
use phases::{LIBRARIES_PATTERN, PHASES, PostProcess, SERIAL_PATTERN};

/// A section that grows past this without reaching a phase boundary is
/// treated as malformed or hostile input.
pub const MAX_BUFFER_BYTES: usize = 16 * 1024 * 1024;

/// Outcome of a single `feed` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// Line consumed; keep feeding.
    Success,
    /// A configured prohibited-content trigger matched; session over.
    Piracy,
    /// Terminal phase boundary reached; session complete.
    Stop,
    /// Buffer ceiling exceeded without a phase boundary; session over.
    Overflow,
    /// A phase's extraction pattern did not match; session over.
    Fail,
}

/// Extracted fields, keyed by capture-group name. A key mapped to `None`
/// records a capture group that did not participate in its match.
pub type FieldMap = BTreeMap<String, Option<String>>;

/// One parsing session over one log stream. Never reused.
pub struct LogParser {
    buffer: String,
    phase_index: usize,
    fields: FieldMap,
    libraries: Vec<String>,
    trigger_reason: String,
    product_info: Option<ProductInfo>,
    outcome: Option<FeedStatus>,
    triggers: TriggerList,
    catalog: Box<dyn ProductCatalog>,
    sanitizer: Box<dyn Sanitizer>,
}

impl LogParser {
    pub fn new(
        triggers: TriggerList,
        catalog: Box<dyn ProductCatalog>,
        sanitizer: Box<dyn Sanitizer>,
    ) -> Self {
        Self {
            buffer: String::new(),
            phase_index: 0,
            fields: FieldMap::new(),
            libraries: Vec::new(),
            trigger_reason: String::new(),
            product_info: None,
            outcome: None,
            triggers,
            catalog,
            sanitizer,
        }
    }

    /// Advances the session by one input line.
    ///
    /// The line completes the active phase when it contains the phase's end
    /// marker, or when the line (trimmed) is exactly the marker; otherwise
    /// it is appended to the buffer. Once the session has terminated, every
    /// further call is ignored and repeats the terminal status.
    pub fn feed(&mut self, line: &str) -> FeedStatus {
        if let Some(status) = self.outcome {
            return status;
        }
        if self.buffer.len() > MAX_BUFFER_BYTES {
            self.terminate(FeedStatus::Overflow);
            return FeedStatus::Overflow;
        }

        let marker = PHASES[self.phase_index].end_marker;
        if line.contains(marker) || line.trim() == marker {
            match self.process_phase() {
                FeedStatus::Success => {
                    self.buffer.clear();
                    self.phase_index += 1;
                    FeedStatus::Success
                }
                status => {
                    self.terminate(status);
                    status
                }
            }
        } else {
            self.buffer.push('\n');
            self.buffer.push_str(line);
            FeedStatus::Success
        }
    }

    /// Runs the active phase's extraction pattern and post-processors over
    /// the accumulated buffer.
    fn process_phase(&mut self) -> FeedStatus {
        let phase = &PHASES[self.phase_index];

        if let Some(pattern) = phase.pattern {
            let text = format!("{}\n", self.buffer.trim());
            let Some(caps) = pattern.captures(&text) else {
                debug!(phase = self.phase_index, "extraction pattern did not match");
                return FeedStatus::Fail;
            };
            let mut extracted = FieldMap::new();
            for name in pattern.capture_names().flatten() {
                extracted.insert(
                    name.to_string(),
                    caps.name(name).map(|m| m.as_str().to_string()),
                );
            }
            normalize::normalize_captures(&mut extracted);
            self.fields.extend(extracted);
        }

        for step in phase.post {
            let status = match step {
                PostProcess::IdentityLookup => self.identity_lookup(),
                PostProcess::PiracyCheck => self.piracy_check(),
                PostProcess::LibraryList => self.extract_libraries(),
                PostProcess::Done => FeedStatus::Stop,
            };
            if status != FeedStatus::Success {
                return status;
            }
        }
        FeedStatus::Success
    }

    fn piracy_check(&mut self) -> FeedStatus {
        let hit = self.triggers.find_in(&self.buffer).map(str::to_owned);
        match hit {
            Some(trigger) => {
                self.trigger_reason = trigger;
                FeedStatus::Piracy
            }
            None => FeedStatus::Success,
        }
    }

    fn identity_lookup(&mut self) -> FeedStatus {
        let code = SERIAL_PATTERN
            .captures(&self.buffer)
            .and_then(|caps| caps.name("id"))
            .map(|m| m.as_str().to_string());
        let info = match code {
            Some(code) => self.catalog.lookup(&code),
            None => {
                debug!("no product serial found in the system section");
                ProductInfo::unknown()
            }
        };
        self.product_info = Some(info);
        FeedStatus::Success
    }

    /// Best-effort: a missing or malformed library list never fails the
    /// session, it just stays empty.
    fn extract_libraries(&mut self) -> FeedStatus {
        match split_libraries(&self.buffer) {
            Some(libraries) => self.libraries = libraries,
            None => debug!("library list missing or malformed, leaving it empty"),
        }
        FeedStatus::Success
    }

    /// Records the terminal outcome and sanitizes every extracted value and
    /// library name, exactly once per session.
    fn terminate(&mut self, status: FeedStatus) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(status);
        for value in self.fields.values_mut() {
            if let Some(v) = value {
                *v = self.sanitizer.sanitize(v);
            }
        }
        for library in &mut self.libraries {
            *library = self.sanitizer.sanitize(library);
        }
    }

    /// Renders the plain preformatted report. Defined only after `feed`
    /// returned `Stop`.
    pub fn text_report(&self) -> Result<String, ReportError> {
        render::render_text(self)
    }

    /// Renders the structured, sectioned report. Defined only after `feed`
    /// returned `Stop`.
    pub fn embed_report(&self) -> Result<EmbedReport, ReportError> {
        render::render_embed(self)
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }

    /// The prohibited-content trigger that matched, empty if none did.
    pub fn trigger(&self) -> &str {
        &self.trigger_reason
    }

    pub fn product_info(&self) -> Option<&ProductInfo> {
        self.product_info.as_ref()
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    /// Terminal status of the session, `None` while it is still running.
    pub fn outcome(&self) -> Option<FeedStatus> {
        self.outcome
    }

    pub fn is_complete(&self) -> bool {
        self.outcome == Some(FeedStatus::Stop)
    }
}

fn split_libraries(buffer: &str) -> Option<Vec<String>> {
    let caps = LIBRARIES_PATTERN.captures(buffer)?;
    let raw = caps.name("libraries")?.as_str().trim();
    // The first separator is part of the list syntax, not an entry.
    let rest = raw.get(1..)?;
    Some(
        rest.split('-')
            .map(|library| library.trim().replace(".sprx", ""))
            .collect(),
    )
}
