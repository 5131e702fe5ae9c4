//! Collaborator seams of the log parser.
//!
//! The parser itself never resolves product codes and never decides how a
//! value becomes safe to display; both concerns are injected behind these
//! traits so a deployment can swap in its own database or escaping rules.

pub mod product;

pub use product::{CatalogEntry, ProductInfo, StaticCatalog};

/// Resolves a product serial code to descriptive metadata.
///
/// Implementations are total: a code that cannot be resolved yields a
/// record with an `"Unknown"` status instead of an error.
pub trait ProductCatalog {
    fn lookup(&self, code: &str) -> ProductInfo;
}

/// Maps an arbitrary extracted string to a safe-for-display string.
///
/// Applied exactly once per value, when a parsing session terminates.
pub trait Sanitizer {
    fn sanitize(&self, value: &str) -> String;
}

/// Default sanitizer for reports rendered into code-fenced blocks.
///
/// Drops control characters and rewrites backticks so a hostile log line
/// cannot terminate the fence it is printed inside. Newlines are kept:
/// some extracted values span lines and render as preformatted blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownSanitizer;

impl Sanitizer for MarkdownSanitizer {
    fn sanitize(&self, value: &str) -> String {
        value
            .chars()
            .filter(|c| *c == '\n' || !c.is_control())
            .map(|c| if c == '`' { '\'' } else { c })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizer_strips_control_characters() {
        let s = MarkdownSanitizer;
        assert_eq!(s.sanitize("abc\x07de\x1b[31mf"), "abcde[31mf");
    }

    #[test]
    fn sanitizer_neutralizes_backticks() {
        let s = MarkdownSanitizer;
        assert_eq!(s.sanitize("```rm -rf```"), "'''rm -rf'''");
    }

    #[test]
    fn sanitizer_keeps_newlines_in_multiline_values() {
        let s = MarkdownSanitizer;
        assert_eq!(
            s.sanitize("RPCS3 v0.0.5 | HEAD\nIntel i7 | AVX+\r\x07"),
            "RPCS3 v0.0.5 | HEAD\nIntel i7 | AVX+"
        );
    }

    #[test]
    fn sanitizer_passes_ordinary_values_through() {
        let s = MarkdownSanitizer;
        assert_eq!(s.sanitize("Recompiler (LLVM)"), "Recompiler (LLVM)");
    }
}
