use serde::Deserialize;

/// Ordered list of prohibited-content substrings.
///
/// Supplied as deployment configuration; matching is case-insensitive and
/// reports the first configured trigger found, not the first occurrence in
/// the scanned text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct TriggerList {
    triggers: Vec<String>,
}

impl TriggerList {
    pub fn new<I, S>(triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            triggers: triggers.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the first configured trigger contained in `text`.
    pub fn find_in(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        self.triggers
            .iter()
            .find(|trigger| haystack.contains(&trigger.to_lowercase()))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_is_case_insensitive_both_ways() {
        let list = TriggerList::new(["WaReZ Loader"]);
        assert_eq!(list.find_in("booting warez loader v2"), Some("WaReZ Loader"));
        assert_eq!(list.find_in("WAREZ LOADER"), Some("WaReZ Loader"));
        assert_eq!(list.find_in("clean log"), None);
    }

    #[test]
    fn first_configured_trigger_wins() {
        let list = TriggerList::new(["alpha", "beta"]);
        // Both are present; configured order decides.
        assert_eq!(list.find_in("beta then alpha"), Some("alpha"));
    }

    #[test]
    fn deserializes_from_json_array() {
        let list: TriggerList = serde_json::from_str(r#"["one", "two"]"#).unwrap();
        assert_eq!(list.find_in("TWO"), Some("two"));
    }
}
