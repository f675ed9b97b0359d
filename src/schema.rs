use crate::error::ExportError;

/// Markers tied to one specific snapshot of the friends-page markup, kept in
/// one place so a format change only touches this module. Scanning is pure
/// substring search on exact literals; there is deliberately no DOM model.
pub struct FriendsPageSchema {
    fragment_delimiter: &'static str,
    link_base: &'static str,
    name_prefix: &'static str,
}

impl FriendsPageSchema {
    pub fn facebook() -> Self {
        FriendsPageSchema {
            fragment_delimiter: "<div data-visualcompletion=\"ignore-dynamic\" style=\"padding-left: 8px; padding-right: 8px;\">",
            link_base: "https://www.facebook.com/",
            name_prefix: "<svg aria-label=\"",
        }
    }

    /// Splits the document into per-contact fragments, dropping empty ones.
    /// Document order is preserved.
    pub fn segment<'a>(&self, document: &'a str) -> Vec<&'a str> {
        document
            .split(self.fragment_delimiter)
            .filter(|fragment| !fragment.is_empty())
            .collect()
    }

    /// First profile URL in the fragment, up to the closing quote. `None`
    /// means the fragment is not a contact block (e.g. UI decoration) and
    /// should be skipped.
    pub fn extract_link<'a>(&self, fragment: &'a str) -> Option<&'a str> {
        let start = fragment.find(self.link_base)?;
        let len = fragment[start..].find('"')?;
        Some(&fragment[start..start + len])
    }

    /// Display name from the first aria-label attribute. Every genuine
    /// contact fragment carries one, so a missing marker is an error.
    pub fn extract_name<'a>(&self, fragment: &'a str) -> Result<&'a str, ExportError> {
        let prefix = fragment
            .find(self.name_prefix)
            .ok_or(ExportError::NameMissing)?;
        let start = prefix + self.name_prefix.len();
        let len = fragment[start..].find('"').ok_or(ExportError::NameMissing)?;
        Ok(&fragment[start..start + len])
    }
}
