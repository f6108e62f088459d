/// Status text per watched root.
///
/// Keeps first-insertion order so that rebuilding the menu from unchanged
/// state lists roots in the same order every time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchStatus {
    entries: Vec<(String, String)>,
}

impl WatchStatus {
    /// Set the text for `root`, keeping its position if already present.
    pub fn upsert(&mut self, root: String, text: String) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == root) {
            Some((_, current)) => *current = text,
            None => self.entries.push((root, text)),
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Status text of `root`, if any.
    pub fn get(&self, root: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == root)
            .map(|(_, text)| text.as_str())
    }

    /// Number of roots with a status text.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no root has a status text.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(root, text)` pairs in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(root, text)| (root.as_str(), text.as_str()))
    }
}
