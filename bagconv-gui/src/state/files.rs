//! Capture list with per-file selection.

/// One capture in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub selected: bool,
}

/// Captures found in the chosen directory, in display order.
#[derive(Default)]
pub struct FileSelection {
    pub entries: Vec<FileEntry>,
}

impl FileSelection {
    /// Replace the list; every capture starts selected.
    pub fn load(&mut self, names: Vec<String>) {
        self.entries = names
            .into_iter()
            .map(|name| FileEntry {
                name,
                selected: true,
            })
            .collect();
    }

    pub fn set_all(&mut self, selected: bool) {
        for entry in &mut self.entries {
            entry.selected = selected;
        }
    }

    /// Names of the selected captures, in list order.
    #[must_use]
    pub fn selected_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.name.clone())
            .collect()
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.entries.iter().filter(|e| e.selected).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
