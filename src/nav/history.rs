/// One entry of the browser history stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub sequence_id: u64,
    pub url: String,
}

impl HistoryEntry {
    pub fn new(sequence_id: u64, url: impl Into<String>) -> Self {
        Self {
            sequence_id,
            url: url.into(),
        }
    }
}

/// The browser's session history as the controller sees it
pub trait BrowserHistory: Send {
    /// Add an entry after the current one, dropping any forward entries.
    fn push(&mut self, entry: HistoryEntry);
    /// Overwrite the current entry in place.
    fn replace(&mut self, entry: HistoryEntry);
    fn current(&self) -> Option<HistoryEntry>;
    fn len(&self) -> usize;
    /// Step back; returns the entry that became current.
    fn back(&mut self) -> Option<HistoryEntry>;
    fn forward(&mut self) -> Option<HistoryEntry>;
    /// Make the entry stamped `sequence_id` current again, without touching
    /// the stack. `None` if no such entry exists.
    fn go_to(&mut self, sequence_id: u64) -> Option<HistoryEntry>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process history stack
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History holding the page that was loaded, before any navigation.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry::new(0, url)],
            cursor: 0,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

impl BrowserHistory for MemoryHistory {
    fn push(&mut self, entry: HistoryEntry) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;
    }

    fn replace(&mut self, entry: HistoryEntry) {
        match self.entries.get_mut(self.cursor) {
            Some(current) => *current = entry,
            None => self.push(entry),
        }
    }

    fn current(&self) -> Option<HistoryEntry> {
        self.entries.get(self.cursor).cloned()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn back(&mut self) -> Option<HistoryEntry> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    fn forward(&mut self) -> Option<HistoryEntry> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    fn go_to(&mut self, sequence_id: u64) -> Option<HistoryEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.sequence_id == sequence_id)?;
        self.cursor = index;
        self.current()
    }
}
