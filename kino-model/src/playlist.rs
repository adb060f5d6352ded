use crate::files::FileItem;

/// An explicit navigation list with a cursor.
///
/// The first/last flags are derived, never stored. An empty list has no
/// current item and both flags are false.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistItems {
    current_index: Option<usize>,
    items: Vec<FileItem>,
}

impl PlaylistItems {
    pub fn new(current_index: usize, items: Vec<FileItem>) -> Self {
        let current_index = (current_index < items.len()).then_some(current_index);
        Self {
            current_index,
            items,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// A list holding just one item, with the cursor on it.
    pub fn singleton(item: FileItem) -> Self {
        Self {
            current_index: Some(0),
            items: vec![item],
        }
    }

    pub fn items(&self) -> &[FileItem] {
        &self.items
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current(&self) -> Option<&FileItem> {
        self.current_index.and_then(|i| self.items.get(i))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_first_item(&self) -> bool {
        self.current_index == Some(0)
    }

    pub fn is_last_item(&self) -> bool {
        match self.current_index {
            Some(i) => i + 1 == self.items.len(),
            None => false,
        }
    }

    pub fn position_of(&self, item: &FileItem) -> Option<usize> {
        self.items.iter().position(|x| x == item)
    }

    /// Moves the cursor to `item` without altering the list. `None` when the
    /// item is not present.
    pub fn with_current(&self, item: &FileItem) -> Option<Self> {
        self.position_of(item).map(|i| Self {
            current_index: Some(i),
            items: self.items.clone(),
        })
    }

    /// The item before the cursor, if any.
    pub fn previous(&self) -> Option<&FileItem> {
        let i = self.current_index?;
        self.items.get(i.checked_sub(1)?)
    }

    /// The item after the cursor, if any.
    pub fn next(&self) -> Option<&FileItem> {
        let i = self.current_index?;
        self.items.get(i + 1)
    }
}
