#![forbid(unsafe_code)]

//! Tab bookkeeping for notebooks.
//!
//! A [`TabSet`] is a single ordered list of [`Tab`] records. Each tab can be
//! named four ways besides its position: its content container, the native
//! handle of its label, the label's key, or its display text. [`TabSet::resolve`]
//! tries them in a fixed order, first match wins.
//!
//! The set owns the selection and the pending first-selection task. Native
//! side effects (raising content, firing notifications) are driven from
//! `Gui`, which calls into the set to update state first.

use std::fmt;

use ezgrid_core::handle::NativeHandle;

use crate::node::WidgetId;
use crate::toolkit::TaskToken;

/// Identity of a tab label widget, independent of its native handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TabKey(u64);

impl TabKey {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// One tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    /// Display text; not required to be unique.
    pub text: String,
    /// Native handle of the clickable label.
    pub label: NativeHandle,
    pub key: TabKey,
    /// Content container, owned by the notebook node.
    pub content: WidgetId,
}

/// Anything a caller may use to name a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabRef {
    Index(usize),
    Content(WidgetId),
    Native(NativeHandle),
    Key(TabKey),
    Text(String),
}

impl fmt::Display for TabRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(ix) => write!(f, "index {ix}"),
            Self::Content(id) => write!(f, "content {id}"),
            Self::Native(handle) => write!(f, "label {handle}"),
            Self::Key(key) => write!(f, "key {}", key.raw()),
            Self::Text(text) => write!(f, "'{text}'"),
        }
    }
}

impl From<usize> for TabRef {
    fn from(ix: usize) -> Self {
        Self::Index(ix)
    }
}

impl From<WidgetId> for TabRef {
    fn from(id: WidgetId) -> Self {
        Self::Content(id)
    }
}

impl From<NativeHandle> for TabRef {
    fn from(handle: NativeHandle) -> Self {
        Self::Native(handle)
    }
}

impl From<TabKey> for TabRef {
    fn from(key: TabKey) -> Self {
        Self::Key(key)
    }
}

impl From<&str> for TabRef {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for TabRef {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Ordered tabs plus selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabSet {
    tabs: Vec<Tab>,
    selected: Option<usize>,
    pending: Option<TaskToken>,
}

impl TabSet {
    pub const fn new() -> Self {
        Self {
            tabs: Vec::new(),
            selected: None,
            pending: None,
        }
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn get(&self, ix: usize) -> Option<&Tab> {
        self.tabs.get(ix)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.iter()
    }

    /// Display texts in tab order.
    pub fn texts(&self) -> Vec<String> {
        self.tabs.iter().map(|tab| tab.text.clone()).collect()
    }

    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_tab(&self) -> Option<&Tab> {
        self.selected.and_then(|ix| self.tabs.get(ix))
    }

    /// Token of the first-selection task, while it is pending.
    pub const fn pending(&self) -> Option<TaskToken> {
        self.pending
    }

    /// Resolve a tab reference to a position.
    ///
    /// Priority is index, content, label handle, key, then text. The
    /// reference is typed, so only one alias space can ever match; an
    /// out-of-range index matches none of them and yields `None`.
    pub fn resolve(&self, tab: &TabRef) -> Option<usize> {
        let position = |pred: &dyn Fn(&Tab) -> bool| self.tabs.iter().position(pred);
        match tab {
            TabRef::Index(ix) => (*ix < self.tabs.len()).then_some(*ix),
            TabRef::Content(id) => position(&|t| t.content == *id),
            TabRef::Native(handle) => position(&|t| t.label == *handle),
            TabRef::Key(key) => position(&|t| t.key == *key),
            TabRef::Text(text) => position(&|t| t.text == *text),
        }
    }

    /// Position of the tab whose content is `content`.
    pub fn position_of_content(&self, content: WidgetId) -> Option<usize> {
        self.tabs.iter().position(|t| t.content == content)
    }

    /// Position of the tab whose label is `label`.
    pub fn position_of_label(&self, label: NativeHandle) -> Option<usize> {
        self.tabs.iter().position(|t| t.label == label)
    }

    /// Insert `tab` at `at` (append when `None`) and return its position.
    ///
    /// The selection keeps pointing at the same tab. A set that was empty
    /// records its first tab as selected right away; raising it and telling
    /// observers is left to the deferred first-selection task.
    pub(crate) fn insert(&mut self, tab: Tab, at: Option<usize>) -> usize {
        let ix = at.map_or(self.tabs.len(), |ix| ix.min(self.tabs.len()));
        self.tabs.insert(ix, tab);
        match self.selected {
            Some(sel) if sel >= ix => self.selected = Some(sel + 1),
            None if self.tabs.len() == 1 => self.selected = Some(0),
            _ => {}
        }
        ix
    }

    /// Record `ix` as the selection.
    pub(crate) fn select(&mut self, ix: usize) -> Option<&Tab> {
        let tab = self.tabs.get(ix)?;
        self.selected = Some(ix);
        Some(tab)
    }

    /// The tab to select before removing `ix`: the previous one when `ix` is
    /// last, the next one otherwise. `None` when `ix` is the only tab.
    pub fn neighbour_of(&self, ix: usize) -> Option<usize> {
        let len = self.tabs.len();
        if ix >= len || len == 1 {
            return None;
        }
        if ix == len - 1 { Some(ix - 1) } else { Some(ix + 1) }
    }

    /// Remove the tab at `ix`, keeping the selection on the same tab.
    ///
    /// Removing the selected tab clears the selection.
    pub(crate) fn remove(&mut self, ix: usize) -> Option<Tab> {
        if ix >= self.tabs.len() {
            return None;
        }
        let tab = self.tabs.remove(ix);
        self.selected = match self.selected {
            Some(sel) if sel == ix => None,
            Some(sel) if sel > ix => Some(sel - 1),
            other => other,
        };
        Some(tab)
    }

    pub(crate) fn set_text(&mut self, ix: usize, text: impl Into<String>) -> Option<&Tab> {
        let tab = self.tabs.get_mut(ix)?;
        tab.text = text.into();
        Some(tab)
    }

    pub(crate) fn set_pending(&mut self, token: TaskToken) {
        self.pending = Some(token);
    }

    /// Clear the pending task if it is `token`.
    pub(crate) fn clear_pending(&mut self, token: TaskToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn take_pending(&mut self) -> Option<TaskToken> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> WidgetId {
        WidgetId::new(raw).unwrap()
    }

    fn tab(n: u64, text: &str) -> Tab {
        Tab {
            text: text.to_owned(),
            label: NativeHandle::from_raw(100 + n),
            key: TabKey::from_raw(200 + n),
            content: id(n),
        }
    }

    fn greek() -> TabSet {
        let mut set = TabSet::new();
        for (n, text) in [(1, "Alpha"), (2, "Beta"), (3, "Gamma")] {
            set.insert(tab(n, text), None);
        }
        set
    }

    #[test]
    fn resolve_tries_each_alias_space() {
        let set = greek();
        assert_eq!(set.resolve(&TabRef::Index(1)), Some(1));
        assert_eq!(set.resolve(&id(2).into()), Some(1));
        assert_eq!(set.resolve(&"Gamma".into()), Some(2));
        assert_eq!(set.resolve(&NativeHandle::from_raw(101).into()), Some(0));
        assert_eq!(set.resolve(&TabKey::from_raw(203).into()), Some(2));
        assert_eq!(set.resolve(&TabRef::Index(99)), None);
        assert_eq!(set.resolve(&"Delta".into()), None);
    }

    #[test]
    fn duplicate_text_resolves_to_first() {
        let mut set = greek();
        set.insert(tab(4, "Beta"), None);
        assert_eq!(set.resolve(&"Beta".into()), Some(1));
    }

    #[test]
    fn first_insert_selects() {
        let mut set = TabSet::new();
        assert_eq!(set.selected(), None);
        set.insert(tab(1, "Alpha"), None);
        assert_eq!(set.selected(), Some(0));
        set.insert(tab(2, "Beta"), None);
        assert_eq!(set.selected(), Some(0));
    }

    #[test]
    fn insert_before_selection_keeps_selected_tab() {
        let mut set = greek();
        set.select(1);
        let ix = set.insert(tab(4, "Zero"), Some(0));
        assert_eq!(ix, 0);
        assert_eq!(set.selected(), Some(2));
        assert_eq!(set.selected_tab().map(|t| t.text.as_str()), Some("Beta"));
        assert_eq!(set.texts(), vec!["Zero", "Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn neighbour_prefers_next_unless_last() {
        let set = greek();
        assert_eq!(set.neighbour_of(0), Some(1));
        assert_eq!(set.neighbour_of(1), Some(2));
        assert_eq!(set.neighbour_of(2), Some(1));
        let mut single = TabSet::new();
        single.insert(tab(1, "Only"), None);
        assert_eq!(single.neighbour_of(0), None);
    }

    #[test]
    fn remove_shifts_selection() {
        let mut set = greek();
        set.select(2);
        let removed = set.remove(0).unwrap();
        assert_eq!(removed.text, "Alpha");
        assert_eq!(set.selected(), Some(1));
        set.remove(1);
        assert_eq!(set.selected(), None);
        assert!(set.remove(5).is_none());
    }

    #[test]
    fn pending_token_clears_once() {
        let mut set = TabSet::new();
        let token = TaskToken::from_raw(9);
        set.set_pending(token);
        assert!(!set.clear_pending(TaskToken::from_raw(8)));
        assert!(set.clear_pending(token));
        assert_eq!(set.pending(), None);
    }
}
