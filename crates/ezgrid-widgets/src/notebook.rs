#![forbid(unsafe_code)]

//! Notebooks: add, select, and forget tabs.
//!
//! A notebook lays out its own native children: tab labels along row 0, one
//! per column, and every content frame stacked in row 1 across all label
//! columns. Only the raised content is visible.
//!
//! Selection notifications ([`EventKind::TabChanged`] on the notebook) always
//! fire after the tab set is fully updated, so handlers may query or mutate
//! the notebook right away.

use ezgrid_core::event::EventKind;
use ezgrid_core::geometry::{GridArea, GridPos, GridSpan, Sticky};
use ezgrid_core::handle::NativeHandle;
use ezgrid_layout::{ColSpan, Place};
use tracing::{debug, debug_span, trace};

use crate::error::WidgetError;
use crate::gui::{Deferred, Gui};
use crate::node::{WidgetId, WidgetKind, WidgetNode, refname};
use crate::place::Build;
use crate::tabs::{Tab, TabKey, TabRef, TabSet};
use crate::toolkit::{NativeKind, NativeOptions, TaskToken, Toolkit};
use crate::tree::Teardown;

impl<T: Toolkit> Gui<T> {
    /// An empty notebook. Add pages with [`Gui::add_tab`].
    pub fn add_notebook(
        &mut self,
        parent: WidgetId,
        place: Place,
        colspan: impl Into<ColSpan>,
    ) -> Result<WidgetId, WidgetError> {
        let mut b = Build::new(WidgetKind::Notebook, NativeKind::Notebook, "notebook");
        b.cols = colspan.into();
        b.sticky = Sticky::W;
        let id = self.build(parent, place, b)?;
        self.tree.node_mut(id)?.tabs = Some(TabSet::new());
        Ok(id)
    }

    fn tab_set(&self, notebook: WidgetId) -> Result<&TabSet, WidgetError> {
        self.tree
            .node(notebook)?
            .tabs
            .as_ref()
            .ok_or(WidgetError::NotANotebook(notebook))
    }

    fn tab_set_mut(&mut self, notebook: WidgetId) -> Result<&mut TabSet, WidgetError> {
        self.tree
            .node_mut(notebook)?
            .tabs
            .as_mut()
            .ok_or(WidgetError::NotANotebook(notebook))
    }

    fn resolve_tab(&self, notebook: WidgetId, tab: &TabRef) -> Result<usize, WidgetError> {
        self.tab_set(notebook)?
            .resolve(tab)
            .ok_or_else(|| WidgetError::TabNotFound {
                notebook,
                tab: tab.to_string(),
            })
    }

    /// Add a page and return its content container.
    ///
    /// Without a caption the tab is called `Tab {n}`, counting from one.
    /// `at` names the tab the new one is inserted before; `None` appends.
    ///
    /// The first tab of an empty notebook is selected after
    /// [`initial_tab_select_delay`](crate::config::GuiConfig::initial_tab_select_delay),
    /// so handlers bound right after this call still hear about it. Later
    /// tabs start hidden.
    pub fn add_tab(
        &mut self,
        notebook: WidgetId,
        caption: Option<&str>,
        at: Option<TabRef>,
    ) -> Result<WidgetId, WidgetError> {
        let _span = debug_span!("ezgrid.tab.add", %notebook).entered();
        let tabs = self.tab_set(notebook)?;
        let at = match &at {
            Some(tab) => Some(self.resolve_tab(notebook, tab)?),
            None => None,
        };
        let text = caption.map_or_else(|| format!("Tab {}", tabs.len() + 1), str::to_owned);
        let was_empty = tabs.is_empty();
        let nb_handle = self.handle(notebook)?;

        let label = self.toolkit.create_widget(
            NativeKind::TabLabel,
            Some(nb_handle),
            &NativeOptions::new().text(text.as_str()),
        )?;
        let frame = match self.create_tab_frame(nb_handle, label) {
            Ok(frame) => frame,
            Err(err) => {
                self.toolkit.destroy(label);
                return Err(err);
            }
        };

        let content = self.tree.allocate_id();
        self.tree.insert(
            WidgetNode::new(content, WidgetKind::Tab, frame)
                .with_name(refname(&text))
                .container(),
        );
        self.tree.append_child(notebook, content)?;

        self.next_tab_key += 1;
        let tab = Tab {
            text,
            label,
            key: TabKey::from_raw(self.next_tab_key),
            content,
        };
        let ix = self.tab_set_mut(notebook)?.insert(tab, at);
        self.place_tabs(notebook)?;

        if was_empty {
            let token = self.allocate_token();
            let delay = self.config.initial_tab_select_delay;
            self.toolkit.schedule_deferred(delay, token);
            self.deferred
                .insert(token, Deferred::SelectFirstTab { notebook, content });
            self.tab_set_mut(notebook)?.set_pending(token);
            trace!(token = token.raw(), ?delay, "first selection scheduled");
        } else {
            self.toolkit.lower(frame);
        }
        debug!(%content, index = ix, "tab added");
        Ok(content)
    }

    /// Create the content frame and make its label clickable.
    fn create_tab_frame(&mut self, nb_handle: NativeHandle, label: NativeHandle) -> Result<NativeHandle, WidgetError> {
        self.toolkit.bind_event(label, EventKind::Click)?;
        Ok(self
            .toolkit
            .create_widget(NativeKind::Frame, Some(nb_handle), &NativeOptions::new())?)
    }

    /// Insert a page before the tab named by `before`.
    pub fn insert_tab(
        &mut self,
        notebook: WidgetId,
        before: impl Into<TabRef>,
        caption: Option<&str>,
    ) -> Result<WidgetId, WidgetError> {
        self.add_tab(notebook, caption, Some(before.into()))
    }

    /// Re-grid labels and content frames after the tab list changed.
    fn place_tabs(&mut self, notebook: WidgetId) -> Result<(), WidgetError> {
        let tabs: Vec<(NativeHandle, WidgetId)> = self
            .tab_set(notebook)?
            .iter()
            .map(|tab| (tab.label, tab.content))
            .collect();
        let width = u16::try_from(tabs.len()).unwrap_or(u16::MAX);
        let page = GridArea::new(GridPos::new(1, 0), GridSpan::cols(width));
        for (col, (label, content)) in tabs.into_iter().enumerate() {
            let col = u16::try_from(col).unwrap_or(u16::MAX);
            self.toolkit.place(label, GridArea::cell(0, col), Sticky::EW)?;
            let frame = self.handle(content)?;
            self.toolkit.place(frame, page, Sticky::NSEW)?;
        }
        Ok(())
    }

    /// Select a tab, raise its content, then fire
    /// [`EventKind::TabChanged`] on the notebook.
    pub fn tab_select(
        &mut self,
        notebook: WidgetId,
        tab: impl Into<TabRef>,
    ) -> Result<WidgetId, WidgetError> {
        let tab = tab.into();
        let _span = debug_span!("ezgrid.tab.select", %notebook, %tab).entered();
        let ix = self.resolve_tab(notebook, &tab)?;
        let content = self.raise_tab(notebook, ix)?;
        let nb_handle = self.handle(notebook)?;
        self.notify(nb_handle, EventKind::TabChanged);
        Ok(content)
    }

    /// Record `ix` as selected and raise its content, silently.
    fn raise_tab(&mut self, notebook: WidgetId, ix: usize) -> Result<WidgetId, WidgetError> {
        let content = self
            .tab_set_mut(notebook)?
            .select(ix)
            .map(|tab| tab.content)
            .ok_or_else(|| WidgetError::TabNotFound {
                notebook,
                tab: TabRef::Index(ix).to_string(),
            })?;
        let frame = self.handle(content)?;
        self.toolkit.raise(frame);
        Ok(content)
    }

    /// Remove a tab and destroy its content.
    ///
    /// A neighbour is selected first: the previous tab when the removed one
    /// is last, the next one otherwise. [`EventKind::TabChanged`] fires once,
    /// after the removal. Forgetting the only tab leaves nothing selected.
    pub fn tab_forget(
        &mut self,
        notebook: WidgetId,
        tab: impl Into<TabRef>,
    ) -> Result<Teardown, WidgetError> {
        let tab = tab.into();
        let _span = debug_span!("ezgrid.tab.forget", %notebook, %tab).entered();
        let ix = self.resolve_tab(notebook, &tab)?;
        if let Some(neighbour) = self.tab_set(notebook)?.neighbour_of(ix) {
            self.raise_tab(notebook, neighbour)?;
        }

        let tabs = self.tab_set_mut(notebook)?;
        let Some(removed) = tabs.remove(ix) else {
            return Err(WidgetError::TabNotFound {
                notebook,
                tab: tab.to_string(),
            });
        };
        let pending = tabs.pending();
        if let Some(token) = pending
            && matches!(
                self.deferred.get(&token),
                Some(Deferred::SelectFirstTab { content, .. }) if *content == removed.content
            )
        {
            self.tab_set_mut(notebook)?.take_pending();
            self.cancel_deferred(token);
        }

        let mut teardown = self.teardown(removed.content)?;
        self.release_native(removed.label);
        teardown.released.push(removed.label);
        self.place_tabs(notebook)?;

        debug!(content = %removed.content, index = ix, "tab forgotten");
        let nb_handle = self.handle(notebook)?;
        self.notify(nb_handle, EventKind::TabChanged);
        Ok(teardown)
    }

    /// Forget the tab at position `ix`.
    pub fn delete_tab(&mut self, notebook: WidgetId, ix: usize) -> Result<Teardown, WidgetError> {
        self.tab_forget(notebook, ix)
    }

    /// Change a tab's label text. Content and selection are untouched.
    pub fn tab_set_text(
        &mut self,
        notebook: WidgetId,
        tab: impl Into<TabRef>,
        text: &str,
    ) -> Result<(), WidgetError> {
        let tab = tab.into();
        let ix = self.resolve_tab(notebook, &tab)?;
        let label = self
            .tab_set_mut(notebook)?
            .set_text(ix, text)
            .map(|tab| tab.label)
            .ok_or_else(|| WidgetError::TabNotFound {
                notebook,
                tab: tab.to_string(),
            })?;
        Ok(self.toolkit.set_text(label, text)?)
    }

    /// Tab texts in display order.
    pub fn tabs(&self, notebook: WidgetId) -> Result<Vec<String>, WidgetError> {
        Ok(self.tab_set(notebook)?.texts())
    }

    /// Position of the selected tab.
    pub fn selected_tab(&self, notebook: WidgetId) -> Result<Option<usize>, WidgetError> {
        Ok(self.tab_set(notebook)?.selected())
    }

    /// Text of the selected tab.
    pub fn selected_text(&self, notebook: WidgetId) -> Result<Option<String>, WidgetError> {
        Ok(self
            .tab_set(notebook)?
            .selected_tab()
            .map(|tab| tab.text.clone()))
    }

    /// Content container of a tab.
    pub fn tab_content(
        &self,
        notebook: WidgetId,
        tab: impl Into<TabRef>,
    ) -> Result<WidgetId, WidgetError> {
        let tab = tab.into();
        let ix = self.resolve_tab(notebook, &tab)?;
        self.tab_set(notebook)?
            .get(ix)
            .map(|tab| tab.content)
            .ok_or_else(|| WidgetError::TabNotFound {
                notebook,
                tab: tab.to_string(),
            })
    }

    /// Deferred first selection. A no-op once the notebook or the tab is
    /// gone.
    pub(crate) fn select_first_tab(
        &mut self,
        token: TaskToken,
        notebook: WidgetId,
        content: WidgetId,
    ) -> Result<bool, WidgetError> {
        let Some(tabs) = self
            .tree
            .get_mut(notebook)
            .and_then(|node| node.tabs.as_mut())
        else {
            trace!(%notebook, "first selection: notebook gone");
            return Ok(false);
        };
        tabs.clear_pending(token);
        let Some(ix) = tabs.position_of_content(content) else {
            trace!(%notebook, %content, "first selection: tab gone");
            return Ok(false);
        };
        self.tab_select(notebook, ix)?;
        Ok(true)
    }
}
