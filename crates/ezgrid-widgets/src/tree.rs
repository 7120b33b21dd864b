#![forbid(unsafe_code)]

//! Arena of widget nodes.
//!
//! Nodes live in a map keyed by [`WidgetId`]; parent/child edges and the
//! thumbnail pair are stored as IDs. The tree enforces:
//!
//! - every child lists its parent, and every parent lists each child once
//! - thumbnail links are symmetric: `a.thumbnail == b` iff `b.thumbnail_of == a`
//! - placement bookkeeping only exists on layout hosts
//!
//! Teardown follows a fixed order so no node is ever observed with a link to
//! something already freed. See [`WidgetTree::destroy`].

use std::collections::{BTreeMap, HashMap};

use ezgrid_core::geometry::{GridArea, GridPos};
use ezgrid_core::handle::NativeHandle;
use ezgrid_layout::{ColSpan, GridCursor, Place};
use tracing::{debug, debug_span, error, trace};

use crate::error::WidgetError;
use crate::node::{NodeFlags, ThumbnailLink, WidgetId, WidgetNode};
use crate::toolkit::{TaskToken, Toolkit};

/// What a teardown released.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Teardown {
    /// Destroyed nodes, children before parents.
    pub destroyed: Vec<WidgetId>,
    /// Native handles released, in release order.
    pub released: Vec<NativeHandle>,
    /// Deferred tasks cancelled.
    pub cancelled: Vec<TaskToken>,
}

/// All live widget nodes of one GUI.
#[derive(Debug, Clone)]
pub struct WidgetTree {
    nodes: BTreeMap<WidgetId, WidgetNode>,
    handles: HashMap<NativeHandle, WidgetId>,
    next_id: WidgetId,
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetTree {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            handles: HashMap::new(),
            next_id: WidgetId::MIN,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.nodes.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: WidgetId) -> Option<&mut WidgetNode> {
        self.nodes.get_mut(&id)
    }

    /// Look up a live node or report it unknown.
    pub fn node(&self, id: WidgetId) -> Result<&WidgetNode, WidgetError> {
        self.nodes.get(&id).ok_or(WidgetError::UnknownWidget(id))
    }

    pub(crate) fn node_mut(&mut self, id: WidgetId) -> Result<&mut WidgetNode, WidgetError> {
        self.nodes.get_mut(&id).ok_or(WidgetError::UnknownWidget(id))
    }

    /// Nodes in ID (creation) order.
    pub fn iter(&self) -> impl Iterator<Item = &WidgetNode> {
        self.nodes.values()
    }

    /// Parentless nodes: the main window and popups.
    pub fn roots(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.nodes
            .values()
            .filter(|node| node.parent.is_none())
            .map(|node| node.id)
    }

    /// Map a native handle back to the node that owns it.
    pub fn find_by_handle(&self, handle: NativeHandle) -> Option<WidgetId> {
        self.handles.get(&handle).copied()
    }

    /// Reserve the next ID.
    pub(crate) fn allocate_id(&mut self) -> WidgetId {
        let id = self.next_id;
        // u64 IDs do not run out in practice; saturate rather than wrap.
        self.next_id = id.checked_next().unwrap_or(id);
        id
    }

    /// Add a parentless node.
    pub(crate) fn insert(&mut self, node: WidgetNode) -> WidgetId {
        let id = node.id;
        self.handles.insert(node.handle, id);
        self.nodes.insert(id, node);
        id
    }

    /// Make `child` the last child of `parent`.
    pub fn append_child(&mut self, parent: WidgetId, child: WidgetId) -> Result<(), WidgetError> {
        if !self.nodes.contains_key(&parent) {
            return Err(WidgetError::UnknownWidget(parent));
        }
        let node = self.node_mut(child)?;
        debug_assert!(node.parent.is_none(), "{child} already has a parent");
        node.parent = Some(parent);
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(child);
        }
        Ok(())
    }

    fn layout_host(&mut self, container: WidgetId, operation: &str) -> (&mut GridCursor, NodeFlags) {
        let Some(node) = self.nodes.get_mut(&container) else {
            panic!("{operation}: {container} is not a live node");
        };
        let (kind, flags) = (node.kind, node.flags);
        match node.layout.as_mut() {
            Some(cursor) => (cursor, flags),
            None => panic!("{operation}: {container} ({kind:?}) is not a layout host"),
        }
    }

    /// Resolve a placement request against `container`'s bookkeeping.
    ///
    /// # Panics
    ///
    /// If `container` is not a layout host.
    pub fn resolve(&mut self, container: WidgetId, place: Place) -> GridPos {
        let (cursor, flags) = self.layout_host(container, "resolve");
        let pos = cursor.resolve(place.row, place.col);
        if flags.contains(NodeFlags::TRACE) {
            trace!(
                target: "ezgrid.layout",
                %container,
                request = ?place,
                row = pos.row,
                col = pos.col,
                "resolve"
            );
        }
        pos
    }

    /// Width of a column span request inside `container`.
    ///
    /// # Panics
    ///
    /// If `container` is not a layout host.
    pub fn col_span(&mut self, container: WidgetId, col: u16, span: ColSpan) -> u16 {
        let (cursor, _) = self.layout_host(container, "col_span");
        cursor.col_span(col, span)
    }

    /// Stamp `widget`'s area and record it in `container`'s bookkeeping.
    ///
    /// # Panics
    ///
    /// If `container` is not a layout host.
    pub fn remember(&mut self, container: WidgetId, widget: WidgetId, area: GridArea) {
        let (cursor, flags) = self.layout_host(container, "remember");
        cursor.remember(area);
        if let Some(child) = self.nodes.get_mut(&widget) {
            child.area = Some(area);
        }
        if flags.contains(NodeFlags::TRACE) {
            let describe = |id| {
                self.nodes
                    .get(&id)
                    .map(WidgetNode::describe_position)
                    .unwrap_or_default()
            };
            trace!(
                target: "ezgrid.layout",
                %container,
                %widget,
                placed = %describe(widget),
                host = %describe(container),
                "remember"
            );
        }
    }

    /// Link `base` to its thumbnail `thumb`, replacing any previous links on
    /// either side.
    pub fn link_thumbnail(
        &mut self,
        base: WidgetId,
        thumb: WidgetId,
        width: u32,
    ) -> Result<(), WidgetError> {
        self.node(base)?;
        self.node(thumb)?;
        self.unlink_thumbnail(base);
        self.unlink_thumbnail_of(thumb);
        if let Some(node) = self.nodes.get_mut(&base) {
            node.thumbnail = Some(ThumbnailLink { node: thumb, width });
        }
        if let Some(node) = self.nodes.get_mut(&thumb) {
            node.thumbnail_of = Some(base);
        }
        Ok(())
    }

    /// Sever the link from `id` to its thumbnail, both sides.
    fn unlink_thumbnail(&mut self, id: WidgetId) {
        let link = self.nodes.get_mut(&id).and_then(|node| node.thumbnail.take());
        if let Some(link) = link
            && let Some(thumb) = self.nodes.get_mut(&link.node)
        {
            thumb.thumbnail_of = None;
        }
    }

    /// Sever the link from `id` to the image it is a thumbnail of, both sides.
    fn unlink_thumbnail_of(&mut self, id: WidgetId) {
        let base = self.nodes.get_mut(&id).and_then(|node| node.thumbnail_of.take());
        if let Some(base) = base
            && let Some(base_node) = self.nodes.get_mut(&base)
        {
            base_node.thumbnail = None;
        }
    }

    /// Tear down `id` and everything it owns.
    ///
    /// Order:
    ///
    /// 1. sever the thumbnail link (both sides)
    /// 2. sever the thumbnail-of link (both sides)
    /// 3. destroy a snapshot of the children
    /// 4. detach from the parent; a parent that does not list the node is an
    ///    [`WidgetError::OwnershipMismatch`]
    /// 5. release caption, scroll parts, helpers and tab labels; cancel a
    ///    pending tab selection
    /// 6. release the native handle
    ///
    /// The thumbnail counterpart itself survives.
    pub fn destroy<T: Toolkit + ?Sized>(
        &mut self,
        id: WidgetId,
        toolkit: &mut T,
    ) -> Result<Teardown, WidgetError> {
        let _span = debug_span!("ezgrid.destroy", widget = %id).entered();
        let mut teardown = Teardown::default();
        self.destroy_into(id, toolkit, &mut teardown)?;
        debug!(
            nodes = teardown.destroyed.len(),
            handles = teardown.released.len(),
            "teardown complete"
        );
        Ok(teardown)
    }

    fn destroy_into<T: Toolkit + ?Sized>(
        &mut self,
        id: WidgetId,
        toolkit: &mut T,
        teardown: &mut Teardown,
    ) -> Result<(), WidgetError> {
        self.node(id)?;

        self.unlink_thumbnail(id);
        self.unlink_thumbnail_of(id);

        let children = self.node(id)?.children.clone();
        for child in children {
            self.destroy_into(child, toolkit, teardown)?;
        }

        let tab_label = match self.node(id)?.parent {
            Some(parent) => self.detach(parent, id)?,
            None => None,
        };

        let Some(node) = self.nodes.remove(&id) else {
            return Err(WidgetError::UnknownWidget(id));
        };
        self.handles.remove(&node.handle);

        let mut release = |handle: NativeHandle| {
            toolkit.destroy(handle);
            teardown.released.push(handle);
        };
        if let Some(caption) = node.caption {
            release(caption);
        }
        if let Some(label) = tab_label {
            release(label);
        }
        node.scroll.handles().for_each(&mut release);
        node.extra.iter().copied().for_each(&mut release);
        if let Some(mut tabs) = node.tabs {
            tabs.iter().map(|tab| tab.label).for_each(&mut release);
            if let Some(token) = tabs.take_pending() {
                toolkit.cancel_deferred(token);
                teardown.cancelled.push(token);
            }
        }

        toolkit.destroy(node.handle);
        teardown.released.push(node.handle);
        teardown.destroyed.push(id);
        trace!(widget = %id, kind = ?node.kind, "node destroyed");
        Ok(())
    }

    /// Remove `child` from `parent`'s children and, for a notebook, from its
    /// tabs. Returns the label of the removed tab.
    fn detach(
        &mut self,
        parent: WidgetId,
        child: WidgetId,
    ) -> Result<Option<NativeHandle>, WidgetError> {
        let mismatch = WidgetError::OwnershipMismatch { parent, child };
        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            error!(%parent, %child, "parent of destroyed node is gone");
            return Err(mismatch);
        };
        let Some(pos) = parent_node.children.iter().position(|c| *c == child) else {
            error!(%parent, %child, "destroyed node missing from parent's children");
            return Err(mismatch);
        };
        parent_node.children.remove(pos);
        let label = parent_node.tabs.as_mut().and_then(|tabs| {
            let ix = tabs.position_of_content(child)?;
            tabs.remove(ix).map(|tab| tab.label)
        });
        Ok(label)
    }

    /// Check parent/child agreement and thumbnail symmetry.
    pub fn validate(&self) -> Result<(), WidgetError> {
        for node in self.nodes.values() {
            for &child in &node.children {
                let child_node = self.node(child)?;
                if child_node.parent != Some(node.id) {
                    return Err(WidgetError::OwnershipMismatch {
                        parent: node.id,
                        child,
                    });
                }
            }
            if let Some(parent) = node.parent {
                let parent_node = self.node(parent)?;
                let listed = parent_node.children.iter().filter(|c| **c == node.id).count();
                if listed != 1 {
                    return Err(WidgetError::OwnershipMismatch {
                        parent,
                        child: node.id,
                    });
                }
            }
            if let Some(link) = node.thumbnail {
                let ok = self
                    .get(link.node)
                    .is_some_and(|thumb| thumb.thumbnail_of == Some(node.id));
                if !ok {
                    return Err(WidgetError::ThumbnailMismatch {
                        node: node.id,
                        other: link.node,
                    });
                }
            }
            if let Some(base) = node.thumbnail_of {
                let ok = self
                    .get(base)
                    .and_then(|b| b.thumbnail)
                    .is_some_and(|link| link.node == node.id);
                if !ok {
                    return Err(WidgetError::ThumbnailMismatch {
                        node: node.id,
                        other: base,
                    });
                }
            }
            if let Some(tabs) = &node.tabs {
                for tab in tabs.iter() {
                    if !node.children.contains(&tab.content) {
                        return Err(WidgetError::OwnershipMismatch {
                            parent: node.id,
                            child: tab.content,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
