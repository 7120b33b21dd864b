#![forbid(unsafe_code)]

//! Widget nodes: one per placed entity.

use std::fmt;

use bitflags::bitflags;
use ezgrid_core::geometry::GridArea;
use ezgrid_core::handle::NativeHandle;
use ezgrid_layout::GridCursor;

use crate::image::ImageState;
use crate::tabs::TabSet;
use crate::value::ValueBinding;

/// Stable identifier for a node in a [`WidgetTree`](crate::tree::WidgetTree).
///
/// IDs are never reused within a tree, so a stale ID simply stops resolving
/// once its node is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(u64);

impl WidgetId {
    /// Lowest valid widget ID.
    pub const MIN: Self = Self(1);

    /// Create an ID, rejecting 0.
    pub const fn new(raw: u64) -> Option<Self> {
        if raw == 0 { None } else { Some(Self(raw)) }
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) => Some(Self(next)),
            None => None,
        }
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is, from the application's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Root,
    Popup,
    Frame,
    LabelFrame,
    Label,
    LabelInfo,
    Button,
    EntryField,
    Checkbox,
    Dropdown,
    Listbox,
    Slider,
    ScrolledEntryField,
    Canvas,
    LabelImage,
    Table,
    TableCell,
    Notebook,
    /// Content container of one notebook tab.
    Tab,
}

impl WidgetKind {
    /// Canvases and image labels can show images.
    pub const fn shows_images(self) -> bool {
        matches!(self, Self::Canvas | Self::LabelImage)
    }
}

bitflags! {
    /// Per-node state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        /// Set at creation, cleared by the first `Gui::update`.
        const INITIALIZING = 0b0001;
        /// Emit layout trace events for placements into this container.
        const TRACE = 0b0010;
    }
}

/// Native parts of a scrolled widget, released with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollParts {
    /// Sunken frame holding the widget and its bars.
    pub container: Option<NativeHandle>,
    pub x_bar: Option<NativeHandle>,
    pub y_bar: Option<NativeHandle>,
}

impl ScrollParts {
    /// Handles in release order: bars first, then their container.
    pub fn handles(&self) -> impl Iterator<Item = NativeHandle> + '_ {
        [self.x_bar, self.y_bar, self.container].into_iter().flatten()
    }

    pub const fn is_empty(&self) -> bool {
        self.container.is_none() && self.x_bar.is_none() && self.y_bar.is_none()
    }
}

/// Forward half of a thumbnail link, held by the full-size image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailLink {
    /// The node showing the thumbnail.
    pub node: WidgetId,
    /// Width the thumbnail is derived at.
    pub width: u32,
}

/// One placed entity.
///
/// Children are owned: destroying a node destroys them. The thumbnail pair is
/// not: `thumbnail` and `thumbnail_of` are informational back-references that
/// are cleared on both sides before either node goes away.
#[derive(Debug, Clone)]
pub struct WidgetNode {
    pub(crate) id: WidgetId,
    pub(crate) name: String,
    pub(crate) kind: WidgetKind,
    pub(crate) handle: NativeHandle,
    pub(crate) caption: Option<NativeHandle>,
    pub(crate) scroll: ScrollParts,
    /// Native helpers owned by the node (the inner frame of a table).
    pub(crate) extra: Vec<NativeHandle>,
    pub(crate) binding: ValueBinding,
    pub(crate) area: Option<GridArea>,
    pub(crate) layout: Option<GridCursor>,
    pub(crate) flags: NodeFlags,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,
    pub(crate) thumbnail: Option<ThumbnailLink>,
    pub(crate) thumbnail_of: Option<WidgetId>,
    pub(crate) image: Option<ImageState>,
    pub(crate) tabs: Option<TabSet>,
    pub(crate) parm_id: Option<String>,
}

impl WidgetNode {
    pub(crate) fn new(id: WidgetId, kind: WidgetKind, handle: NativeHandle) -> Self {
        Self {
            id,
            name: String::new(),
            kind,
            handle,
            caption: None,
            scroll: ScrollParts::default(),
            extra: Vec::new(),
            binding: ValueBinding::Unbound,
            area: None,
            layout: None,
            flags: NodeFlags::INITIALIZING,
            parent: None,
            children: Vec::new(),
            thumbnail: None,
            thumbnail_of: None,
            image: None,
            tabs: None,
            parm_id: None,
        }
    }

    #[must_use]
    pub(crate) fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub(crate) fn with_binding(mut self, binding: ValueBinding) -> Self {
        self.binding = binding;
        self
    }

    #[must_use]
    pub(crate) fn with_caption(mut self, caption: Option<NativeHandle>) -> Self {
        self.caption = caption;
        self
    }

    /// Make this node a layout host with empty bookkeeping.
    #[must_use]
    pub(crate) fn container(mut self) -> Self {
        self.layout = Some(GridCursor::new());
        self
    }

    pub const fn id(&self) -> WidgetId {
        self.id
    }

    /// Reference name derived from the caption (`"First Name"` → `first_name`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub const fn handle(&self) -> NativeHandle {
        self.handle
    }

    pub const fn caption(&self) -> Option<NativeHandle> {
        self.caption
    }

    pub const fn scroll(&self) -> &ScrollParts {
        &self.scroll
    }

    pub const fn binding(&self) -> &ValueBinding {
        &self.binding
    }

    /// Grid area stamped when the node was placed.
    pub const fn area(&self) -> Option<GridArea> {
        self.area
    }

    /// Placement bookkeeping, for layout hosts.
    pub const fn layout(&self) -> Option<&GridCursor> {
        self.layout.as_ref()
    }

    pub const fn is_container(&self) -> bool {
        self.layout.is_some()
    }

    pub const fn flags(&self) -> NodeFlags {
        self.flags
    }

    pub const fn is_initializing(&self) -> bool {
        self.flags.contains(NodeFlags::INITIALIZING)
    }

    pub const fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    pub const fn thumbnail(&self) -> Option<ThumbnailLink> {
        self.thumbnail
    }

    pub const fn thumbnail_of(&self) -> Option<WidgetId> {
        self.thumbnail_of
    }

    pub const fn image(&self) -> Option<&ImageState> {
        self.image.as_ref()
    }

    /// Tab bookkeeping, for notebooks.
    pub const fn tabs(&self) -> Option<&TabSet> {
        self.tabs.as_ref()
    }

    /// Application field identifier.
    pub fn parm_id(&self) -> Option<&str> {
        self.parm_id.as_deref()
    }

    /// Compact position summary for trace output.
    pub fn describe_position(&self) -> String {
        let (row, col, rows, cols) = self.area.map_or((0, 0, 1, 1), |a| {
            (a.row(), a.col(), a.span.row_span(), a.span.col_span())
        });
        let mut out = format!("({row},{col}) Span({rows},{cols})");
        if let Some(cursor) = &self.layout {
            let fmt_opt = |v: Option<u16>| v.map_or_else(|| "-".to_owned(), |v| v.to_string());
            out.push_str(&format!(
                " Ext({},{}) Last({},{})",
                cursor.bottom_row(),
                cursor.right_col(),
                fmt_opt(cursor.last_used_row()),
                fmt_opt(cursor.last_used_col()),
            ));
        }
        out
    }
}

/// Reference name for a caption: lowercase, spaces to underscores.
pub fn refname(caption: &str) -> String {
    caption.to_lowercase().replace(' ', "_")
}
