#![forbid(unsafe_code)]

//! The [`Gui`] facade: a widget tree bound to a toolkit.
//!
//! Placement lives in `place.rs` and notebook operations in `notebook.rs`;
//! this module holds the shared state, event routing, values, images, and
//! teardown.
//!
//! Handlers are reference-counted closures. Dispatch clones the handlers for
//! an event out of the table before calling them, so a handler may freely
//! call back into the `Gui`, including binding or destroying widgets.

use std::collections::HashMap;
use std::rc::Rc;

use ezgrid_core::event::{Event, EventKind};
use ezgrid_core::handle::NativeHandle;
use image::{DynamicImage, RgbImage};
use tracing::{debug, debug_span, trace, warn};

use crate::config::GuiConfig;
use crate::error::WidgetError;
use crate::image::{self as img, ImageSource};
use crate::node::{NodeFlags, WidgetId, WidgetKind, WidgetNode};
use crate::toolkit::{NativeKind, NativeOptions, TaskToken, Toolkit};
use crate::tree::{Teardown, WidgetTree};
use crate::value::Value;

/// An event handler.
pub type Handler<T> = Rc<dyn Fn(&mut Gui<T>, &Event)>;

/// Work scheduled through [`Toolkit::schedule_deferred`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Deferred {
    /// Select a notebook's first tab and announce it.
    SelectFirstTab { notebook: WidgetId, content: WidgetId },
}

/// A widget tree driving a native toolkit.
pub struct Gui<T: Toolkit> {
    pub(crate) toolkit: T,
    pub(crate) tree: WidgetTree,
    pub(crate) config: GuiConfig,
    root: WidgetId,
    handlers: HashMap<(NativeHandle, EventKind), Vec<Handler<T>>>,
    pub(crate) deferred: HashMap<TaskToken, Deferred>,
    next_token: u64,
    pub(crate) next_tab_key: u64,
}

impl<T: Toolkit> std::fmt::Debug for Gui<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gui")
            .field("root", &self.root)
            .field("nodes", &self.tree.len())
            .field("handlers", &self.handlers.len())
            .field("deferred", &self.deferred.len())
            .finish_non_exhaustive()
    }
}

impl<T: Toolkit> Gui<T> {
    /// Create the main window.
    pub fn new(mut toolkit: T, config: GuiConfig) -> Result<Self, WidgetError> {
        let handle = toolkit.create_widget(NativeKind::Root, None, &NativeOptions::new())?;
        let mut tree = WidgetTree::new();
        let id = tree.allocate_id();
        let mut node = WidgetNode::new(id, WidgetKind::Root, handle)
            .with_name("root")
            .container();
        if config.trace_layout {
            node.flags |= NodeFlags::TRACE;
        }
        let root = tree.insert(node);
        debug!(%root, %handle, "gui created");
        Ok(Self {
            toolkit,
            tree,
            config,
            root,
            handlers: HashMap::new(),
            deferred: HashMap::new(),
            next_token: 0,
            next_tab_key: 0,
        })
    }

    /// The main window.
    pub const fn root(&self) -> WidgetId {
        self.root
    }

    pub const fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub const fn toolkit(&self) -> &T {
        &self.toolkit
    }

    pub fn toolkit_mut(&mut self) -> &mut T {
        &mut self.toolkit
    }

    pub const fn config(&self) -> &GuiConfig {
        &self.config
    }

    pub fn node(&self, id: WidgetId) -> Result<&WidgetNode, WidgetError> {
        self.tree.node(id)
    }

    /// Native handle of a live widget.
    pub fn handle(&self, id: WidgetId) -> Result<NativeHandle, WidgetError> {
        Ok(self.tree.node(id)?.handle)
    }

    /// Attach an application field identifier.
    pub fn set_parm_id(&mut self, id: WidgetId, parm_id: impl Into<String>) -> Result<(), WidgetError> {
        self.tree.node_mut(id)?.parm_id = Some(parm_id.into());
        Ok(())
    }

    /// Turn per-placement trace events on or off for a container.
    pub fn set_trace(&mut self, id: WidgetId, enabled: bool) -> Result<(), WidgetError> {
        self.tree.node_mut(id)?.flags.set(NodeFlags::TRACE, enabled);
        Ok(())
    }

    pub(crate) fn allocate_token(&mut self) -> TaskToken {
        self.next_token += 1;
        TaskToken::from_raw(self.next_token)
    }

    // ── Events ──────────────────────────────────────────────────────────

    /// Call `handler` whenever `kind` fires on widget `id`.
    ///
    /// Handlers accumulate; they run in binding order.
    pub fn bind(
        &mut self,
        id: WidgetId,
        kind: EventKind,
        handler: impl Fn(&mut Gui<T>, &Event) + 'static,
    ) -> Result<(), WidgetError> {
        let handle = self.handle(id)?;
        self.bind_handle(handle, kind, Rc::new(handler))
    }

    pub(crate) fn bind_handle(
        &mut self,
        handle: NativeHandle,
        kind: EventKind,
        handler: Handler<T>,
    ) -> Result<(), WidgetError> {
        let key = (handle, kind);
        if !self.handlers.contains_key(&key) {
            self.toolkit.bind_event(handle, kind)?;
        }
        self.handlers.entry(key).or_default().push(handler);
        trace!(%handle, event = kind.name(), "handler bound");
        Ok(())
    }

    /// Drop every handler for `kind` on widget `id`.
    pub fn unbind(&mut self, id: WidgetId, kind: EventKind) -> Result<usize, WidgetError> {
        let handle = self.handle(id)?;
        Ok(self
            .handlers
            .remove(&(handle, kind))
            .map_or(0, |handlers| handlers.len()))
    }

    /// Deliver an event from the native side.
    ///
    /// A click on a notebook tab label selects that tab before any handler
    /// bound to the label runs. Returns the number of handlers called.
    pub fn dispatch(&mut self, event: Event) -> Result<usize, WidgetError> {
        let _span = debug_span!("ezgrid.dispatch", handle = %event.handle, event = event.kind.name())
            .entered();
        if event.kind == EventKind::Click
            && let Some((notebook, ix)) = self.tab_label_owner(event.handle)
        {
            self.tab_select(notebook, ix)?;
        }
        Ok(self.notify(event.handle, event.kind))
    }

    /// Run the handlers bound to `(handle, kind)`.
    pub(crate) fn notify(&mut self, handle: NativeHandle, kind: EventKind) -> usize {
        let Some(handlers) = self.handlers.get(&(handle, kind)).cloned() else {
            return 0;
        };
        let event = Event::new(handle, kind);
        for handler in &handlers {
            handler(self, &event);
        }
        handlers.len()
    }

    fn tab_label_owner(&self, label: NativeHandle) -> Option<(WidgetId, usize)> {
        self.tree.iter().find_map(|node| {
            let ix = node.tabs.as_ref()?.position_of_label(label)?;
            Some((node.id, ix))
        })
    }

    /// Simulate a button press.
    pub fn invoke(&mut self, id: WidgetId) -> Result<usize, WidgetError> {
        let handle = self.handle(id)?;
        self.dispatch(Event::new(handle, EventKind::Command))
    }

    // ── Values ──────────────────────────────────────────────────────────

    /// Current value of a widget.
    pub fn value(&self, id: WidgetId) -> Result<Value, WidgetError> {
        Ok(self.tree.node(id)?.binding.value())
    }

    /// Store a new value, show it, and optionally replace the caption text.
    ///
    /// Nothing changes when the value does not fit the widget or a caption is
    /// given for a widget without one.
    pub fn replace_value(
        &mut self,
        id: WidgetId,
        new_value: impl Into<Value>,
        caption: Option<&str>,
    ) -> Result<(), WidgetError> {
        let node = self.tree.node(id)?;
        let caption_handle = match caption {
            Some(_) => Some(node.caption.ok_or(WidgetError::NoCaption(id))?),
            None => None,
        };
        self.store_value(id, new_value.into())?;
        self.show_binding(id)?;
        if let (Some(handle), Some(text)) = (caption_handle, caption) {
            self.toolkit.set_text(handle, text)?;
        }
        Ok(())
    }

    /// A value edited on the native side: store it and fire
    /// [`EventKind::Change`].
    pub fn input(&mut self, id: WidgetId, new_value: impl Into<Value>) -> Result<usize, WidgetError> {
        self.store_value(id, new_value.into())?;
        let handle = self.handle(id)?;
        Ok(self.notify(handle, EventKind::Change))
    }

    fn store_value(&mut self, id: WidgetId, new_value: Value) -> Result<(), WidgetError> {
        let node = self.tree.node_mut(id)?;
        node.binding
            .replace(new_value)
            .map_err(|err| WidgetError::binding(id, err))
    }

    /// Push the binding's current value to the native widget.
    pub(crate) fn show_binding(&mut self, id: WidgetId) -> Result<(), WidgetError> {
        use crate::value::ValueBinding;
        let node = self.tree.node(id)?;
        let handle = node.handle;
        match &node.binding {
            ValueBinding::Unbound => Ok(()),
            ValueBinding::Label(text) => {
                let text = text.clone();
                Ok(self.toolkit.set_text(handle, &text)?)
            }
            binding => {
                let value = binding.value();
                Ok(self.toolkit.show_value(handle, &value)?)
            }
        }
    }

    /// Replace the list of a dropdown or listbox.
    ///
    /// The selection survives when still listed; otherwise the first choice
    /// is selected.
    pub fn replace_choices(&mut self, id: WidgetId, choices: Vec<String>) -> Result<(), WidgetError> {
        let node = self.tree.node_mut(id)?;
        node.binding
            .replace_choices(choices.clone())
            .map_err(|err| WidgetError::binding(id, err))?;
        let handle = node.handle;
        self.toolkit.set_choices(handle, &choices)?;
        self.show_binding(id)
    }

    // ── Images ──────────────────────────────────────────────────────────

    /// Replace the image of a canvas or image label, then refresh its
    /// thumbnail.
    ///
    /// A source that fails to load changes nothing. A failed thumbnail
    /// derivation leaves the previous thumbnail in place, and the link
    /// intact.
    pub fn update_image(
        &mut self,
        id: WidgetId,
        source: impl Into<ImageSource>,
    ) -> Result<(), WidgetError> {
        let _span = debug_span!("ezgrid.image.update", widget = %id).entered();
        let node = self.tree.node(id)?;
        if !node.kind.shows_images() {
            return Err(WidgetError::NotAnImage(id));
        }
        let image = source.into().load()?;
        self.show_image(id, image)
    }

    pub(crate) fn show_image(&mut self, id: WidgetId, image: DynamicImage) -> Result<(), WidgetError> {
        let node = self.tree.node(id)?;
        if !node.kind.shows_images() {
            return Err(WidgetError::NotAnImage(id));
        }
        let handle = node.handle;
        let scroll = node.scroll;
        let thumbnail = node.thumbnail;
        let viewport = node.image.as_ref().and_then(|state| state.viewport);

        let (shown, ratio) = match viewport {
            Some((width, _)) => img::fit_width(&image, width),
            None => (image.to_rgb8(), None),
        };
        self.toolkit.show_image(handle, &shown)?;
        if let Some((view_w, view_h)) = viewport {
            let (w, h) = shown.dimensions();
            if let Some(bar) = scroll.x_bar {
                self.toolkit.set_scroll(bar, 0.0, visible_fraction(view_w, w));
            }
            if let Some(bar) = scroll.y_bar {
                self.toolkit.set_scroll(bar, 0.0, visible_fraction(view_h, h));
            }
        }
        trace!(widget = %id, size = ?shown.dimensions(), ?ratio, "image shown");

        let thumb = match thumbnail {
            Some(link) => Some((link, img::make_thumbnail(&image, link.width))),
            None => None,
        };
        self.tree
            .node_mut(id)?
            .image
            .get_or_insert_with(Default::default)
            .set(image, &shown, ratio);

        match thumb {
            Some((link, Ok(small))) => self.show_image(link.node, small),
            Some((link, Err(err))) => {
                warn!(widget = %id, thumbnail = %link.node, error = %err, "thumbnail derivation failed");
                Err(err.into())
            }
            None => Ok(()),
        }
    }

    /// Derive a thumbnail `width` pixels wide, preserving the aspect ratio.
    pub fn make_thumbnail(&self, image: &DynamicImage, width: u32) -> Result<DynamicImage, WidgetError> {
        Ok(img::make_thumbnail(image, width)?)
    }

    /// A blank image to show while real content is unavailable.
    pub fn create_substitute_image(&self, width: u32, height: u32) -> RgbImage {
        img::substitute_image(width, height)
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    pub fn focus(&mut self, id: WidgetId) -> Result<(), WidgetError> {
        let handle = self.handle(id)?;
        self.toolkit.focus(handle);
        Ok(())
    }

    /// Process pending native work; ends the initialization phase of every
    /// widget created so far.
    pub fn update(&mut self) {
        let ids: Vec<WidgetId> = self.tree.iter().map(WidgetNode::id).collect();
        for id in ids {
            if let Some(node) = self.tree.get_mut(id) {
                node.flags.remove(NodeFlags::INITIALIZING);
            }
        }
        self.toolkit.update();
    }

    /// Destroy a widget and everything it owns.
    ///
    /// A notebook tab's content is forgotten through its notebook so the
    /// selection moves and observers hear about it.
    pub fn destroy(&mut self, id: WidgetId) -> Result<Teardown, WidgetError> {
        let node = self.tree.node(id)?;
        if let Some(notebook) = node.parent
            && self
                .tree
                .get(notebook)
                .and_then(|nb| nb.tabs.as_ref())
                .is_some_and(|tabs| tabs.position_of_content(id).is_some())
        {
            return self.tab_forget(notebook, id);
        }
        self.teardown(id)
    }

    /// Tear down `id`, then drop handlers and deferred work that pointed at
    /// what was released.
    pub(crate) fn teardown(&mut self, id: WidgetId) -> Result<Teardown, WidgetError> {
        let teardown = self.tree.destroy(id, &mut self.toolkit)?;
        self.handlers
            .retain(|(handle, _), _| !teardown.released.contains(handle));
        for token in &teardown.cancelled {
            self.deferred.remove(token);
        }
        Ok(teardown)
    }

    /// Destroy a native widget no node owns, with its handlers.
    pub(crate) fn release_native(&mut self, handle: NativeHandle) {
        self.toolkit.destroy(handle);
        self.handlers.retain(|(bound, _), _| *bound != handle);
    }

    /// Cancel a deferred task before it runs.
    pub(crate) fn cancel_deferred(&mut self, token: TaskToken) {
        self.toolkit.cancel_deferred(token);
        self.deferred.remove(&token);
    }

    /// Route a due deferred task. Unknown or stale tokens are ignored.
    ///
    /// Returns whether the task did anything.
    pub fn run_deferred(&mut self, token: TaskToken) -> Result<bool, WidgetError> {
        let Some(task) = self.deferred.remove(&token) else {
            trace!(token = token.raw(), "deferred task unknown or cancelled");
            return Ok(false);
        };
        match task {
            Deferred::SelectFirstTab { notebook, content } => {
                self.select_first_tab(token, notebook, content)
            }
        }
    }
}

fn visible_fraction(view: u32, total: u32) -> f32 {
    if total == 0 {
        return 1.0;
    }
    (view as f32 / total as f32).min(1.0)
}
