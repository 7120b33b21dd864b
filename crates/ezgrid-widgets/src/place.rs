#![forbid(unsafe_code)]

//! Placement: one `add_*` per widget kind.
//!
//! Every placement follows the same path: resolve the requested position in
//! the parent's grid, create and place the native widget (plus its caption
//! label or scroll frame), wrap it in a node, record the occupied area in
//! the parent's bookkeeping, and attach the node as the parent's last child.
//!
//! A widget with a caption occupies two columns: the caption at the
//! resolved column, the widget itself one column to the right.

use ezgrid_core::event::{Event, EventKind};
use ezgrid_core::geometry::{GridArea, GridPos, GridSpan, Orient, Sticky};
use ezgrid_core::handle::NativeHandle;
use ezgrid_layout::{ColSpan, Place};
use tracing::{debug, debug_span};

use crate::error::WidgetError;
use crate::gui::Gui;
use crate::image::{self as img, ImageSource, ImageState};
use crate::node::{NodeFlags, ScrollParts, WidgetId, WidgetKind, WidgetNode, refname};
use crate::toolkit::{NativeKind, NativeOptions, Toolkit};
use crate::value::ValueBinding;

/// Options for [`Gui::add_slider`].
#[derive(Debug, Clone, PartialEq)]
pub struct SliderOptions {
    pub caption: Option<String>,
    pub value: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub orient: Orient,
    /// Track length in pixels.
    pub length: u32,
}

impl Default for SliderOptions {
    fn default() -> Self {
        Self {
            caption: None,
            value: None,
            min: 0.0,
            max: 100.0,
            orient: Orient::Horizontal,
            length: 10,
        }
    }
}

impl SliderOptions {
    #[must_use]
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    #[must_use]
    pub fn orient(mut self, orient: Orient) -> Self {
        self.orient = orient;
        self
    }

    #[must_use]
    pub fn length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }
}

/// Initial content of a canvas or image label.
#[derive(Debug, Clone, Default)]
pub struct ImageOptions {
    pub source: Option<ImageSource>,
    /// Show a thumbnail of this widget's image, refreshed whenever it changes.
    pub thumbnail_of: Option<WidgetId>,
    /// Thumbnail width; defaults to the configured width.
    pub thumbnail_width: Option<u32>,
    /// Visible canvas size; defaults to the configured size. Ignored by
    /// image labels.
    pub size: Option<(u32, u32)>,
}

impl ImageOptions {
    #[must_use]
    pub fn source(mut self, source: impl Into<ImageSource>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn thumbnail_of(mut self, base: WidgetId) -> Self {
        self.thumbnail_of = Some(base);
        self
    }

    #[must_use]
    pub fn thumbnail_width(mut self, width: u32) -> Self {
        self.thumbnail_width = Some(width);
        self
    }

    #[must_use]
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }
}

/// Scroll bars to wrap a widget in.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scrolled {
    pub(crate) horizontal: bool,
}

/// How one widget is created and placed.
pub(crate) struct Build {
    pub(crate) kind: WidgetKind,
    pub(crate) native: NativeKind,
    pub(crate) options: NativeOptions,
    pub(crate) name: String,
    pub(crate) caption: Option<String>,
    pub(crate) binding: ValueBinding,
    pub(crate) rows: u16,
    pub(crate) cols: ColSpan,
    pub(crate) sticky: Sticky,
    pub(crate) container: bool,
    pub(crate) scrolled: Option<Scrolled>,
    pub(crate) image: Option<ImageState>,
}

impl Build {
    pub(crate) fn new(kind: WidgetKind, native: NativeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            native,
            options: NativeOptions::new(),
            name: name.into(),
            caption: None,
            binding: ValueBinding::Unbound,
            rows: 1,
            cols: ColSpan::Exact(1),
            sticky: Sticky::empty(),
            container: false,
            scrolled: None,
            image: None,
        }
    }

    /// Name after the caption when there is one.
    fn captioned(mut self, caption: Option<&str>) -> Self {
        if let Some(text) = caption {
            self.name = refname(text);
            self.caption = Some(text.to_owned());
        }
        self
    }
}

/// Native widgets created for one placement.
struct Natives {
    handle: NativeHandle,
    caption: Option<NativeHandle>,
    scroll: ScrollParts,
}

impl<T: Toolkit> Gui<T> {
    /// Native handle new children of `id` are created in.
    fn native_parent(&self, id: WidgetId) -> Result<NativeHandle, WidgetError> {
        let node = self.tree.node(id)?;
        Ok(match node.kind {
            WidgetKind::Table => node.extra.first().copied().unwrap_or(node.handle),
            _ => node.handle,
        })
    }

    pub(crate) fn build(&mut self, parent: WidgetId, place: Place, b: Build) -> Result<WidgetId, WidgetError> {
        let _span = debug_span!("ezgrid.place", %parent, kind = ?b.kind).entered();
        let native_parent = self.native_parent(parent)?;
        let pos = self.tree.resolve(parent, place);
        let cols = self.tree.col_span(parent, pos.col, b.cols);

        let mut created = Vec::new();
        let natives = match self.build_native(native_parent, pos, cols, &b, &mut created) {
            Ok(natives) => natives,
            Err(err) => {
                for handle in created.into_iter().rev() {
                    self.toolkit.destroy(handle);
                }
                return Err(err);
            }
        };

        let id = self.tree.allocate_id();
        let mut node = WidgetNode::new(id, b.kind, natives.handle)
            .with_name(b.name)
            .with_binding(b.binding)
            .with_caption(natives.caption);
        node.scroll = natives.scroll;
        node.image = b.image;
        if b.container {
            node = node.container();
            let parent_traced = self
                .tree
                .get(parent)
                .is_some_and(|p| p.flags.contains(NodeFlags::TRACE));
            if self.config.trace_layout || parent_traced {
                node.flags |= NodeFlags::TRACE;
            }
        }
        let shows_value = !matches!(node.binding, ValueBinding::Unbound | ValueBinding::Label(_));
        self.tree.insert(node);

        let total_cols = cols.saturating_add(u16::from(natives.caption.is_some()));
        self.tree
            .remember(parent, id, GridArea::new(pos, GridSpan::new(b.rows, total_cols)));
        self.tree.append_child(parent, id)?;
        if shows_value {
            self.show_binding(id)?;
        }
        debug!(widget = %id, row = pos.row, col = pos.col, handle = %natives.handle, "placed");
        Ok(id)
    }

    fn build_native(
        &mut self,
        parent: NativeHandle,
        pos: GridPos,
        cols: u16,
        b: &Build,
        created: &mut Vec<NativeHandle>,
    ) -> Result<Natives, WidgetError> {
        let mut create = |toolkit: &mut T,
                          kind: NativeKind,
                          parent: NativeHandle,
                          options: &NativeOptions|
         -> Result<NativeHandle, WidgetError> {
            let handle = toolkit.create_widget(kind, Some(parent), options)?;
            created.push(handle);
            Ok(handle)
        };

        let mut widget_col = pos.col;
        let caption = match &b.caption {
            Some(text) => {
                let label = create(
                    &mut self.toolkit,
                    NativeKind::Label,
                    parent,
                    &NativeOptions::new().text(text.as_str()),
                )?;
                self.toolkit
                    .place(label, GridArea::cell(pos.row, pos.col), Sticky::W)?;
                widget_col = pos.col.saturating_add(1);
                Some(label)
            }
            None => None,
        };
        let area = GridArea::new(GridPos::new(pos.row, widget_col), GridSpan::new(b.rows, cols));

        let mut scroll = ScrollParts::default();
        let handle = match b.scrolled {
            Some(bars) => {
                let frame = create(
                    &mut self.toolkit,
                    NativeKind::Frame,
                    parent,
                    &NativeOptions::new().sunken(),
                )?;
                self.toolkit.place(frame, area, b.sticky)?;
                scroll.container = Some(frame);

                let handle = create(&mut self.toolkit, b.native, frame, &b.options)?;
                self.toolkit
                    .place(handle, GridArea::cell(0, 0), Sticky::NSEW)?;

                let vbar = create(
                    &mut self.toolkit,
                    NativeKind::Scrollbar,
                    frame,
                    &NativeOptions::new().orient(Orient::Vertical),
                )?;
                self.toolkit.place(vbar, GridArea::cell(0, 1), Sticky::NS)?;
                scroll.y_bar = Some(vbar);

                if bars.horizontal {
                    let hbar = create(
                        &mut self.toolkit,
                        NativeKind::Scrollbar,
                        frame,
                        &NativeOptions::new().orient(Orient::Horizontal),
                    )?;
                    self.toolkit.place(hbar, GridArea::cell(1, 0), Sticky::EW)?;
                    scroll.x_bar = Some(hbar);
                }
                handle
            }
            None => {
                let handle = create(&mut self.toolkit, b.native, parent, &b.options)?;
                self.toolkit.place(handle, area, b.sticky)?;
                handle
            }
        };
        Ok(Natives {
            handle,
            caption,
            scroll,
        })
    }

    /// A push button running `command` when pressed.
    pub fn add_button(
        &mut self,
        parent: WidgetId,
        caption: &str,
        place: Place,
        command: impl Fn(&mut Gui<T>, &Event) + 'static,
    ) -> Result<WidgetId, WidgetError> {
        let mut b = Build::new(WidgetKind::Button, NativeKind::Button, refname(caption));
        b.options = NativeOptions::new().text(caption);
        let id = self.build(parent, place, b)?;
        self.bind(id, EventKind::Command, command)?;
        Ok(id)
    }

    /// Static text. Its value is the text.
    pub fn add_label(&mut self, parent: WidgetId, text: &str, place: Place) -> Result<WidgetId, WidgetError> {
        let mut b = Build::new(WidgetKind::Label, NativeKind::Label, "label");
        b.options = NativeOptions::new().text(text);
        b.binding = ValueBinding::Label(text.to_owned());
        b.sticky = Sticky::W;
        self.build(parent, place, b)
    }

    /// Single-line text input, optionally captioned.
    pub fn add_entry_field(
        &mut self,
        parent: WidgetId,
        caption: Option<&str>,
        value: &str,
        place: Place,
    ) -> Result<WidgetId, WidgetError> {
        let mut b = Build::new(WidgetKind::EntryField, NativeKind::Entry, "entry").captioned(caption);
        b.options = NativeOptions::new().width(10);
        b.binding = ValueBinding::Generic(value.to_owned());
        b.sticky = Sticky::EW;
        self.build(parent, place, b)
    }

    /// Checkbox; the caption is drawn by the checkbox itself.
    pub fn add_checkbox(
        &mut self,
        parent: WidgetId,
        caption: Option<&str>,
        checked: bool,
        place: Place,
    ) -> Result<WidgetId, WidgetError> {
        let name = caption.map_or_else(|| "checkbox".to_owned(), refname);
        let mut b = Build::new(WidgetKind::Checkbox, NativeKind::Checkbutton, name);
        if let Some(text) = caption {
            b.options = NativeOptions::new().text(text);
        }
        b.binding = ValueBinding::Boolean(checked);
        b.sticky = Sticky::EW;
        self.build(parent, place, b)
    }

    /// Drop-down choice. `choices` must not be empty.
    ///
    /// An empty list is reported as [`WidgetError::EmptyChoices`] naming the
    /// parent, since the dropdown never came to exist.
    pub fn add_dropdown(
        &mut self,
        parent: WidgetId,
        caption: Option<&str>,
        choices: Vec<String>,
        selection: Option<&str>,
        place: Place,
    ) -> Result<WidgetId, WidgetError> {
        if choices.is_empty() {
            return Err(WidgetError::EmptyChoices(parent));
        }
        let mut b =
            Build::new(WidgetKind::Dropdown, NativeKind::OptionMenu, "dropdown").captioned(caption);
        b.options = NativeOptions::new().choices(choices.clone());
        b.binding = ValueBinding::Choice {
            selected: selection.map(str::to_owned),
            choices,
        };
        b.sticky = Sticky::EW;
        self.build(parent, place, b)
    }

    /// A plain container.
    pub fn add_frame(
        &mut self,
        parent: WidgetId,
        place: Place,
        colspan: impl Into<ColSpan>,
    ) -> Result<WidgetId, WidgetError> {
        let mut b = Build::new(WidgetKind::Frame, NativeKind::Frame, "frame");
        b.cols = colspan.into();
        b.sticky = Sticky::W;
        b.container = true;
        self.build(parent, place, b)
    }

    /// A container with a titled border.
    pub fn add_label_frame(
        &mut self,
        parent: WidgetId,
        caption: &str,
        place: Place,
        colspan: impl Into<ColSpan>,
    ) -> Result<WidgetId, WidgetError> {
        let mut b = Build::new(WidgetKind::LabelFrame, NativeKind::LabelFrame, refname(caption));
        b.options = NativeOptions::new().text(caption);
        b.cols = colspan.into();
        b.sticky = Sticky::W;
        b.container = true;
        self.build(parent, place, b)
    }

    /// Read-only text shown next to an optional caption.
    pub fn add_label_info(
        &mut self,
        parent: WidgetId,
        caption: Option<&str>,
        value: &str,
        place: Place,
    ) -> Result<WidgetId, WidgetError> {
        let mut b =
            Build::new(WidgetKind::LabelInfo, NativeKind::Label, "label_info").captioned(caption);
        b.binding = ValueBinding::Generic(value.to_owned());
        b.sticky = Sticky::EW;
        self.build(parent, place, b)
    }

    /// Scrolled single-selection list, `rows` tall.
    ///
    /// A `selection` that is absent or not listed selects the first item.
    pub fn add_listbox(
        &mut self,
        parent: WidgetId,
        caption: Option<&str>,
        items: Vec<String>,
        selection: Option<&str>,
        place: Place,
        rows: u16,
    ) -> Result<WidgetId, WidgetError> {
        let rows = rows.max(1);
        let mut b = Build::new(WidgetKind::Listbox, NativeKind::Listbox, "listbox").captioned(caption);
        b.options = NativeOptions::new()
            .height(u32::from(rows))
            .choices(items.clone());
        b.binding = ValueBinding::selection(items, selection);
        b.rows = rows;
        b.scrolled = Some(Scrolled { horizontal: false });
        self.build(parent, place, b)
    }

    /// Multi-line text with a vertical scroll bar, `height` rows tall.
    pub fn add_scrolled_entry_field(
        &mut self,
        parent: WidgetId,
        caption: &str,
        value: &str,
        place: Place,
        height: u16,
    ) -> Result<WidgetId, WidgetError> {
        let height = height.max(1);
        let mut b = Build::new(WidgetKind::ScrolledEntryField, NativeKind::Text, "text")
            .captioned(Some(caption));
        b.options = NativeOptions::new().width(10).height(u32::from(height));
        b.binding = ValueBinding::ScrolledText(value.to_owned());
        b.rows = height;
        b.sticky = Sticky::EW;
        b.scrolled = Some(Scrolled { horizontal: false });
        self.build(parent, place, b)
    }

    /// Slider over an inclusive range; the value is clamped into it.
    pub fn add_slider(
        &mut self,
        parent: WidgetId,
        options: SliderOptions,
        place: Place,
    ) -> Result<WidgetId, WidgetError> {
        let mut b = Build::new(WidgetKind::Slider, NativeKind::Scale, "slider")
            .captioned(options.caption.as_deref());
        b.options = NativeOptions::new()
            .width(options.length)
            .orient(options.orient)
            .range(options.min, options.max);
        b.binding = ValueBinding::scale(options.value, options.min, options.max);
        b.sticky = Sticky::EW;
        self.build(parent, place, b)
    }

    /// Scrolled canvas showing an image.
    ///
    /// With [`ImageOptions::thumbnail_of`], the canvas shows a thumbnail of
    /// that widget's image and follows its updates.
    pub fn add_canvas(
        &mut self,
        parent: WidgetId,
        options: ImageOptions,
        place: Place,
    ) -> Result<WidgetId, WidgetError> {
        let (width, height) = options.size.unwrap_or(self.config.canvas_size);
        let mut b = Build::new(WidgetKind::Canvas, NativeKind::Canvas, "canvas");
        b.options = NativeOptions::new().width(width).height(height);
        b.scrolled = Some(Scrolled { horizontal: true });
        b.image = Some(ImageState::with_viewport(width, height));
        let id = self.build(parent, place, b)?;
        self.init_image(id, options)?;
        Ok(id)
    }

    /// A label showing an image at its natural size.
    pub fn add_label_image(
        &mut self,
        parent: WidgetId,
        options: ImageOptions,
        place: Place,
        colspan: impl Into<ColSpan>,
    ) -> Result<WidgetId, WidgetError> {
        let mut b = Build::new(WidgetKind::LabelImage, NativeKind::Label, "image");
        b.cols = colspan.into();
        b.sticky = Sticky::W;
        b.image = Some(ImageState::default());
        let id = self.build(parent, place, b)?;
        self.init_image(id, options)?;
        Ok(id)
    }

    /// Show the initial image or thumbnail of a new image widget. On failure
    /// the widget is torn down again.
    fn init_image(&mut self, id: WidgetId, options: ImageOptions) -> Result<(), WidgetError> {
        let result = self.apply_image_options(id, options);
        if let Err(err) = result {
            self.teardown(id)?;
            return Err(err);
        }
        Ok(())
    }

    fn apply_image_options(&mut self, id: WidgetId, options: ImageOptions) -> Result<(), WidgetError> {
        match options.thumbnail_of {
            Some(base) => {
                let base_node = self.tree.node(base)?;
                if !base_node.kind.shows_images() {
                    return Err(WidgetError::NotAnImage(base));
                }
                let width = options.thumbnail_width.unwrap_or(self.config.thumbnail_width);
                let current = base_node.image.as_ref().and_then(|state| state.source.clone());
                if let Some(source) = current {
                    let thumb = img::make_thumbnail(&source, width)?;
                    self.show_image(id, thumb)?;
                }
                self.tree.link_thumbnail(base, id, width)
            }
            None => match options.source {
                Some(source) => {
                    let image = source.load()?;
                    self.show_image(id, image)
                }
                None => Ok(()),
            },
        }
    }

    /// Scrolled table; cells are added with [`Gui::add_cell`].
    pub fn add_table(
        &mut self,
        parent: WidgetId,
        place: Place,
        size: Option<(u32, u32)>,
        colspan: impl Into<ColSpan>,
    ) -> Result<WidgetId, WidgetError> {
        let (width, height) = size.unwrap_or(self.config.canvas_size);
        let mut b = Build::new(WidgetKind::Table, NativeKind::Canvas, "table");
        b.options = NativeOptions::new().width(width).height(height);
        b.cols = colspan.into();
        b.sticky = Sticky::W;
        b.container = true;
        b.scrolled = Some(Scrolled { horizontal: true });
        let id = self.build(parent, place, b)?;

        let canvas = self.handle(id)?;
        match self
            .toolkit
            .create_widget(NativeKind::Frame, Some(canvas), &NativeOptions::new())
        {
            Ok(inner) => {
                self.tree.node_mut(id)?.extra.push(inner);
                Ok(id)
            }
            Err(err) => {
                self.teardown(id)?;
                Err(err.into())
            }
        }
    }

    /// A text cell inside a table.
    ///
    /// # Panics
    ///
    /// If `table` is not a layout host.
    pub fn add_cell(&mut self, table: WidgetId, text: &str, place: Place) -> Result<WidgetId, WidgetError> {
        let mut b = Build::new(WidgetKind::TableCell, NativeKind::Label, "cell");
        b.options = NativeOptions::new().text(text);
        b.binding = ValueBinding::Label(text.to_owned());
        self.build(table, place, b)
    }

    /// A secondary top-level window with its own grid.
    pub fn make_popup_window(&mut self, title: &str) -> Result<WidgetId, WidgetError> {
        let handle = self
            .toolkit
            .create_widget(NativeKind::Toplevel, None, &NativeOptions::new().text(title))?;
        let id = self.tree.allocate_id();
        let mut node = WidgetNode::new(id, WidgetKind::Popup, handle)
            .with_name(title)
            .container();
        if self.config.trace_layout {
            node.flags |= NodeFlags::TRACE;
        }
        self.tree.insert(node);
        debug!(popup = %id, title, "popup window created");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuiConfig;
    use crate::headless::HeadlessToolkit;
    use crate::value::Value;
    use ezgrid_layout::{ColSpec, RowSpec};
    use image::{DynamicImage, RgbImage};

    fn gui() -> Gui<HeadlessToolkit> {
        Gui::new(HeadlessToolkit::new(), GuiConfig::default()).unwrap()
    }

    fn area(gui: &Gui<HeadlessToolkit>, id: WidgetId) -> GridArea {
        gui.node(id).unwrap().area().unwrap()
    }

    fn native_area(gui: &Gui<HeadlessToolkit>, handle: NativeHandle) -> GridArea {
        gui.toolkit().widget(handle).unwrap().area.unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn captioned_entry_occupies_two_columns() {
        let mut gui = gui();
        let root = gui.root();
        let entry = gui
            .add_entry_field(root, Some("First Name"), "Ada", Place::next_row())
            .unwrap();
        let node = gui.node(entry).unwrap();
        assert_eq!(node.name(), "first_name");
        assert_eq!(area(&gui, entry), GridArea::new(GridPos::new(0, 0), GridSpan::cols(2)));
        let caption = node.caption().unwrap();
        assert_eq!(native_area(&gui, caption), GridArea::cell(0, 0));
        assert_eq!(native_area(&gui, node.handle()), GridArea::cell(0, 1));

        let beside = gui.add_label(root, "x", Place::same_row()).unwrap();
        assert_eq!(area(&gui, beside).col(), 2);
    }

    #[test]
    fn uncaptioned_entry_stays_in_its_column() {
        let mut gui = gui();
        let root = gui.root();
        let entry = gui.add_entry_field(root, None, "", Place::next_row()).unwrap();
        let handle = gui.handle(entry).unwrap();
        assert_eq!(native_area(&gui, handle), GridArea::cell(0, 0));
        assert_eq!(area(&gui, entry).span, GridSpan::ONE);
    }

    #[test]
    fn listbox_rows_push_the_next_row_down() {
        let mut gui = gui();
        let root = gui.root();
        let list = gui
            .add_listbox(root, Some("Pick"), strings(&["a", "b"]), Some("b"), Place::next_row(), 5)
            .unwrap();
        assert_eq!(gui.value(list).unwrap(), Value::Text("b".into()));
        assert!(gui.node(list).unwrap().scroll().y_bar.is_some());
        let below = gui.add_label(root, "below", Place::next_row()).unwrap();
        assert_eq!(area(&gui, below).row(), 5);
    }

    #[test]
    fn dropdown_requires_choices() {
        let mut gui = gui();
        let root = gui.root();
        let err = gui
            .add_dropdown(root, None, Vec::new(), None, Place::next_row())
            .unwrap_err();
        assert!(matches!(err, WidgetError::EmptyChoices(id) if id == root));
        assert!(gui.node(root).unwrap().children().is_empty());

        let dd = gui
            .add_dropdown(root, Some("Mode"), strings(&["fast", "slow"]), None, Place::next_row())
            .unwrap();
        assert_eq!(gui.value(dd).unwrap(), Value::Empty);
    }

    #[test]
    fn full_width_frame_spans_used_columns() {
        let mut gui = gui();
        let root = gui.root();
        gui.add_label(root, "a", Place::next_row()).unwrap();
        gui.add_label(root, "b", Place::same_row()).unwrap();
        gui.add_label(root, "c", Place::same_row()).unwrap();
        let frame = gui
            .add_frame(root, Place::new(RowSpec::Extend, ColSpec::Left), ColSpan::All)
            .unwrap();
        assert_eq!(area(&gui, frame), GridArea::new(GridPos::new(1, 0), GridSpan::cols(3)));
        assert!(gui.node(frame).unwrap().is_container());
    }

    #[test]
    fn nested_frames_keep_their_own_bookkeeping() {
        let mut gui = gui();
        let root = gui.root();
        let frame = gui.add_frame(root, Place::next_row(), 1).unwrap();
        gui.add_label(frame, "inner", Place::next_row()).unwrap();
        gui.add_label(frame, "inner", Place::next_row()).unwrap();
        let outer = gui.add_label(root, "outer", Place::next_row()).unwrap();
        assert_eq!(area(&gui, outer).row(), 1);
        let inner_cursor = gui.node(frame).unwrap().layout().unwrap();
        assert_eq!(inner_cursor.bottom_row(), 1);
    }

    #[test]
    fn slider_clamps_initial_value() {
        let mut gui = gui();
        let root = gui.root();
        let slider = gui
            .add_slider(
                root,
                SliderOptions::default().caption("Gain").range(0.0, 10.0).value(50.0),
                Place::next_row(),
            )
            .unwrap();
        assert_eq!(gui.value(slider).unwrap(), Value::Number(10.0));
        assert_eq!(gui.node(slider).unwrap().name(), "gain");
    }

    #[test]
    fn canvas_thumbnail_follows_base_image() {
        let mut gui = gui();
        let root = gui.root();
        let base = gui
            .add_canvas(
                root,
                ImageOptions::default().source(RgbImage::new(200, 100)),
                Place::next_row(),
            )
            .unwrap();
        let thumb = gui
            .add_label_image(
                root,
                ImageOptions::default().thumbnail_of(base).thumbnail_width(50),
                Place::same_row(),
                1,
            )
            .unwrap();
        assert_eq!(gui.node(thumb).unwrap().thumbnail_of(), Some(base));
        let shown = |gui: &Gui<HeadlessToolkit>| gui.node(thumb).unwrap().image().unwrap().shown;
        assert_eq!(shown(&gui), Some((50, 25)));

        gui.update_image(base, DynamicImage::ImageRgb8(RgbImage::new(100, 100)))
            .unwrap();
        assert_eq!(shown(&gui), Some((50, 50)));
        gui.tree().validate().unwrap();
    }

    #[test]
    fn failed_update_keeps_previous_image_and_link() {
        let mut gui = gui();
        let root = gui.root();
        let base = gui
            .add_canvas(
                root,
                ImageOptions::default().source(RgbImage::new(40, 20)),
                Place::next_row(),
            )
            .unwrap();
        let thumb = gui
            .add_label_image(root, ImageOptions::default().thumbnail_of(base), Place::next_row(), 1)
            .unwrap();
        let err = gui
            .update_image(base, std::path::PathBuf::from("/no/such/image.png"))
            .unwrap_err();
        assert!(matches!(err, WidgetError::Image(_)));
        assert_eq!(gui.node(base).unwrap().image().unwrap().shown, Some((40, 20)));
        assert_eq!(gui.node(base).unwrap().thumbnail().map(|l| l.node), Some(thumb));
        gui.tree().validate().unwrap();
    }

    #[test]
    fn wide_images_are_scaled_to_the_canvas() {
        let mut gui = gui();
        let root = gui.root();
        let canvas = gui
            .add_canvas(
                root,
                ImageOptions::default().size(100, 50).source(RgbImage::new(400, 400)),
                Place::next_row(),
            )
            .unwrap();
        let node = gui.node(canvas).unwrap();
        let state = node.image().unwrap();
        assert_eq!(state.shown, Some((100, 100)));
        assert_eq!(state.resize_ratio, Some(0.25));
        let y_bar = node.scroll().y_bar.unwrap();
        assert_eq!(gui.toolkit().widget(y_bar).unwrap().scroll, Some((0.0, 0.5)));
    }

    #[test]
    fn images_on_plain_widgets_are_rejected() {
        let mut gui = gui();
        let root = gui.root();
        let label = gui.add_label(root, "text", Place::next_row()).unwrap();
        let err = gui.update_image(label, RgbImage::new(1, 1)).unwrap_err();
        assert!(matches!(err, WidgetError::NotAnImage(id) if id == label));
    }

    #[test]
    fn table_cells_live_in_the_inner_frame() {
        let mut gui = gui();
        let root = gui.root();
        let table = gui.add_table(root, Place::next_row(), None, 1).unwrap();
        let cell = gui.add_cell(table, "A0", Place::at(0, 0)).unwrap();
        let inner = gui.node(table).unwrap().extra[0];
        let cell_handle = gui.handle(cell).unwrap();
        assert_eq!(gui.toolkit().widget(cell_handle).unwrap().parent, Some(inner));
        assert_eq!(gui.value(cell).unwrap(), Value::Text("A0".into()));

        let teardown = gui.destroy(table).unwrap();
        assert!(teardown.released.contains(&inner));
        assert!(teardown.destroyed.contains(&cell));
    }

    #[test]
    fn popup_windows_have_their_own_grid() {
        let mut gui = gui();
        let popup = gui.make_popup_window("Settings").unwrap();
        let label = gui.add_label(popup, "inside", Place::next_row()).unwrap();
        assert_eq!(area(&gui, label).row(), 0);
        assert_eq!(gui.node(popup).unwrap().parent(), None);
    }

    #[test]
    #[should_panic(expected = "is not a layout host")]
    fn placing_into_a_button_panics() {
        let mut gui = gui();
        let root = gui.root();
        let button = gui.add_button(root, "B", Place::next_row(), |_, _| {}).unwrap();
        let _ = gui.add_label(button, "x", Place::next_row());
    }

    #[test]
    fn trace_layout_marks_new_containers() {
        let mut gui =
            Gui::new(HeadlessToolkit::new(), GuiConfig::default().with_trace_layout(true)).unwrap();
        let root = gui.root();
        let frame = gui.add_frame(root, Place::next_row(), 1).unwrap();
        assert!(gui.node(frame).unwrap().flags().contains(NodeFlags::TRACE));
    }
}
