#![forbid(unsafe_code)]

//! Widget tree over a native toolkit.
//!
//! [`Gui`] owns a [`WidgetTree`] and a [`Toolkit`]. Every `add_*` call
//! resolves a [`Place`](ezgrid_layout::Place) in the parent's grid, creates
//! the native widget, and records the new node as the parent's last child.
//!
//! - values: each widget carries a [`ValueBinding`]; [`Gui::value`] and
//!   [`Gui::replace_value`] read and write it uniformly
//! - images: canvases and image labels may be linked so one shows a
//!   thumbnail of the other, refreshed on every update
//! - notebooks: [`Gui::add_tab`], [`Gui::tab_select`], [`Gui::tab_forget`]
//!   keep a [`TabSet`] consistent with the native labels and pages
//! - teardown: [`Gui::destroy`] releases a subtree in a fixed order, see
//!   [`WidgetTree::destroy`]
//!
//! [`HeadlessToolkit`] records every native call and runs a virtual clock,
//! which is what the tests drive.
//!
//! ```
//! use ezgrid_layout::Place;
//! use ezgrid_widgets::{Gui, GuiConfig, HeadlessToolkit, Value};
//!
//! let mut gui = Gui::new(HeadlessToolkit::new(), GuiConfig::default()).unwrap();
//! let root = gui.root();
//! let name = gui.add_entry_field(root, Some("Name"), "", Place::next_row()).unwrap();
//! gui.replace_value(name, "Ada", None).unwrap();
//! assert_eq!(gui.value(name).unwrap(), Value::Text("Ada".into()));
//! ```

pub mod config;
pub mod error;
pub mod gui;
pub mod headless;
pub mod image;
pub mod node;
pub mod notebook;
pub mod place;
pub mod tabs;
pub mod toolkit;
pub mod tree;
pub mod value;

pub use config::GuiConfig;
pub use error::WidgetError;
pub use gui::{Gui, Handler};
pub use headless::{HeadlessToolkit, NativeWidget, ToolkitCall};
pub use self::image::{ImageError, ImageSource, ImageState};
pub use node::{NodeFlags, ScrollParts, ThumbnailLink, WidgetId, WidgetKind, WidgetNode};
pub use place::{ImageOptions, SliderOptions};
pub use tabs::{Tab, TabKey, TabRef, TabSet};
pub use toolkit::{NativeKind, NativeOptions, TaskToken, Toolkit, ToolkitError};
pub use tree::{Teardown, WidgetTree};
pub use value::{BindingError, Value, ValueBinding};
