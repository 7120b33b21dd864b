#![forbid(unsafe_code)]

//! Errors surfaced by widget operations.

use std::fmt;

use crate::image::ImageError;
use crate::node::WidgetId;
use crate::toolkit::ToolkitError;
use crate::value::BindingError;

/// Recoverable widget-layer failures.
///
/// Programming defects (placing into a node that is not a layout host) panic
/// instead.
#[derive(Debug)]
pub enum WidgetError {
    /// The ID does not name a live node.
    UnknownWidget(WidgetId),
    /// No tab of the notebook matches the reference.
    TabNotFound { notebook: WidgetId, tab: String },
    /// A tab operation was issued on a node without tabs.
    NotANotebook(WidgetId),
    /// A child was missing from its parent's child list during teardown.
    OwnershipMismatch { parent: WidgetId, child: WidgetId },
    /// Only one side of a thumbnail link was set.
    ThumbnailMismatch { node: WidgetId, other: WidgetId },
    /// The widget's binding cannot hold the given value.
    ValueKind {
        widget: WidgetId,
        binding: &'static str,
        value: &'static str,
    },
    /// A selection widget was given an item it does not list.
    UnknownChoice { widget: WidgetId, item: String },
    /// A choice widget needs at least one choice.
    EmptyChoices(WidgetId),
    /// A caption update targeted a widget without a caption.
    NoCaption(WidgetId),
    /// An image operation targeted a widget that cannot show images.
    NotAnImage(WidgetId),
    Image(ImageError),
    Toolkit(ToolkitError),
}

impl WidgetError {
    pub(crate) fn binding(widget: WidgetId, err: BindingError) -> Self {
        match err {
            BindingError::Kind { binding, value } => Self::ValueKind {
                widget,
                binding,
                value,
            },
            BindingError::UnknownChoice(item) => Self::UnknownChoice { widget, item },
            BindingError::EmptyChoices => Self::EmptyChoices(widget),
            BindingError::NoChoices { binding } => Self::ValueKind {
                widget,
                binding,
                value: "choice list",
            },
        }
    }
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownWidget(id) => write!(f, "unknown widget {id}"),
            Self::TabNotFound { notebook, tab } => {
                write!(f, "notebook {notebook} has no tab matching {tab}")
            }
            Self::NotANotebook(id) => write!(f, "widget {id} is not a notebook"),
            Self::OwnershipMismatch { parent, child } => write!(
                f,
                "ownership graph inconsistent: {child} not in children of {parent}"
            ),
            Self::ThumbnailMismatch { node, other } => {
                write!(f, "thumbnail link between {node} and {other} is one-sided")
            }
            Self::ValueKind {
                widget,
                binding,
                value,
            } => write!(f, "widget {widget}: {binding} binding cannot hold a {value} value"),
            Self::UnknownChoice { widget, item } => {
                write!(f, "widget {widget}: '{item}' is not one of the listed items")
            }
            Self::EmptyChoices(id) => write!(f, "widget {id}: choice list must not be empty"),
            Self::NoCaption(id) => write!(f, "widget {id} has no caption"),
            Self::NotAnImage(id) => write!(f, "widget {id} cannot show images"),
            Self::Image(err) => write!(f, "{err}"),
            Self::Toolkit(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for WidgetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image(err) => Some(err),
            Self::Toolkit(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ImageError> for WidgetError {
    fn from(err: ImageError) -> Self {
        Self::Image(err)
    }
}

impl From<ToolkitError> for WidgetError {
    fn from(err: ToolkitError) -> Self {
        Self::Toolkit(err)
    }
}
