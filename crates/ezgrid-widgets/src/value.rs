#![forbid(unsafe_code)]

//! Uniform widget values.
//!
//! Native toolkits keep widget state in wildly different places: a label's
//! text, an entry's string variable, a listbox's selection, a scale's
//! position. [`ValueBinding`] is a closed union with one variant per storage
//! strategy, fixed when the widget is created, so `value()` and
//! `replace_value()` dispatch on a stored discriminant instead of inspecting
//! the widget type on every call.

use std::fmt;

/// A widget value as seen by the application.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value (unbound widgets, dropdowns with no selection).
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Value {
    /// Truthiness used by checkboxes.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Empty => false,
            Self::Text(text) => !text.is_empty(),
            Self::Number(n) => *n != 0.0,
            Self::Bool(b) => *b,
        }
    }

    /// Borrow the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    const fn kind_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Bool(_) => "bool",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(text) => f.write_str(text),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Why a value could not be stored in a binding.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingError {
    /// The binding cannot hold this kind of value.
    Kind {
        binding: &'static str,
        value: &'static str,
    },
    /// A selection widget was given an item it does not list.
    UnknownChoice(String),
    /// A choice widget was given an empty list of choices.
    EmptyChoices,
    /// The binding has no list of choices to replace.
    NoChoices { binding: &'static str },
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kind { binding, value } => {
                write!(f, "{binding} binding cannot hold a {value} value")
            }
            Self::UnknownChoice(item) => write!(f, "'{item}' is not one of the listed items"),
            Self::EmptyChoices => write!(f, "choice list must not be empty"),
            Self::NoChoices { binding } => write!(f, "{binding} binding has no choices"),
        }
    }
}

impl std::error::Error for BindingError {}

/// Where a widget keeps its value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueBinding {
    /// Frames, buttons, canvases: nothing to read or write.
    Unbound,
    /// A plain label; the value is its displayed text.
    Label(String),
    /// String-variable backed widgets (entries, info labels).
    Generic(String),
    /// Dropdown: an optional selection among choices.
    Choice {
        selected: Option<String>,
        choices: Vec<String>,
    },
    /// Listbox: exactly one selected row.
    Selection { items: Vec<String>, index: usize },
    /// Checkbox.
    Boolean(bool),
    /// Slider with an inclusive range.
    Scale { value: f64, min: f64, max: f64 },
    /// Multi-line text.
    ScrolledText(String),
}

impl ValueBinding {
    /// Short name of the binding variant, for errors and logs.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Unbound => "unbound",
            Self::Label(_) => "label",
            Self::Generic(_) => "generic",
            Self::Choice { .. } => "choice",
            Self::Selection { .. } => "selection",
            Self::Boolean(_) => "boolean",
            Self::Scale { .. } => "scale",
            Self::ScrolledText(_) => "scrolled-text",
        }
    }

    /// A listbox selection, falling back to the first item when `selection`
    /// is absent or not listed.
    pub fn selection(items: Vec<String>, selection: Option<&str>) -> Self {
        let index = selection
            .and_then(|wanted| items.iter().position(|item| item == wanted))
            .unwrap_or(0);
        Self::Selection { items, index }
    }

    /// A slider clamped into its range.
    pub fn scale(value: Option<f64>, min: f64, max: f64) -> Self {
        let value = value.unwrap_or(min);
        Self::Scale {
            value: clamp_range(value, min, max),
            min,
            max,
        }
    }

    /// Current value.
    pub fn value(&self) -> Value {
        match self {
            Self::Unbound => Value::Empty,
            Self::Label(text) | Self::Generic(text) | Self::ScrolledText(text) => {
                Value::Text(text.clone())
            }
            Self::Choice { selected, .. } => selected.clone().map_or(Value::Empty, Value::Text),
            Self::Selection { items, index } => items
                .get(*index)
                .cloned()
                .map_or(Value::Empty, Value::Text),
            Self::Boolean(checked) => Value::Bool(*checked),
            Self::Scale { value, .. } => Value::Number(*value),
        }
    }

    /// Store a new value. On error the binding is unchanged.
    pub fn replace(&mut self, new_value: Value) -> Result<(), BindingError> {
        let kind_error = |binding: &Self, value: &Value| BindingError::Kind {
            binding: binding.kind_name(),
            value: value.kind_name(),
        };
        match self {
            Self::Unbound => {}
            Self::Label(text) | Self::Generic(text) | Self::ScrolledText(text) => {
                *text = new_value.to_string();
            }
            Self::Choice { selected, .. } => {
                *selected = match new_value {
                    Value::Empty => None,
                    other => Some(other.to_string()),
                };
            }
            Self::Selection { items, index } => {
                let Value::Text(wanted) = &new_value else {
                    return Err(kind_error(self, &new_value));
                };
                *index = items
                    .iter()
                    .position(|item| item == wanted)
                    .ok_or_else(|| BindingError::UnknownChoice(wanted.clone()))?;
            }
            Self::Boolean(checked) => *checked = new_value.is_truthy(),
            Self::Scale { value, min, max } => {
                let number = match &new_value {
                    Value::Number(n) => Some(*n),
                    Value::Text(text) => text.trim().parse::<f64>().ok(),
                    _ => None,
                };
                let Some(number) = number.filter(|n| n.is_finite()) else {
                    return Err(kind_error(self, &new_value));
                };
                *value = clamp_range(number, *min, *max);
            }
        }
        Ok(())
    }

    /// Swap the list of choices of a dropdown or listbox, keeping the current
    /// selection when it is still listed and falling back to the first
    /// choice otherwise.
    pub fn replace_choices(&mut self, new_choices: Vec<String>) -> Result<(), BindingError> {
        match self {
            Self::Choice { selected, choices } => {
                let keep = selected
                    .as_ref()
                    .is_some_and(|current| new_choices.contains(current));
                if !keep {
                    *selected = new_choices.first().cloned();
                }
                *choices = new_choices;
                Ok(())
            }
            Self::Selection { items, index } => {
                if new_choices.is_empty() {
                    return Err(BindingError::EmptyChoices);
                }
                let current = items.get(*index).cloned();
                *index = current
                    .and_then(|current| new_choices.iter().position(|c| *c == current))
                    .unwrap_or(0);
                *items = new_choices;
                Ok(())
            }
            other => Err(BindingError::NoChoices {
                binding: other.kind_name(),
            }),
        }
    }
}

fn clamp_range(value: f64, a: f64, b: f64) -> f64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    value.clamp(lo, hi)
}
