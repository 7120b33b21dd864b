#![forbid(unsafe_code)]

//! In-memory [`Toolkit`] for tests and simulations.
//!
//! Keeps a model of every native widget, a global stacking order, a virtual
//! clock for deferred tasks, and a journal of every call made into it.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use ezgrid_core::event::EventKind;
use ezgrid_core::geometry::{GridArea, Sticky};
use ezgrid_core::handle::NativeHandle;
use image::RgbImage;

use crate::toolkit::{NativeKind, NativeOptions, TaskToken, Toolkit, ToolkitError};
use crate::value::Value;

/// One call into the headless toolkit.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolkitCall {
    Create {
        handle: NativeHandle,
        kind: NativeKind,
        parent: Option<NativeHandle>,
    },
    Place {
        handle: NativeHandle,
        area: GridArea,
        sticky: Sticky,
    },
    Destroy(NativeHandle),
    Bind {
        handle: NativeHandle,
        kind: EventKind,
    },
    Schedule {
        token: TaskToken,
        delay: Duration,
    },
    Cancel(TaskToken),
    Raise(NativeHandle),
    Lower(NativeHandle),
    SetText {
        handle: NativeHandle,
        text: String,
    },
    ShowValue {
        handle: NativeHandle,
        value: Value,
    },
    SetChoices {
        handle: NativeHandle,
        choices: Vec<String>,
    },
    ShowImage {
        handle: NativeHandle,
        size: (u32, u32),
    },
    SetScroll {
        bar: NativeHandle,
        first: f32,
        last: f32,
    },
    Focus(NativeHandle),
    Update,
}

/// Model of one native widget.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeWidget {
    pub kind: NativeKind,
    pub parent: Option<NativeHandle>,
    pub options: NativeOptions,
    pub area: Option<GridArea>,
    pub sticky: Sticky,
    pub text: Option<String>,
    pub value: Value,
    pub choices: Vec<String>,
    pub image_size: Option<(u32, u32)>,
    pub scroll: Option<(f32, f32)>,
    pub events: Vec<EventKind>,
}

/// Display-less toolkit with a virtual clock.
#[derive(Debug, Default)]
pub struct HeadlessToolkit {
    widgets: BTreeMap<NativeHandle, NativeWidget>,
    stacking: Vec<NativeHandle>,
    next_handle: u64,
    now: Duration,
    timers: BTreeMap<(Duration, u64), TaskToken>,
    timer_seq: u64,
    focused: Option<NativeHandle>,
    updates: usize,
    journal: Vec<ToolkitCall>,
}

impl HeadlessToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward and return the tasks that came due, in order.
    pub fn advance(&mut self, by: Duration) -> Vec<TaskToken> {
        self.now = self.now.saturating_add(by);
        let mut due = Vec::new();
        while let Some(entry) = self.timers.first_entry() {
            if entry.key().0 > self.now {
                break;
            }
            due.push(entry.remove());
        }
        due
    }

    /// Time until the next pending task, if any.
    pub fn next_due(&self) -> Option<Duration> {
        self.timers
            .keys()
            .next()
            .map(|(at, _)| at.saturating_sub(self.now))
    }

    pub fn pending_tasks(&self) -> usize {
        self.timers.len()
    }

    pub fn widget(&self, handle: NativeHandle) -> Option<&NativeWidget> {
        self.widgets.get(&handle)
    }

    pub fn is_live(&self, handle: NativeHandle) -> bool {
        self.widgets.contains_key(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.widgets.len()
    }

    /// Whether `a` is stacked above `b`.
    pub fn is_above(&self, a: NativeHandle, b: NativeHandle) -> bool {
        let pos = |h| self.stacking.iter().position(|x| *x == h);
        matches!((pos(a), pos(b)), (Some(pa), Some(pb)) if pa > pb)
    }

    pub fn focused(&self) -> Option<NativeHandle> {
        self.focused
    }

    pub const fn update_count(&self) -> usize {
        self.updates
    }

    /// Every call made so far.
    pub fn calls(&self) -> &[ToolkitCall] {
        &self.journal
    }

    /// Drain the journal.
    pub fn take_calls(&mut self) -> Vec<ToolkitCall> {
        std::mem::take(&mut self.journal)
    }

    fn widget_mut(&mut self, handle: NativeHandle) -> Result<&mut NativeWidget, ToolkitError> {
        self.widgets
            .get_mut(&handle)
            .ok_or(ToolkitError::UnknownHandle(handle))
    }

    fn restack(&mut self, handle: NativeHandle, on_top: bool) {
        if let Some(pos) = self.stacking.iter().position(|h| *h == handle) {
            self.stacking.remove(pos);
            if on_top {
                self.stacking.push(handle);
            } else {
                self.stacking.insert(0, handle);
            }
        }
    }
}

impl Toolkit for HeadlessToolkit {
    fn create_widget(
        &mut self,
        kind: NativeKind,
        parent: Option<NativeHandle>,
        options: &NativeOptions,
    ) -> Result<NativeHandle, ToolkitError> {
        if let Some(parent) = parent
            && !self.widgets.contains_key(&parent)
        {
            return Err(ToolkitError::UnknownHandle(parent));
        }
        self.next_handle += 1;
        let handle = NativeHandle::from_raw(self.next_handle);
        let value = match (kind, options.range) {
            (NativeKind::Scale, Some((min, _))) => Value::Number(min),
            _ => Value::Empty,
        };
        self.widgets.insert(
            handle,
            NativeWidget {
                kind,
                parent,
                options: options.clone(),
                area: None,
                sticky: Sticky::empty(),
                text: options.text.clone(),
                value,
                choices: options.choices.clone(),
                image_size: None,
                scroll: None,
                events: Vec::new(),
            },
        );
        self.stacking.push(handle);
        self.journal.push(ToolkitCall::Create {
            handle,
            kind,
            parent,
        });
        Ok(handle)
    }

    fn place(
        &mut self,
        handle: NativeHandle,
        area: GridArea,
        sticky: Sticky,
    ) -> Result<(), ToolkitError> {
        let widget = self.widget_mut(handle)?;
        widget.area = Some(area);
        widget.sticky = sticky;
        self.journal.push(ToolkitCall::Place {
            handle,
            area,
            sticky,
        });
        Ok(())
    }

    fn destroy(&mut self, handle: NativeHandle) {
        self.widgets.remove(&handle);
        self.stacking.retain(|h| *h != handle);
        if self.focused == Some(handle) {
            self.focused = None;
        }
        self.journal.push(ToolkitCall::Destroy(handle));
    }

    fn bind_event(&mut self, handle: NativeHandle, kind: EventKind) -> Result<(), ToolkitError> {
        let widget = self.widget_mut(handle)?;
        if !widget.events.contains(&kind) {
            widget.events.push(kind);
        }
        self.journal.push(ToolkitCall::Bind { handle, kind });
        Ok(())
    }

    fn schedule_deferred(&mut self, delay: Duration, token: TaskToken) {
        self.timer_seq += 1;
        self.timers
            .insert((self.now.saturating_add(delay), self.timer_seq), token);
        self.journal.push(ToolkitCall::Schedule { token, delay });
    }

    fn cancel_deferred(&mut self, token: TaskToken) {
        self.timers.retain(|_, t| *t != token);
        self.journal.push(ToolkitCall::Cancel(token));
    }

    fn raise(&mut self, handle: NativeHandle) {
        self.restack(handle, true);
        self.journal.push(ToolkitCall::Raise(handle));
    }

    fn lower(&mut self, handle: NativeHandle) {
        self.restack(handle, false);
        self.journal.push(ToolkitCall::Lower(handle));
    }

    fn set_text(&mut self, handle: NativeHandle, text: &str) -> Result<(), ToolkitError> {
        self.widget_mut(handle)?.text = Some(text.to_owned());
        self.journal.push(ToolkitCall::SetText {
            handle,
            text: text.to_owned(),
        });
        Ok(())
    }

    fn show_value(&mut self, handle: NativeHandle, value: &Value) -> Result<(), ToolkitError> {
        self.widget_mut(handle)?.value = value.clone();
        self.journal.push(ToolkitCall::ShowValue {
            handle,
            value: value.clone(),
        });
        Ok(())
    }

    fn set_choices(&mut self, handle: NativeHandle, choices: &[String]) -> Result<(), ToolkitError> {
        let widget = self.widget_mut(handle)?;
        if !matches!(widget.kind, NativeKind::OptionMenu | NativeKind::Listbox) {
            return Err(ToolkitError::Unsupported {
                kind: widget.kind,
                operation: "set_choices",
            });
        }
        widget.choices = choices.to_vec();
        self.journal.push(ToolkitCall::SetChoices {
            handle,
            choices: choices.to_vec(),
        });
        Ok(())
    }

    fn show_image(&mut self, handle: NativeHandle, image: &RgbImage) -> Result<(), ToolkitError> {
        let widget = self.widget_mut(handle)?;
        if !matches!(widget.kind, NativeKind::Label | NativeKind::Canvas) {
            return Err(ToolkitError::Unsupported {
                kind: widget.kind,
                operation: "show_image",
            });
        }
        let size = image.dimensions();
        widget.image_size = Some(size);
        self.journal.push(ToolkitCall::ShowImage { handle, size });
        Ok(())
    }

    fn set_scroll(&mut self, bar: NativeHandle, first: f32, last: f32) {
        if let Some(widget) = self.widgets.get_mut(&bar) {
            widget.scroll = Some((first, last));
        }
        self.journal.push(ToolkitCall::SetScroll { bar, first, last });
    }

    fn focus(&mut self, handle: NativeHandle) {
        if self.widgets.contains_key(&handle) {
            self.focused = Some(handle);
        }
        self.journal.push(ToolkitCall::Focus(handle));
    }

    fn update(&mut self) {
        self.updates += 1;
        self.journal.push(ToolkitCall::Update);
    }
}

/// Count journal entries per variant name, for compact assertions.
pub fn call_histogram(calls: &[ToolkitCall]) -> HashMap<&'static str, usize> {
    let mut counts = HashMap::new();
    for call in calls {
        let name = match call {
            ToolkitCall::Create { .. } => "create",
            ToolkitCall::Place { .. } => "place",
            ToolkitCall::Destroy(_) => "destroy",
            ToolkitCall::Bind { .. } => "bind",
            ToolkitCall::Schedule { .. } => "schedule",
            ToolkitCall::Cancel(_) => "cancel",
            ToolkitCall::Raise(_) => "raise",
            ToolkitCall::Lower(_) => "lower",
            ToolkitCall::SetText { .. } => "set_text",
            ToolkitCall::ShowValue { .. } => "show_value",
            ToolkitCall::SetChoices { .. } => "set_choices",
            ToolkitCall::ShowImage { .. } => "show_image",
            ToolkitCall::SetScroll { .. } => "set_scroll",
            ToolkitCall::Focus(_) => "focus",
            ToolkitCall::Update => "update",
        };
        *counts.entry(name).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tk: &mut HeadlessToolkit, parent: Option<NativeHandle>) -> NativeHandle {
        tk.create_widget(NativeKind::Frame, parent, &NativeOptions::new())
            .unwrap()
    }

    #[test]
    fn timers_fire_in_due_order() {
        let mut tk = HeadlessToolkit::new();
        tk.schedule_deferred(Duration::from_millis(500), TaskToken::from_raw(1));
        tk.schedule_deferred(Duration::from_millis(100), TaskToken::from_raw(2));
        assert!(tk.advance(Duration::from_millis(99)).is_empty());
        assert_eq!(tk.next_due(), Some(Duration::from_millis(1)));
        assert_eq!(tk.advance(Duration::from_millis(1)), vec![TaskToken::from_raw(2)]);
        assert_eq!(tk.advance(Duration::from_secs(1)), vec![TaskToken::from_raw(1)]);
        assert_eq!(tk.pending_tasks(), 0);
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut tk = HeadlessToolkit::new();
        let token = TaskToken::from_raw(7);
        tk.schedule_deferred(Duration::from_millis(10), token);
        tk.cancel_deferred(token);
        assert!(tk.advance(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn raise_and_lower_reorder_stacking() {
        let mut tk = HeadlessToolkit::new();
        let a = frame(&mut tk, None);
        let b = frame(&mut tk, None);
        assert!(tk.is_above(b, a));
        tk.raise(a);
        assert!(tk.is_above(a, b));
        tk.lower(a);
        assert!(tk.is_above(b, a));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut tk = HeadlessToolkit::new();
        let err = tk
            .create_widget(
                NativeKind::Button,
                Some(NativeHandle::from_raw(99)),
                &NativeOptions::new(),
            )
            .unwrap_err();
        assert_eq!(err, ToolkitError::UnknownHandle(NativeHandle::from_raw(99)));
    }

    #[test]
    fn images_only_on_labels_and_canvases() {
        let mut tk = HeadlessToolkit::new();
        let f = frame(&mut tk, None);
        let err = tk.show_image(f, &RgbImage::new(2, 2)).unwrap_err();
        assert!(matches!(err, ToolkitError::Unsupported { .. }));
    }

    #[test]
    fn histogram_counts_calls() {
        let mut tk = HeadlessToolkit::new();
        let a = frame(&mut tk, None);
        frame(&mut tk, Some(a));
        tk.destroy(a);
        let counts = call_histogram(tk.calls());
        assert_eq!(counts.get("create"), Some(&2));
        assert_eq!(counts.get("destroy"), Some(&1));
    }
}
