//! Leptos DragDrop Utilities
//!
//! Free-position drag-and-drop for Leptos using mouse events.
//! Uses movement threshold to distinguish click from drag.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Where a dragged item was released
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropTarget {
    /// Anywhere on the canvas; the item moves
    Canvas,
    /// The trash zone; the item is removed
    Trash,
}

/// A finished drag: which item, where, and how far it travelled
#[derive(Clone, Debug, PartialEq)]
pub struct DropAction<K> {
    pub key: K,
    pub target: DropTarget,
    pub dx: f64,
    pub dy: f64,
}

/// DnD state signals
pub struct DndSignals<K: Send + Sync + 'static> {
    pub dragging: RwSignal<Option<K>>,
    pub drop_target: RwSignal<Option<DropTarget>>,
    pub drag_just_ended: RwSignal<bool>,
    /// Pending key (mousedown but not yet dragging)
    pub pending: RwSignal<Option<K>>,
    /// Pointer position at mousedown
    pub start: RwSignal<(i32, i32)>,
    /// Pointer travel since mousedown, while dragging
    pub offset: RwSignal<(i32, i32)>,
}

impl<K: Send + Sync + 'static> Clone for DndSignals<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: Send + Sync + 'static> Copy for DndSignals<K> {}

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// Whether pointer travel is far enough to count as a drag
pub fn exceeds_threshold(dx: i32, dy: i32) -> bool {
    dx.abs() > DRAG_THRESHOLD_PX || dy.abs() > DRAG_THRESHOLD_PX
}

pub fn create_dnd_signals<K>() -> DndSignals<K>
where
    K: Clone + PartialEq + Send + Sync + 'static,
{
    DndSignals {
        dragging: RwSignal::new(None),
        drop_target: RwSignal::new(None),
        drag_just_ended: RwSignal::new(false),
        pending: RwSignal::new(None),
        start: RwSignal::new((0, 0)),
        offset: RwSignal::new((0, 0)),
    }
}

impl<K> DndSignals<K>
where
    K: Clone + PartialEq + Send + Sync + 'static,
{
    /// Key being dragged (tracked)
    pub fn is_dragging(&self, key: &K) -> bool {
        self.dragging.with(|d| d.as_ref() == Some(key))
    }

    /// Visual offset for `key`, zero unless it is the one being dragged
    pub fn offset_of(&self, key: &K) -> (i32, i32) {
        if self.is_dragging(key) {
            self.offset.get()
        } else {
            (0, 0)
        }
    }

    /// True for a short moment after a drag so the trailing click can be ignored
    pub fn just_dragged(&self) -> bool {
        self.drag_just_ended.get_untracked()
    }
}

/// End drag operation
pub fn end_drag<K>(dnd: &DndSignals<K>)
where
    K: Clone + PartialEq + Send + Sync + 'static,
{
    let was_dragging = dnd.dragging.get_untracked().is_some();
    dnd.dragging.set(None);
    dnd.drop_target.set(None);
    dnd.pending.set(None);
    dnd.offset.set((0, 0));
    if !was_dragging {
        return;
    }

    dnd.drag_just_ended.set(true);
    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Create mousedown handler for draggable items
/// Records pending drag with start position
pub fn make_on_mousedown<K>(dnd: DndSignals<K>, key: K) -> impl Fn(web_sys::MouseEvent) + Clone + 'static
where
    K: Clone + PartialEq + Send + Sync + 'static,
{
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Inputs and buttons inside an item keep their own behaviour
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
        }
        ev.prevent_default();
        dnd.pending.set(Some(key.clone()));
        dnd.start.set((ev.client_x(), ev.client_y()));
    }
}

/// Create mouseenter handler for the trash zone
pub fn make_on_trash_mouseenter<K>(dnd: DndSignals<K>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    K: Clone + PartialEq + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging.get_untracked().is_some() {
            dnd.drop_target.set(Some(DropTarget::Trash));
        }
    }
}

/// Create mouseleave handler for the trash zone
pub fn make_on_trash_mouseleave<K>(dnd: DndSignals<K>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    K: Clone + PartialEq + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging.get_untracked().is_some() {
            dnd.drop_target.set(Some(DropTarget::Canvas));
        }
    }
}

/// Document mousemove: starts a drag past the threshold, then tracks the offset
fn bind_global_mousemove<K>(dnd: DndSignals<K>)
where
    K: Clone + PartialEq + Send + Sync + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        // Listeners outlive the view that bound them
        let Some(Some(pending)) = dnd.pending.try_get_untracked() else {
            return;
        };
        let (start_x, start_y) = dnd.start.get_untracked();
        let delta = (ev.client_x() - start_x, ev.client_y() - start_y);

        if dnd.dragging.get_untracked().is_none() {
            if !exceeds_threshold(delta.0, delta.1) {
                return;
            }
            dnd.dragging.set(Some(pending));
            dnd.drop_target.set(Some(DropTarget::Canvas));
        }
        dnd.offset.set(delta);
    });

    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
    }
    on_mousemove.forget();
}

/// Bind global mouseup handler for drop detection
pub fn bind_global_mouseup<K, F>(dnd: DndSignals<K>, on_drop: F)
where
    K: Clone + PartialEq + Send + Sync + 'static,
    F: Fn(DropAction<K>) + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let Some(dragging) = dnd.dragging.try_get_untracked() else {
            return;
        };
        let target = dnd.drop_target.get_untracked();
        let (start_x, start_y) = dnd.start.get_untracked();

        end_drag(&dnd);

        // A plain click falls through to the element's own handler
        if let (Some(key), Some(target)) = (dragging, target) {
            on_drop(DropAction {
                key,
                target,
                dx: f64::from(ev.client_x() - start_x),
                dy: f64::from(ev.client_y() - start_y),
            });
        }
    });

    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
    }
    on_mouseup.forget();

    bind_global_mousemove(dnd);
}
