//! Blob Canvas Component
//!
//! The active board: freely positioned blobs, the add/trash button and the
//! label prompt. Uses leptos-dragdrop with the add button doubling as trash.

use blob_sync::TaskId;
use leptos::prelude::*;
use leptos_dragdrop::*;

use crate::components::{ClearAllButton, LabelPromptView, TaskBlob};
use crate::context::use_app_context;
use crate::store::{store_find_task, AppStateStoreFields, LabelPrompt};

/// Keep a dropped blob inside the visible window
fn clamp_to_canvas(x: f64, y: f64, size: f64, width: f64, height: f64) -> (f64, f64) {
    let max_x = (width - size).max(0.0);
    let max_y = (height - size).max(0.0);
    (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
}

fn window_size() -> (f64, f64) {
    let Some(win) = web_sys::window() else {
        return (f64::MAX, f64::MAX);
    };
    let width = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(f64::MAX);
    let height = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(f64::MAX);
    (width, height)
}

#[component]
pub fn BlobCanvas() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let dnd = create_dnd_signals::<TaskId>();

    bind_global_mouseup(dnd, move |action: DropAction<TaskId>| {
        let sync = ctx.sync();
        match action.target {
            DropTarget::Trash => {
                log::debug!("[DND] Dropped {} on trash", action.key);
                if action.key.is_temporary() && sync.cancel_create(&action.key) {
                    return;
                }
                ctx.run("delete task", sync.delete(&action.key));
            }
            DropTarget::Canvas => {
                let Some(task) = store_find_task(&store, &action.key) else {
                    return;
                };
                let (width, height) = window_size();
                let (x, y) = clamp_to_canvas(task.x + action.dx, task.y + action.dy, task.size, width, height);
                ctx.run("move task", sync.move_task(&action.key, x, y));
            }
        }
    });

    let on_add = move |_| {
        if dnd.just_dragged() {
            return;
        }
        let sync = ctx.sync();
        let config = sync.config();
        let size = config.default_task_size;
        let (width, height) = window_size();
        let (x, y) = clamp_to_canvas(width / 2.0 - size / 2.0, height / 2.0 - size / 2.0, size, width, height);
        match sync.begin_create(&config.new_task_label, x, y, None) {
            Ok(id) => store.prompt().set(Some(LabelPrompt::Create {
                id,
                current: config.new_task_label.clone(),
            })),
            Err(e) => log::warn!("[APP] Cannot add a blob: {}", e),
        }
    };

    let over_trash = move || dnd.drop_target.get() == Some(DropTarget::Trash);
    let dragging = move || dnd.dragging.get().is_some();
    let action_class = move || {
        let mut c = String::from("add-btn");
        if dragging() { c.push_str(" trash"); }
        if over_trash() { c.push_str(" armed"); }
        c
    };

    view! {
        <div class="blob-canvas">
            <For
                each=move || store.tasks().get()
                key=|task| {
                    // Every rendered field, so edits re-render the blob
                    (
                        task.id.clone(),
                        task.label.clone(),
                        task.x.to_bits(),
                        task.y.to_bits(),
                        task.size.to_bits(),
                    )
                }
                children=move |task| view! { <TaskBlob task=task dnd=dnd /> }
            />
        </div>

        <div class="canvas-controls">
            <button
                class=action_class
                title=move || if dragging() { "Delete Task" } else { "Add New Task" }
                on:click=on_add
                on:mouseenter=make_on_trash_mouseenter(dnd)
                on:mouseleave=make_on_trash_mouseleave(dnd)
            >
                {move || if dragging() { "×" } else { "+" }}
            </button>
            <ClearAllButton />
        </div>

        <p class="canvas-hint">
            "Drag the blobs around. Right-click or ✎ to rename. Drag onto the button to delete."
        </p>

        <LabelPromptView />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_is_kept_inside_canvas() {
        assert_eq!(clamp_to_canvas(-20.0, 50.0, 100.0, 800.0, 600.0), (0.0, 50.0));
        assert_eq!(clamp_to_canvas(790.0, 590.0, 100.0, 800.0, 600.0), (700.0, 500.0));
        assert_eq!(clamp_to_canvas(10.0, 10.0, 100.0, 50.0, 50.0), (0.0, 0.0));
    }
}
