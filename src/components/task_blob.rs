//! Task Blob Component
//!
//! One draggable, labeled circle on the canvas.

use blob_sync::{Task, TaskId};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{make_on_mousedown, DndSignals};

use crate::context::use_app_context;
use crate::store::{AppStateStoreFields, LabelPrompt};

/// Characters per line when a single word is too long for the blob
const WORD_CHUNK: usize = 6;

/// Hover icons linger this long after the pointer leaves
const ICON_HIDE_DELAY_MS: u32 = 100;

/// Break a label without spaces into fixed-size chunks, hyphenating every
/// chunk but the last. Labels with spaces wrap naturally and are returned whole.
pub fn split_long_word(text: &str, line_length: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if text.contains(' ') || line_length == 0 || chars.len() <= line_length {
        return vec![text.to_string()];
    }
    let count = chars.chunks(line_length).count();
    chars
        .chunks(line_length)
        .enumerate()
        .map(|(i, chunk)| {
            let mut line: String = chunk.iter().collect();
            if i + 1 < count {
                line.push('-');
            }
            line
        })
        .collect()
}

#[component]
pub fn TaskBlob(task: Task, dnd: DndSignals<TaskId>) -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let id = task.id.clone();
    let label = task.label.clone();
    let (x, y, size) = (task.x, task.y, task.size);
    let pending = task.is_pending();

    // Hover bookkeeping: the blob and both icons share one counter
    let hovered = RwSignal::new(0i32);
    let show_icons = RwSignal::new(false);
    let hide_generation = RwSignal::new(0u32);

    let on_enter = move |_| {
        hovered.update(|n| *n += 1);
        hide_generation.update(|g| *g += 1);
        show_icons.set(true);
    };
    let on_leave = move |_| {
        hovered.update(|n| *n -= 1);
        if hovered.get_untracked() > 0 {
            return;
        }
        hide_generation.update(|g| *g += 1);
        let generation = hide_generation.get_untracked();
        spawn_local(async move {
            TimeoutFuture::new(ICON_HIDE_DELAY_MS).await;
            if hide_generation.get_untracked() == generation {
                show_icons.set(false);
                hovered.set(0);
            }
        });
    };

    let prompt_for = {
        let id = id.clone();
        let label = label.clone();
        move || {
            // A blob still waiting for its first label finishes its create instead
            let prompt = if id.is_temporary() {
                LabelPrompt::Create { id: id.clone(), current: label.clone() }
            } else {
                LabelPrompt::Rename { id: id.clone(), current: label.clone() }
            };
            store.prompt().set(Some(prompt));
        }
    };

    let on_edit = {
        let prompt_for = prompt_for.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            prompt_for();
        }
    };

    let on_context_menu = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        prompt_for();
    };

    let on_delete = {
        let id = id.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            let sync = ctx.sync();
            if id.is_temporary() && sync.cancel_create(&id) {
                return;
            }
            ctx.run("delete task", sync.delete(&id));
        }
    };

    let style = {
        let id = id.clone();
        move || {
            let (dx, dy) = dnd.offset_of(&id);
            format!(
                "left: {}px; top: {}px; width: {}px; height: {}px;",
                x + f64::from(dx),
                y + f64::from(dy),
                size,
                size
            )
        }
    };

    let class = {
        let id = id.clone();
        move || {
            let mut c = String::from("task-blob");
            if pending { c.push_str(" pending"); }
            if dnd.is_dragging(&id) { c.push_str(" dragging"); }
            c
        }
    };

    let icon_class = move |base: &'static str| {
        move || if show_icons.get() { format!("{base} visible") } else { base.to_string() }
    };

    let lines = split_long_word(&label, WORD_CHUNK);
    let last = lines.len().saturating_sub(1);

    view! {
        <div
            class=class
            style=style
            on:mousedown=make_on_mousedown(dnd, id)
            on:mouseenter=on_enter
            on:mouseleave=on_leave
            on:contextmenu=on_context_menu
        >
            <button
                class=icon_class("blob-icon edit")
                title="Rename"
                on:click=on_edit
                on:mouseenter=on_enter
                on:mouseleave=on_leave
            >
                "✎"
            </button>
            <button
                class=icon_class("blob-icon delete")
                title="Delete"
                on:click=on_delete
                on:mouseenter=on_enter
                on:mouseleave=on_leave
            >
                "×"
            </button>
            <span class="blob-label">
                {lines
                    .into_iter()
                    .enumerate()
                    .map(|(i, line)| view! { {line} {(i < last).then(|| view! { <br /> })} })
                    .collect_view()}
            </span>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_word_is_hyphenated_in_chunks() {
        assert_eq!(split_long_word("Refactoring", 6), vec!["Refact-", "oring"]);
        assert_eq!(split_long_word("abcdefghijkl", 6), vec!["abcdef-", "ghijkl"]);
    }

    #[test]
    fn test_short_or_spaced_labels_are_untouched() {
        assert_eq!(split_long_word("Ship it", 6), vec!["Ship it"]);
        assert_eq!(split_long_word("Short", 6), vec!["Short"]);
        assert_eq!(split_long_word("", 6), vec![""]);
    }
}
