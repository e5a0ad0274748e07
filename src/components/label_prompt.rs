//! Label Prompt Component
//!
//! Overlay form used both to rename a blob and to name a new one.

use leptos::html::Input;
use leptos::prelude::*;

use crate::context::use_app_context;
use crate::store::{AppStateStoreFields, LabelPrompt};

#[component]
pub fn LabelPromptView() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;
    let (text, set_text) = signal(String::new());
    let input_ref = NodeRef::<Input>::new();

    // Refill the input whenever a new prompt opens
    Effect::new(move |_| {
        if let Some(prompt) = store.prompt().get() {
            set_text.set(prompt.current().to_string());
            if let Some(input) = input_ref.get() {
                let _ = input.focus();
                input.select();
            }
        }
    });

    let cancel = move || {
        let Some(prompt) = store.prompt().get_untracked() else {
            return;
        };
        store.prompt().set(None);
        if let LabelPrompt::Create { id, .. } = prompt {
            ctx.sync().cancel_create(&id);
        }
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(prompt) = store.prompt().get_untracked() else {
            return;
        };
        let entered = text.get_untracked().trim().to_string();
        store.prompt().set(None);

        let sync = ctx.sync();
        match prompt {
            LabelPrompt::Create { id, current } => {
                let label = if entered.is_empty() { current } else { entered };
                ctx.run("create task", sync.confirm_create(&id, &label));
            }
            LabelPrompt::Rename { id, current } => {
                if entered.is_empty() || entered == current {
                    return;
                }
                ctx.run("rename task", sync.rename(&id, &entered));
            }
        }
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" {
            cancel();
        }
    };

    let is_create = move || matches!(store.prompt().get(), Some(LabelPrompt::Create { .. }));

    view! {
        <Show when=move || store.prompt().get().is_some()>
            <div class="label-prompt-backdrop">
                <form class="label-prompt" on:submit=submit>
                    <input
                        type="text"
                        node_ref=input_ref
                        placeholder="Task name"
                        prop:value=move || text.get()
                        on:input=move |ev| set_text.set(event_target_value(&ev))
                        on:keydown=on_keydown
                    />
                    <div class="label-prompt-actions">
                        <button type="submit">{move || if is_create() { "Create" } else { "Rename" }}</button>
                        <button type="button" on:click=move |_| cancel()>"Cancel"</button>
                    </div>
                </form>
            </div>
        </Show>
    }
}
