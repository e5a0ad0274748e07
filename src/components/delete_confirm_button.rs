//! Delete Confirm Button Component
//!
//! Inline destructive button with confirm/cancel actions.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::store::AppStateStoreFields;

/// Inline delete confirmation button
///
/// Shows `label` initially. When clicked, shows `question` with ✓/✗ buttons.
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] button_class: String,
    #[prop(into)] label: String,
    #[prop(into)] question: String,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let (confirming, set_confirming) = signal(false);

    view! {
        <Show when=move || !confirming.get()>
            <button
                class=button_class.clone()
                on:click=move |ev| {
                    ev.stop_propagation();
                    set_confirming.set(true);
                }
            >
                {label.clone()}
            </button>
        </Show>
        <Show when=move || confirming.get()>
            <span class="delete-confirm">
                <span class="delete-confirm-text">{question.clone()}</span>
                <button
                    class="confirm-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_confirming.set(false);
                        on_confirm.run(());
                    }
                >
                    "✓"
                </button>
                <button
                    class="cancel-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_confirming.set(false);
                    }
                >
                    "✗"
                </button>
            </span>
        </Show>
    }
}

/// Empties the active board after confirmation
#[component]
pub fn ClearAllButton() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    view! {
        <Show when=move || !store.tasks().read().is_empty()>
            <DeleteConfirmButton
                button_class="clear-all-btn"
                label="Clear all"
                question="Remove every blob?"
                on_confirm=move |_| {
                    let sync = ctx.sync();
                    ctx.run("clear board", sync.clear_all());
                }
            />
        </Show>
    }
}
