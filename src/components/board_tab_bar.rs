//! Board Tab Bar Component
//!
//! Tab bar for switching between boards, adding one, and signing out.

use blob_sync::migrate::CONTEXT_KEY;
use blob_sync::LocalTaskStore;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;
use crate::local_store::{clear_session, BrowserLocalStore};
use crate::store::AppStateStoreFields;

#[component]
pub fn BoardTabBar() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;
    let (adding, set_adding) = signal(false);
    let (new_name, set_new_name) = signal(String::new());

    let on_add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = new_name.get().trim().to_string();
        if name.is_empty() { return; }

        let sync = ctx.sync();
        spawn_local(async move {
            if let Ok(board) = sync.create_board(&name).await {
                let _ = sync.switch_board(&board.id).await;
            }
        });

        set_new_name.set(String::new());
        set_adding.set(false);
    };

    view! {
        <div class="board-tab-bar">
            <For
                each=move || store.boards().get()
                key=|board| board.id.clone()
                children=move |board| {
                    let id = board.id.clone();
                    let name = board.name.clone();
                    let is_active = {
                        let id = id.clone();
                        move || store.active_board().get().as_deref() == Some(id.as_str())
                    };
                    let tab_class = move || if is_active() { "board-tab active" } else { "board-tab" };

                    view! {
                        <button
                            class=tab_class
                            on:click=move |_| {
                                BrowserLocalStore.set(CONTEXT_KEY, &name);
                                ctx.run("switch board", ctx.sync().switch_board(&id));
                            }
                        >
                            {board.name}
                        </button>
                    }
                }
            />

            {move || if adding.get() {
                view! {
                    <form class="board-add-form" on:submit=on_add>
                        <input
                            type="text"
                            placeholder="Board name"
                            prop:value=move || new_name.get()
                            on:input=move |ev| set_new_name.set(event_target_value(&ev))
                        />
                        <button type="submit">"+"</button>
                        <button type="button" on:click=move |_| set_adding.set(false)>"×"</button>
                    </form>
                }.into_any()
            } else {
                view! {
                    <button class="board-add-btn" on:click=move |_| set_adding.set(true)>
                        "+"
                    </button>
                }.into_any()
            }}

            <button
                class="sign-out-btn"
                on:click=move |_| {
                    clear_session();
                    ctx.disconnect();
                }
            >
                "Sign out"
            </button>
        </div>
    }
}
