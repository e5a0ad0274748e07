//! Blobby Frontend App
//!
//! Board tabs over a full-window canvas, or the sign-in form.

use std::rc::Rc;

use blob_sync::migrate::CONTEXT_KEY;
use blob_sync::{has_local_data, LocalTaskStore};
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::components::{BlobCanvas, BoardTabBar, ErrorToast, MigrationBanner, SignInForm};
use crate::context::{AppContext, BoardSync};
use crate::local_store::{load_session, BrowserLocalStore};
use crate::store::{AppState, AppStateStoreFields};

/// Fetch every board, restore the last selected one and look for legacy data.
pub async fn load_boards(ctx: AppContext, sync: Rc<BoardSync>) {
    // Signed out while loading
    if sync.load().await.is_err() || !ctx.is_current(&sync) {
        return;
    }
    ctx.store.loaded().set(true);
    ctx.store.migration_available().set(has_local_data(&BrowserLocalStore));

    if let Some(name) = BrowserLocalStore.get(CONTEXT_KEY) {
        if let Err(e) = sync.select_board_by_name(&name).await {
            log::debug!("[APP] Last board {} not restored: {}", name, e);
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    let session = load_session();
    let store = Store::new(AppState::new(session.is_none()));
    let ctx = AppContext::new(store);
    provide_context(ctx);

    // Resume the saved session on mount
    if let Some(session) = session {
        let sync = ctx.connect(&session.token);
        spawn_local(load_boards(ctx, sync));
    }

    view! {
        <div class="app-layout">
            <Show
                when=move || !store.signed_out().get()
                fallback=|| view! { <SignInForm /> }
            >
                <BoardTabBar />
                <MigrationBanner />
                <Show
                    when=move || store.loaded().get()
                    fallback=|| view! { <p class="loading">"Loading boards..."</p> }
                >
                    <BlobCanvas />
                </Show>
            </Show>
            <ErrorToast />
        </div>
    }
}
