//! Migration Banner Component
//!
//! Offers to move blobs saved by older, storage-only builds into the store.

use blob_sync::migrate_local_tasks;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;
use crate::local_store::BrowserLocalStore;
use crate::store::AppStateStoreFields;

#[component]
pub fn MigrationBanner() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;
    let (busy, set_busy) = signal(false);
    let (result, set_result) = signal(None::<String>);

    let on_import = move |_| {
        set_busy.set(true);
        let sync = ctx.sync();
        spawn_local(async move {
            match migrate_local_tasks(sync.repository(), &BrowserLocalStore).await {
                Ok(report) => {
                    log::info!("[MIGRATE] {} migrated, {} failed", report.migrated, report.failed);
                    let message = if report.failed == 0 {
                        format!("Imported {} blobs", report.migrated)
                    } else {
                        format!("Imported {} blobs, {} could not be saved", report.migrated, report.failed)
                    };
                    set_result.set(Some(message));
                    if report.migrated > 0 {
                        store.migration_available().set(false);
                        let _ = sync.load().await;
                    }
                }
                Err(e) => {
                    log::warn!("[MIGRATE] Aborted: {}", e);
                    set_result.set(Some(e.to_string()));
                }
            }
            set_busy.set(false);
        });
    };

    view! {
        <Show when=move || store.migration_available().get() || result.get().is_some()>
            <div class="migration-banner">
                {move || match result.get() {
                    Some(message) => view! {
                        <span>{message}</span>
                        <button on:click=move |_| set_result.set(None)>"×"</button>
                    }.into_any(),
                    None => view! {
                        <span>"Blobs saved in this browser can be moved to your account."</span>
                        <button disabled=move || busy.get() on:click=on_import>"Import"</button>
                        <button on:click=move |_| store.migration_available().set(false)>"Later"</button>
                    }.into_any(),
                }}
            </div>
        </Show>
    }
}
