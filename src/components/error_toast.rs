//! Error Toast Component

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::store::AppStateStoreFields;

/// Latest failure, until dismissed or replaced
#[component]
pub fn ErrorToast() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    move || {
        store.notice().get().map(|notice| {
            view! {
                <div class="error-toast" role="alert">
                    <span class="error-toast-text">{notice.message}</span>
                    <button class="error-toast-close" on:click=move |_| ctx.sync().dismiss_notice()>
                        "×"
                    </button>
                </div>
            }
        })
    }
}
