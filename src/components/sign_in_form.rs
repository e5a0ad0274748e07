//! Sign In Form Component
//!
//! Shown while there is no usable identity. Registers (or updates) the user
//! record, which also seeds the default boards, then loads them.

use blob_sync::TaskRepository;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::app::load_boards;
use crate::context::use_app_context;
use crate::local_store::{save_session, Session};

#[component]
pub fn SignInForm() -> impl IntoView {
    let ctx = use_app_context();
    let (token, set_token) = signal(String::new());
    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (error, set_error) = signal(None::<String>);
    let (busy, set_busy) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let session = Session {
            token: token.get().trim().to_string(),
            username: username.get().trim().to_string(),
            email: email.get().trim().to_string(),
        };
        if session.token.is_empty() {
            set_error.set(Some("A user id is required".to_string()));
            return;
        }

        set_busy.set(true);
        set_error.set(None);
        spawn_local(async move {
            let sync = ctx.connect(&session.token);
            match sync.repository().ensure_user(&session.username, &session.email).await {
                Ok(user) => {
                    log::info!("[APP] Signed in as {} with {} boards", user.id, user.boards.len());
                    save_session(&session);
                    load_boards(ctx, sync).await;
                }
                Err(e) => {
                    log::warn!("[APP] Sign in failed: {}", e);
                    set_error.set(Some(e.to_string()));
                }
            }
            set_busy.set(false);
        });
    };

    view! {
        <form class="sign-in-form" on:submit=on_submit>
            <h1>"Blobby"</h1>
            <input
                type="text"
                placeholder="User id"
                prop:value=move || token.get()
                on:input=move |ev| set_token.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Username"
                prop:value=move || username.get()
                on:input=move |ev| set_username.set(event_target_value(&ev))
            />
            <input
                type="email"
                placeholder="Email"
                prop:value=move || email.get()
                on:input=move |ev| set_email.set(event_target_value(&ev))
            />
            <button type="submit" disabled=move || busy.get()>"Sign in"</button>
            {move || error.get().map(|e| view! { <p class="sign-in-error">{e}</p> })}
        </form>
    }
}
