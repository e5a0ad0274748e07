//! Application Context
//!
//! Shared handles provided via Leptos Context API: the board synchronizer of
//! the signed-in user and the reactive store that mirrors it.

use std::future::Future;
use std::rc::Rc;

use blob_sync::{ClientConfig, HttpTaskRepository, SyncConfig, SyncResult, SyncSnapshot, Synchronizer};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::store::{store_apply_snapshot, AppStateStoreFields, AppStore};

pub type BoardSync = Synchronizer<HttpTaskRepository>;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    sync: StoredValue<Rc<BoardSync>, LocalStorage>,
    pub store: AppStore,
}

impl AppContext {
    /// Start with an anonymous synchronizer; nothing is fetched until
    /// [`connect`](Self::connect).
    pub fn new(store: AppStore) -> Self {
        let anonymous = Rc::new(BoardSync::new(
            HttpTaskRepository::new(client_config(None)),
            SyncConfig::default(),
        ));
        Self {
            sync: StoredValue::new_local(anonymous),
            store,
        }
    }

    /// Current synchronizer
    pub fn sync(&self) -> Rc<BoardSync> {
        self.sync.get_value()
    }

    /// Replace the synchronizer with one acting as `token` and mirror it into the store.
    pub fn connect(&self, token: &str) -> Rc<BoardSync> {
        let sync = Rc::new(BoardSync::new(
            HttpTaskRepository::new(client_config(Some(token))),
            SyncConfig::default(),
        ));
        let store = self.store;
        sync.subscribe(move |snapshot| store_apply_snapshot(&store, snapshot));
        self.sync.set_value(Rc::clone(&sync));
        log::info!("[APP] Connected to {}", sync.repository().config().api_root());
        sync
    }

    /// Drop the signed-in synchronizer and show the sign-in form.
    ///
    /// Its calls still in flight settle into a detached state and never reach
    /// the store again.
    pub fn disconnect(&self) {
        let previous = self.sync();
        previous.unsubscribe();
        previous.reset();
        self.sync.set_value(Rc::new(BoardSync::new(
            HttpTaskRepository::new(client_config(None)),
            SyncConfig::default(),
        )));
        store_apply_snapshot(
            &self.store,
            &SyncSnapshot {
                signed_out: true,
                ..Default::default()
            },
        );
        self.store.loaded().set(false);
        self.store.migration_available().set(false);
        self.store.prompt().set(None);
    }

    /// Whether `sync` still belongs to the signed-in session
    pub fn is_current(&self, sync: &Rc<BoardSync>) -> bool {
        self.sync.with_value(|current| Rc::ptr_eq(current, sync))
    }

    /// Fire and forget a synchronizer operation. Failures already surface as
    /// notices, so the result is only logged.
    pub fn run<T: 'static>(&self, op: &'static str, fut: impl Future<Output = SyncResult<T>> + 'static) {
        spawn_local(async move {
            if let Err(e) = fut.await {
                log::debug!("[APP] {} finished with {}", op, e);
            }
        });
    }
}

/// API root next to the page when served by the store, else the default
fn client_config(token: Option<&str>) -> ClientConfig {
    let origin = web_sys::window().and_then(|w| w.location().origin().ok());
    let config = match origin {
        Some(origin) if origin.starts_with("http") => ClientConfig::new(format!("{}/api", origin)),
        _ => ClientConfig::default(),
    };
    match token {
        Some(token) => config.with_token(token),
        None => config,
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
