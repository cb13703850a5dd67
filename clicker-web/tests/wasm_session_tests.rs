#![cfg(target_arch = "wasm32")]

use clicker_core::{ClientConfig, PersistedSession, SessionStorage};
use clicker_web::app::state::build_store;
use clicker_web::storage::LocalSessionStorage;
use serde_json::json;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const KEY: &str = "clicker.session.test";

#[wasm_bindgen_test]
fn local_storage_round_trips_session() {
    let storage = LocalSessionStorage;
    storage.clear_session(KEY).unwrap();
    assert_eq!(storage.load_session(KEY).unwrap(), None);

    let session = PersistedSession {
        balance: 42,
        click_count: 3,
        pending_clicks: 3,
        ..PersistedSession::default()
    };
    storage.save_session(KEY, &session).unwrap();
    assert_eq!(storage.load_session(KEY).unwrap(), Some(session));

    storage.clear_session(KEY).unwrap();
    assert_eq!(storage.load_session(KEY).unwrap(), None);
}

#[wasm_bindgen_test]
fn clicks_survive_a_store_rebuild() {
    let config = ClientConfig {
        storage_key: KEY.into(),
        ..ClientConfig::default()
    };
    LocalSessionStorage.clear_session(KEY).unwrap();

    let store = build_store(&config);
    store.set_user(&json!({"id": "wasm-user"})).unwrap();
    store.record_click();
    store.record_click();

    let reloaded = build_store(&config);
    assert!(reloaded.hydrate().unwrap());
    assert_eq!(reloaded.pending_clicks(), 2);
    assert_eq!(reloaded.user_id().as_deref(), Some("wasm-user"));

    LocalSessionStorage.clear_session(KEY).unwrap();
}

#[wasm_bindgen_test]
fn page_starts_visible() {
    assert!(!clicker_web::dom::page_hidden());
}
