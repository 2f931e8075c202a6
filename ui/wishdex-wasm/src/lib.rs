//! Wishdex WASM Frontend
//!
//! Pure Rust + WASM implementation replicating the JavaScript wishlist UI.
//! Modularised for extensibility: each concern lives in its own module.

pub mod dnd;
pub mod dom;
pub mod events;
pub mod item_form;
pub mod item_list;
pub mod state;
pub mod storage;

use wasm_bindgen::prelude::*;
use wd_item_types::{FilterCriterion, ItemKind, NewItem};
use wd_wishlist_core::WishlistSession;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init()
}

/// Main initialisation sequence (mirrors JS `initializeApp()`).
fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    // Open the session over localStorage; absent or unreadable data
    // seeds the starter wishlist.
    let session = WishlistSession::open(storage::LocalStorageKv::bind());
    state::set_session(session);

    // Restore the persisted filter selection and render
    let saved = state::local_get(state::FILTER_KEY)
        .and_then(|key| FilterCriterion::from_key(&key))
        .unwrap_or_default();
    events::set_active_filter(&els, saved);

    // Bind all event listeners
    events::bind_events(&els);

    gloo_console::log!("wishdex initialized");
    Ok(())
}

/// Console helper mirroring the original `addSampleCharacter()`:
/// `wasm.add_sample_item("Furina", "character", 5, "hydro archon")`.
#[wasm_bindgen]
pub fn add_sample_item(name: String, kind: Option<String>, rarity: Option<u8>, notes: Option<String>) {
    let Ok(els) = dom::Elements::bind() else {
        return;
    };

    let new = NewItem {
        name,
        kind: kind
            .as_deref()
            .and_then(ItemKind::parse)
            .unwrap_or(ItemKind::Character),
        rarity: rarity.unwrap_or(5),
        image_url: "https://images.unsplash.com/photo-1578662996442-48f60103fc96?w=300&h=300&fit=crop"
            .to_owned(),
        notes: notes.unwrap_or_default(),
    };

    match state::with_session(|session| session.add(new)) {
        Some(Ok(id)) => {
            gloo_console::log!("added sample item", id.to_string());
            item_list::render(&els);
        }
        Some(Err(err)) => gloo_console::warn!("sample item rejected:", err.to_string()),
        None => gloo_console::warn!("wishdex not initialized"),
    }
}
