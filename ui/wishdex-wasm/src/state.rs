//! Global application state.
//!
//! Uses `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! Extend `AppState` and the accessor helpers to add new state fields.

use std::cell::RefCell;
use wd_item_types::{FilterCriterion, ItemId};
use wd_wishlist_core::WishlistSession;

use crate::storage::LocalStorageKv;

pub type Session = WishlistSession<LocalStorageKv>;

/// localStorage key for the persisted filter selection.
pub const FILTER_KEY: &str = "wd_filter";

/// Central application state.
#[derive(Default)]
pub struct AppState {
    pub session: Option<Session>,
    pub filter: FilterCriterion,
    pub dragged: Option<ItemId>,
    /// Data URL from the image file picker, if one was chosen.
    pub pending_image: Option<String>,
}

// ── Thread-local singleton ──

thread_local! {
    static STATE: RefCell<AppState> = RefCell::new(AppState::default());
}

/// Run a closure with shared read access to the state.
pub fn with<F, R>(f: F) -> R
where
    F: FnOnce(&AppState) -> R,
{
    STATE.with(|s| f(&s.borrow()))
}

/// Run a closure with mutable access to the state.
pub fn with_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut AppState) -> R,
{
    STATE.with(|s| f(&mut s.borrow_mut()))
}

// ── Convenience accessors ──

pub fn set_session(session: Session) {
    with_mut(|s| s.session = Some(session));
}

/// Run a closure against the wishlist session, if initialised.
pub fn with_session<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut Session) -> R,
{
    with_mut(|s| s.session.as_mut().map(f))
}

pub fn filter() -> FilterCriterion {
    with(|s| s.filter)
}

pub fn set_filter(criterion: FilterCriterion) {
    with_mut(|s| s.filter = criterion);
}

pub fn set_dragged(id: ItemId) {
    with_mut(|s| s.dragged = Some(id));
}

pub fn take_dragged() -> Option<ItemId> {
    with_mut(|s| s.dragged.take())
}

pub fn clear_dragged() {
    with_mut(|s| s.dragged = None);
}

pub fn set_pending_image(data_url: String) {
    with_mut(|s| s.pending_image = Some(data_url));
}

pub fn take_pending_image() -> Option<String> {
    with_mut(|s| s.pending_image.take())
}

pub fn clear_pending_image() {
    with_mut(|s| s.pending_image = None);
}

// ── localStorage helpers (UI preferences, not wishlist data) ──

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

pub fn local_get(key: &str) -> Option<String> {
    storage()?.get_item(key).ok()?
}

pub fn local_set(key: &str, value: &str) {
    if let Some(s) = storage() {
        let _ = s.set_item(key, value);
    }
}
