//! Drag-and-drop reordering.
//!
//! Cards are drag sources; the list container accepts drops. Dropping
//! on another card moves the dragged item to its position and
//! re-renders.

use crate::dom::{self, Elements};
use crate::item_list;
use crate::state;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wd_item_types::ItemId;
use web_sys::{DragEvent, Element};

/// Attach dragstart/dragend to a rendered card.
pub fn bind_card(card: &Element) {
    {
        let card2 = card.clone();
        let cb = Closure::wrap(Box::new(move |e: DragEvent| {
            let Some(id) = card2.get_attribute("data-id") else {
                return;
            };
            state::set_dragged(ItemId(id));
            dom::add_class(&card2, "dragging");
            if let Some(el) = card2.dyn_ref::<web_sys::HtmlElement>() {
                let _ = el.style().set_property("opacity", "0.5");
            }
            if let Some(dt) = e.data_transfer() {
                dt.set_effect_allowed("move");
            }
        }) as Box<dyn FnMut(_)>);
        card.add_event_listener_with_callback("dragstart", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
    {
        let card2 = card.clone();
        let cb = Closure::wrap(Box::new(move |_: DragEvent| {
            dom::remove_class(&card2, "dragging");
            if let Some(el) = card2.dyn_ref::<web_sys::HtmlElement>() {
                let _ = el.style().remove_property("opacity");
            }
            state::clear_dragged();
        }) as Box<dyn FnMut(_)>);
        card.add_event_listener_with_callback("dragend", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
}

/// Accept drops anywhere in the list container.
pub fn bind_container(els: &Elements) {
    {
        let cb = Closure::wrap(Box::new(move |e: DragEvent| {
            e.prevent_default();
            if let Some(dt) = e.data_transfer() {
                dt.set_drop_effect("move");
            }
        }) as Box<dyn FnMut(_)>);
        els.wishlist_container
            .add_event_listener_with_callback("dragover", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |e: DragEvent| {
            e.prevent_default();
            on_drop(&els2, &e);
        }) as Box<dyn FnMut(_)>);
        els.wishlist_container
            .add_event_listener_with_callback("drop", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
}

fn on_drop(els: &Elements, e: &DragEvent) {
    let Some(dragged) = state::take_dragged() else {
        return;
    };
    let target = e
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.closest(".wishlist-item").ok().flatten())
        .and_then(|card| card.get_attribute("data-id"))
        .map(ItemId);
    let Some(target) = target else {
        return;
    };
    if dragged == target {
        return;
    }

    match state::with_session(|session| session.reorder(&dragged, &target)) {
        Some(Ok(())) => item_list::render(els),
        // A stale card id means the view and the store diverged
        Some(Err(err)) => gloo_console::warn!("reorder ignored:", err.to_string()),
        None => {}
    }
}
