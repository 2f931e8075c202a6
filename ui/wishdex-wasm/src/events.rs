//! Event binding.
//!
//! Wires all UI event listeners. Mirrors the JS `setupEventListeners()`.
//! To add new events, add closures here and wire them to the elements.

use crate::dnd;
use crate::dom::{self, Elements};
use crate::item_form;
use crate::item_list;
use crate::state;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wd_item_types::FilterCriterion;

/// Helper: attach sync click handler.
macro_rules! on_click {
    ($el:expr, $cb:expr) => {{
        let cb = Closure::wrap(Box::new($cb) as Box<dyn FnMut(web_sys::MouseEvent)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) {
    // ── Filter bar ──
    for btn in &els.filter_buttons {
        let btn2 = btn.clone();
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let criterion = btn2
                .get_attribute("data-filter")
                .as_deref()
                .and_then(FilterCriterion::from_key);
            if let Some(criterion) = criterion {
                set_active_filter(&els2, criterion);
            }
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    // ── Add modal ──
    {
        let els2 = els.clone();
        on_click!(els.add_button, move |_: web_sys::MouseEvent| {
            item_form::show(&els2);
        });
    }
    {
        let els2 = els.clone();
        on_click!(els.cancel_button, move |_: web_sys::MouseEvent| {
            item_form::hide(&els2);
        });
    }

    // Close when clicking the backdrop, not the dialog
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
            let target = e.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok());
            if target.is_some_and(|el| el.id() == "addModal") {
                item_form::hide(&els2);
            }
        }) as Box<dyn FnMut(_)>);
        els.add_modal
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    // ── Form submission ──
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |e: web_sys::Event| {
            e.prevent_default();
            item_form::on_submit(&els2);
        }) as Box<dyn FnMut(_)>);
        els.add_form
            .add_event_listener_with_callback("submit", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    // ── Local image file → data URL ──
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            item_form::on_image_file_chosen(&els2);
        }) as Box<dyn FnMut(_)>);
        els.image_file_input
            .add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    // ── Escape closes the modal ──
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |e: web_sys::KeyboardEvent| {
            if e.key() == "Escape" {
                item_form::hide(&els2);
            }
        }) as Box<dyn FnMut(_)>);
        dom::document()
            .add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    // ── Drag and drop (the container accepts drops) ──
    dnd::bind_container(els);
}

/// Switch the active filter: highlight its button, persist the choice,
/// re-render the list.
pub fn set_active_filter(els: &Elements, criterion: FilterCriterion) {
    for btn in &els.filter_buttons {
        let is_active = btn.get_attribute("data-filter").as_deref() == Some(criterion.key());
        dom::toggle_class(btn, "active", is_active);
    }
    state::set_filter(criterion);
    state::local_set(state::FILTER_KEY, criterion.key());
    item_list::render(els);
}
