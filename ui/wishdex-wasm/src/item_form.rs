//! Add-item modal.
//!
//! Gathers the `NewItem` payload from the form. A chosen local image
//! file (read as a data URL) wins over the URL field. The store
//! re-validates; rejections are surfaced with an alert and leave the
//! wishlist untouched.

use crate::dom::{self, Elements};
use crate::item_list;
use crate::state;
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wd_item_types::{ItemKind, NewItem};

const REQUIRED_FIELDS_MSG: &str = "Please fill in all required fields (Name, Type, Rarity)";

pub fn show(els: &Elements) {
    dom::add_class(&els.add_modal, "show");

    // Focus the name field once the modal is visible
    let input = els.name_input.clone();
    Timeout::new(100, move || {
        let _ = input.focus();
    })
    .forget();
}

pub fn hide(els: &Elements) {
    dom::remove_class(&els.add_modal, "show");
    state::clear_pending_image();
}

pub fn on_submit(els: &Elements) {
    let Some(kind) = ItemKind::parse(&dom::get_select_value(&els.type_select)) else {
        dom::alert(REQUIRED_FIELDS_MSG);
        return;
    };
    let rarity: u8 = dom::get_select_value(&els.rarity_select).parse().unwrap_or(0);
    let image_url =
        state::take_pending_image().unwrap_or_else(|| dom::get_input_value(&els.image_url_input));

    let new = NewItem {
        name: dom::get_input_value(&els.name_input),
        kind,
        rarity,
        image_url,
        notes: dom::get_textarea_value(&els.notes_input),
    };

    match state::with_session(|session| session.add(new)) {
        Some(Ok(_)) => {
            hide(els);
            els.add_form.reset();
            item_list::render(els);
        }
        Some(Err(_)) => dom::alert(REQUIRED_FIELDS_MSG),
        None => {}
    }
}

/// Read the chosen image file into a data URL, stashing it for the next
/// submit. Clearing the picker clears the stash.
pub fn on_image_file_chosen(els: &Elements) {
    let Some(file) = els.image_file_input.files().and_then(|files| files.get(0)) else {
        state::clear_pending_image();
        return;
    };

    let Ok(reader) = web_sys::FileReader::new() else {
        return;
    };
    let reader2 = reader.clone();
    let onload = Closure::wrap(Box::new(move |_: web_sys::Event| {
        if let Some(data_url) = reader2.result().ok().and_then(|v| v.as_string()) {
            state::set_pending_image(data_url);
        }
    }) as Box<dyn FnMut(_)>);
    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();

    if let Err(err) = reader.read_as_data_url(&file) {
        gloo_console::error!("could not read image file", format!("{err:?}"));
    }
}
