//! DOM element bindings.
//!
//! Mirrors the JS element lookups. All fields are resolved once at startup.
//! To add new UI elements, add a field here and bind it in `Elements::bind()`.

use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

// ── Helpers ──

fn doc() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let nl = doc().query_selector_all(selector).unwrap();
    let mut v = Vec::new();
    for i in 0..nl.length() {
        if let Some(e) = nl.item(i) {
            if let Ok(el) = e.dyn_into::<Element>() {
                v.push(el);
            }
        }
    }
    v
}

/// Query all matching elements within a parent element.
pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    let nl = parent.query_selector_all(selector).unwrap();
    let mut v = Vec::new();
    for i in 0..nl.length() {
        if let Some(e) = nl.item(i) {
            if let Ok(el) = e.dyn_into::<Element>() {
                v.push(el);
            }
        }
    }
    v
}

pub fn set_inner_html(el: &Element, html: &str) {
    el.set_inner_html(html);
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value().trim().to_string()
}

pub fn get_select_value(el: &HtmlSelectElement) -> String {
    el.value()
}

pub fn get_textarea_value(el: &HtmlTextAreaElement) -> String {
    el.value().trim().to_string()
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn create_element(tag: &str) -> Element {
    doc().create_element(tag).unwrap()
}

pub fn document() -> Document {
    doc()
}

pub fn window() -> web_sys::Window {
    web_sys::window().unwrap()
}

pub fn alert(msg: &str) {
    let _ = window().alert_with_message(msg);
}

pub fn confirm(msg: &str) -> bool {
    window().confirm_with_message(msg).unwrap_or(false)
}

// ── Elements struct ──

/// All DOM element references used by the wishlist UI.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // List
    pub wishlist_container: Element,

    // Filter bar
    pub filter_buttons: Vec<Element>,

    // Add modal
    pub add_button: HtmlElement,
    pub add_modal: Element,
    pub add_form: HtmlFormElement,
    pub cancel_button: HtmlElement,
    pub name_input: HtmlInputElement,
    pub type_select: HtmlSelectElement,
    pub rarity_select: HtmlSelectElement,
    pub image_url_input: HtmlInputElement,
    pub image_file_input: HtmlInputElement,
    pub notes_input: HtmlTextAreaElement,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_select {
    ($id:expr) => {
        by_id_typed::<HtmlSelectElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing select #{}", $id)))?
    };
}

macro_rules! get_textarea {
    ($id:expr) => {
        by_id_typed::<HtmlTextAreaElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing textarea #{}", $id)))?
    };
}

macro_rules! get_form {
    ($id:expr) => {
        by_id_typed::<HtmlFormElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing form #{}", $id)))?
    };
}

macro_rules! get_html {
    ($id:expr) => {
        by_id_typed::<HtmlElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing html element #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            wishlist_container: get_el!("wishlistContainer"),

            filter_buttons: query_all(".btn-filter"),

            add_button: get_html!("addButton"),
            add_modal: get_el!("addModal"),
            add_form: get_form!("addForm"),
            cancel_button: get_html!("cancelButton"),
            name_input: get_input!("itemName"),
            type_select: get_select!("itemType"),
            rarity_select: get_select!("itemRarity"),
            image_url_input: get_input!("itemImageUrl"),
            image_file_input: get_input!("itemImageFile"),
            notes_input: get_textarea!("itemNotes"),
        })
    }
}
