//! Wishlist rendering.
//!
//! Renders item cards for the active filter and wires their obtained /
//! delete / drag interactions. Mirrors the JS `renderWishlist()`.

use crate::dnd;
use crate::dom::{self, Elements};
use crate::item_form;
use crate::state;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wd_item_types::{FilterCriterion, ItemId, ItemKind, WishlistItem};

/// Re-render the list container from the store.
pub fn render(els: &Elements) {
    let container = &els.wishlist_container;
    dom::set_inner_html(container, "");

    let criterion = state::filter();
    let items: Vec<WishlistItem> =
        state::with_session(|session| session.filter(criterion).cloned().collect())
            .unwrap_or_default();

    if items.is_empty() {
        render_empty_state(els, criterion);
        return;
    }

    for item in &items {
        let card = build_card(item);
        container.append_child(&card).unwrap();
    }

    wire_card_events(els);
}

fn build_card(item: &WishlistItem) -> web_sys::Element {
    let card = dom::create_element("div");
    let mut cls = "wishlist-item".to_string();
    if item.obtained {
        cls.push_str(" obtained");
    }
    card.set_attribute("class", &cls).unwrap();
    card.set_attribute("draggable", "true").unwrap();
    card.set_attribute("data-id", item.id.as_str()).unwrap();

    let stars = "★".repeat(item.rarity as usize);
    let type_icon = match item.kind {
        ItemKind::Character => "👤",
        ItemKind::Weapon => "⚔️",
    };

    let image_html = if item.image_url.is_empty() {
        format!(r#"<div class="item-image item-image--fallback">{type_icon}</div>"#)
    } else {
        format!(
            r#"<img src="{}" alt="{}" class="item-image" onerror="this.style.display='none'" />"#,
            item.image_url, item.name
        )
    };
    let notes_html = if item.notes.is_empty() {
        "No notes added"
    } else {
        item.notes.as_str()
    };
    let name_cls = if item.obtained {
        "item-name obtained"
    } else {
        "item-name"
    };
    let checked = if item.obtained { "checked" } else { "" };

    let html = format!(
        r#"
        <div class="drag-handle">⋮⋮</div>
        {image_html}
        <div class="item-content">
          <h3 class="{name_cls}">{name}</h3>
          <div class="item-meta">
            <span class="item-type">{type_icon} {kind}</span>
            <div class="item-rarity">{stars}</div>
          </div>
          <p class="item-notes">{notes_html}</p>
          <div class="item-actions">
            <label class="checkbox-label">
              <input type="checkbox" class="item-obtained" data-id="{id}" {checked} />
              Obtained
            </label>
            <button class="btn-delete" data-id="{id}" title="Delete item">🗑️</button>
          </div>
        </div>
        "#,
        name = item.name,
        kind = item.kind.as_str(),
        id = item.id,
    );
    dom::set_inner_html(&card, &html);

    card
}

fn render_empty_state(els: &Elements, criterion: FilterCriterion) {
    let all = criterion == FilterCriterion::All;
    let (title, hint) = if all {
        (
            "Your wishlist is empty",
            "Add your first character or weapon to get started!",
        )
    } else {
        (
            "No items in this category",
            "Try selecting a different filter or add new items.",
        )
    };
    let button = if all {
        r#"<button class="btn-primary" id="emptyAddButton">Add your first item</button>"#
    } else {
        ""
    };
    let html = format!(
        r#"
        <div class="empty-state">
          <h3>{title}</h3>
          <p>{hint}</p>
          {button}
        </div>
        "#
    );
    dom::set_inner_html(&els.wishlist_container, &html);

    if let Some(btn) = dom::by_id("emptyAddButton") {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            item_form::show(&els2);
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
}

/// Wire events on dynamically-created card controls.
fn wire_card_events(els: &Elements) {
    let container = &els.wishlist_container;

    // Obtained checkboxes
    for checkbox in dom::query_all_within(container, ".item-obtained") {
        let id = ItemId(checkbox.get_attribute("data-id").unwrap_or_default());
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |e: web_sys::Event| {
            let checked = e
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
                .map(|input| input.checked())
                .unwrap_or(false);
            let _ = state::with_session(|session| session.set_obtained(&id, checked));
            render(&els2);
        }) as Box<dyn FnMut(_)>);
        checkbox
            .add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    // Delete buttons (confirm first, naming the item as the original did)
    for btn in dom::query_all_within(container, ".btn-delete") {
        let id = ItemId(btn.get_attribute("data-id").unwrap_or_default());
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let name = state::with_session(|session| {
                session.wishlist().get(&id).map(|item| item.name.clone())
            })
            .flatten()
            .unwrap_or_else(|| "this item".to_owned());
            if dom::confirm(&format!(
                "Are you sure you want to delete \"{name}\" from your wishlist?"
            )) {
                let _ = state::with_session(|session| session.remove(&id));
                render(&els2);
            }
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    // Drag sources
    for card in dom::query_all_within(container, ".wishlist-item") {
        dnd::bind_card(&card);
    }
}
