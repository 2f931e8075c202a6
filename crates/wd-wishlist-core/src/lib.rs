use thiserror::Error;
use tracing::warn;
use wd_item_types::{FilterCriterion, ItemId, ItemKind, NewItem, WishlistItem};
use wd_storage::KvStore;

/// Storage slot holding the JSON-encoded collection. Same key the
/// original application wrote, so existing saved data loads unchanged.
pub const STORAGE_KEY: &str = "wishlistItems";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WishlistError {
    #[error("item name is required")]
    EmptyName,
    #[error("rarity must be 4 or 5, got {0}")]
    InvalidRarity(u8),
    #[error("unknown item id {0}")]
    UnknownItem(ItemId),
}

/// Ordered collection with dense 1-based priorities.
///
/// Invariant: iterating `items` in sequence order is identical to
/// sorting by `priority`, and priorities are exactly `1..=N`. Every
/// structural mutation re-establishes this via [`renumber`](Self::renumber).
///
/// Mutations here are pure in-memory operations; write-back belongs to
/// [`WishlistSession`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wishlist {
    items: Vec<WishlistItem>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored items: order by stored priority, then
    /// renumber so the dense-priority invariant holds even if the
    /// payload carried gaps or duplicates.
    pub fn from_items(mut items: Vec<WishlistItem>) -> Self {
        items.sort_by_key(|item| item.priority);
        let mut wishlist = Self { items };
        wishlist.renumber();
        wishlist
    }

    /// The fixed seed used when no persisted collection exists.
    pub fn starter_items() -> Vec<WishlistItem> {
        vec![
            WishlistItem {
                id: ItemId::from("1"),
                name: "Hu Tao".to_owned(),
                kind: ItemKind::Character,
                rarity: 5,
                image_url: "https://i.pinimg.com/736x/d5/0b/0d/d50b0da989d60aa7b9a7a9c6ca308365.jpg".to_owned(),
                notes: "77th-Generation Director of the Wangsheng Funeral Parlor".to_owned(),
                obtained: false,
                priority: 1,
            },
            WishlistItem {
                id: ItemId::from("2"),
                name: "Staff of Homa".to_owned(),
                kind: ItemKind::Weapon,
                rarity: 5,
                image_url: "https://i.pinimg.com/736x/12/a8/d4/12a8d4d31d3bffcab1a48887b4c5666d.jpg".to_owned(),
                notes: "Hu Tao's signature weapon".to_owned(),
                obtained: false,
                priority: 2,
            },
            WishlistItem {
                id: ItemId::from("3"),
                name: "Bennett".to_owned(),
                kind: ItemKind::Character,
                rarity: 4,
                image_url: "https://i.pinimg.com/1200x/3e/aa/9d/3eaa9d90e2e50775039f7ef0b7db6813.jpg".to_owned(),
                notes: "Leader of Benny's Adventure Team".to_owned(),
                obtained: true,
                priority: 3,
            },
        ]
    }

    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&WishlistItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Append a new item with a fresh id and the next priority.
    /// Rejects a blank name and an out-of-domain rarity.
    pub fn add(&mut self, new: NewItem) -> Result<&WishlistItem, WishlistError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(WishlistError::EmptyName);
        }
        if !matches!(new.rarity, 4 | 5) {
            return Err(WishlistError::InvalidRarity(new.rarity));
        }

        let index = self.items.len();
        self.items.push(WishlistItem {
            id: ItemId::generate(),
            name: name.to_owned(),
            kind: new.kind,
            rarity: new.rarity,
            image_url: new.image_url.trim().to_owned(),
            notes: new.notes.trim().to_owned(),
            obtained: false,
            priority: index as u32 + 1,
        });
        Ok(&self.items[index])
    }

    /// Remove by id and renumber. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.items.remove(index);
        self.renumber();
        true
    }

    /// Unknown ids are a no-op.
    pub fn set_obtained(&mut self, id: &ItemId, obtained: bool) -> bool {
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.obtained = obtained;
                true
            }
            None => false,
        }
    }

    /// Move `dragged` to `target`'s pre-removal position and renumber.
    /// Unknown ids are an error; dropping an item onto itself succeeds
    /// without changes.
    pub fn reorder(&mut self, dragged: &ItemId, target: &ItemId) -> Result<(), WishlistError> {
        let from = self
            .position(dragged)
            .ok_or_else(|| WishlistError::UnknownItem(dragged.clone()))?;
        let to = self
            .position(target)
            .ok_or_else(|| WishlistError::UnknownItem(target.clone()))?;
        if from == to {
            return Ok(());
        }

        let item = self.items.remove(from);
        self.items.insert(to, item);
        self.renumber();
        Ok(())
    }

    /// Lazy, restartable view of the items matching `criterion`, in
    /// priority order (the canonical sequence, by invariant).
    pub fn filter(&self, criterion: FilterCriterion) -> impl Iterator<Item = &WishlistItem> {
        self.items.iter().filter(move |item| criterion.matches(item))
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(&self.items)?)
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let items: Vec<WishlistItem> = serde_json::from_str(raw)?;
        Ok(Self::from_items(items))
    }

    fn renumber(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.priority = index as u32 + 1;
        }
    }

    fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }
}

/// A wishlist bound to a [`KvStore`] slot. Mutations delegate to the
/// pure layer and then write back best-effort: storage failures are
/// logged and absorbed, the in-memory state stands either way.
pub struct WishlistSession<K: KvStore> {
    wishlist: Wishlist,
    store: K,
}

impl<K: KvStore> WishlistSession<K> {
    /// Load the collection from `store`, seeding (and immediately
    /// persisting) the starter items when the slot is absent or
    /// unreadable.
    pub fn open(store: K) -> Self {
        let wishlist = match store.get(STORAGE_KEY) {
            Ok(Some(raw)) => match Wishlist::from_json(&raw) {
                Ok(wishlist) => wishlist,
                Err(err) => {
                    warn!(%err, "stored wishlist is unreadable, seeding starter items");
                    Self::seed(&store)
                }
            },
            Ok(None) => Self::seed(&store),
            Err(err) => {
                warn!(%err, "wishlist storage unavailable, seeding starter items");
                Self::seed(&store)
            }
        };
        Self { wishlist, store }
    }

    fn seed(store: &K) -> Wishlist {
        let wishlist = Wishlist::from_items(Wishlist::starter_items());
        match wishlist.to_json() {
            Ok(raw) => {
                if let Err(err) = store.set(STORAGE_KEY, &raw) {
                    warn!(%err, "could not persist starter wishlist");
                }
            }
            Err(err) => warn!(%err, "could not serialize starter wishlist"),
        }
        wishlist
    }

    pub fn add(&mut self, new: NewItem) -> Result<ItemId, WishlistError> {
        let id = self.wishlist.add(new)?.id.clone();
        self.save_best_effort();
        Ok(id)
    }

    pub fn remove(&mut self, id: &ItemId) -> bool {
        let removed = self.wishlist.remove(id);
        if removed {
            self.save_best_effort();
        }
        removed
    }

    pub fn set_obtained(&mut self, id: &ItemId, obtained: bool) -> bool {
        let changed = self.wishlist.set_obtained(id, obtained);
        if changed {
            self.save_best_effort();
        }
        changed
    }

    pub fn reorder(&mut self, dragged: &ItemId, target: &ItemId) -> Result<(), WishlistError> {
        self.wishlist.reorder(dragged, target)?;
        self.save_best_effort();
        Ok(())
    }

    pub fn filter(&self, criterion: FilterCriterion) -> impl Iterator<Item = &WishlistItem> {
        self.wishlist.filter(criterion)
    }

    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// Explicit write-back, for callers that want the error.
    pub fn persist(&self) -> anyhow::Result<()> {
        let raw = self.wishlist.to_json()?;
        self.store.set(STORAGE_KEY, &raw)?;
        Ok(())
    }

    fn save_best_effort(&self) {
        if let Err(err) = self.persist() {
            warn!(%err, "wishlist write-back failed, keeping in-memory state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use wd_storage::{InMemoryKv, NoopKv};

    fn new_item(name: &str, kind: ItemKind, rarity: u8) -> NewItem {
        NewItem {
            name: name.to_owned(),
            kind,
            rarity,
            image_url: String::new(),
            notes: String::new(),
        }
    }

    fn abc() -> (Wishlist, ItemId, ItemId, ItemId) {
        let mut wishlist = Wishlist::new();
        let a = wishlist.add(new_item("A", ItemKind::Character, 5)).unwrap().id.clone();
        let b = wishlist.add(new_item("B", ItemKind::Character, 4)).unwrap().id.clone();
        let c = wishlist.add(new_item("C", ItemKind::Weapon, 5)).unwrap().id.clone();
        (wishlist, a, b, c)
    }

    fn priorities(wishlist: &Wishlist) -> Vec<u32> {
        wishlist.items().iter().map(|item| item.priority).collect()
    }

    fn names(wishlist: &Wishlist) -> Vec<&str> {
        wishlist.items().iter().map(|item| item.name.as_str()).collect()
    }

    #[test]
    fn add_on_empty_store_yields_priority_one() -> Result<()> {
        let mut wishlist = Wishlist::new();
        let item = wishlist.add(new_item("A", ItemKind::Character, 5))?;
        assert_eq!(item.priority, 1);
        assert!(!item.obtained);
        assert!(!item.id.as_str().is_empty());
        Ok(())
    }

    #[test]
    fn add_rejects_blank_name_without_changes() {
        let mut wishlist = Wishlist::new();
        assert_eq!(
            wishlist.add(new_item("   ", ItemKind::Character, 5)),
            Err(WishlistError::EmptyName)
        );
        assert!(wishlist.is_empty());
    }

    #[test]
    fn add_rejects_out_of_domain_rarity() {
        let mut wishlist = Wishlist::new();
        assert_eq!(
            wishlist.add(new_item("A", ItemKind::Weapon, 0)),
            Err(WishlistError::InvalidRarity(0))
        );
        assert_eq!(
            wishlist.add(new_item("A", ItemKind::Weapon, 6)),
            Err(WishlistError::InvalidRarity(6))
        );
        assert!(wishlist.is_empty());
    }

    #[test]
    fn priorities_stay_dense_across_mutations() -> Result<()> {
        let (mut wishlist, a, _b, c) = abc();
        wishlist.remove(&a);
        let d = wishlist.add(new_item("D", ItemKind::Weapon, 4))?.id.clone();
        wishlist.reorder(&d, &c)?;
        assert_eq!(priorities(&wishlist), vec![1, 2, 3]);
        assert_eq!(names(&wishlist), vec!["B", "D", "C"]);
        Ok(())
    }

    #[test]
    fn reorder_last_before_first() -> Result<()> {
        let (mut wishlist, a, _b, c) = abc();
        wishlist.reorder(&c, &a)?;
        assert_eq!(names(&wishlist), vec!["C", "A", "B"]);
        assert_eq!(priorities(&wishlist), vec![1, 2, 3]);
        Ok(())
    }

    #[test]
    fn reorder_first_toward_end_uses_pre_removal_target_index() -> Result<()> {
        // Dragging downward drops after the target, as in the original.
        let (mut wishlist, a, _b, c) = abc();
        wishlist.reorder(&a, &c)?;
        assert_eq!(names(&wishlist), vec!["B", "C", "A"]);
        Ok(())
    }

    #[test]
    fn reorder_onto_itself_is_a_noop() -> Result<()> {
        let (mut wishlist, a, ..) = abc();
        wishlist.reorder(&a, &a)?;
        assert_eq!(names(&wishlist), vec!["A", "B", "C"]);
        Ok(())
    }

    #[test]
    fn reorder_unknown_id_errors_without_changes() {
        let (mut wishlist, a, ..) = abc();
        let ghost = ItemId::from("ghost");
        assert_eq!(
            wishlist.reorder(&ghost, &a),
            Err(WishlistError::UnknownItem(ghost.clone()))
        );
        assert_eq!(
            wishlist.reorder(&a, &ghost),
            Err(WishlistError::UnknownItem(ghost))
        );
        assert_eq!(names(&wishlist), vec!["A", "B", "C"]);
        assert_eq!(priorities(&wishlist), vec![1, 2, 3]);
    }

    #[test]
    fn remove_shifts_later_priorities_down() {
        let (mut wishlist, _a, b, _c) = abc();
        assert!(wishlist.remove(&b));
        assert_eq!(names(&wishlist), vec!["A", "C"]);
        assert_eq!(priorities(&wishlist), vec![1, 2]);
        assert!(!wishlist.remove(&b));
    }

    #[test]
    fn set_obtained_finds_by_id() {
        let (mut wishlist, a, ..) = abc();
        assert!(wishlist.set_obtained(&a, true));
        assert!(wishlist.get(&a).unwrap().obtained);
        assert!(!wishlist.set_obtained(&ItemId::from("ghost"), true));
    }

    #[test]
    fn filter_selects_by_kind_and_rarity_in_priority_order() {
        let (wishlist, a, ..) = abc();
        let hits: Vec<_> = wishlist.filter(FilterCriterion::Character5).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, a);

        let all: Vec<_> = wishlist.filter(FilterCriterion::All).collect();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].priority < w[1].priority));

        // Restartable: a second pass sees the same sequence.
        let again: Vec<_> = wishlist.filter(FilterCriterion::All).collect();
        assert_eq!(all, again);
    }

    #[test]
    fn json_round_trip_is_field_for_field() -> Result<()> {
        let (mut wishlist, a, ..) = abc();
        wishlist.set_obtained(&a, true);
        let restored = Wishlist::from_json(&wishlist.to_json()?)?;
        assert_eq!(restored, wishlist);
        Ok(())
    }

    #[test]
    fn from_items_normalizes_order_and_gaps() {
        let mut items = Wishlist::starter_items();
        items[0].priority = 40;
        items[1].priority = 7;
        items[2].priority = 7;
        let wishlist = Wishlist::from_items(items);
        assert_eq!(priorities(&wishlist), vec![1, 2, 3]);
        // Stored priority decides the order; ties keep payload order.
        assert_eq!(names(&wishlist), vec!["Staff of Homa", "Bennett", "Hu Tao"]);
    }

    #[test]
    fn open_on_empty_storage_seeds_and_persists_starters() -> Result<()> {
        let kv = InMemoryKv::default();
        let session = WishlistSession::open(&kv);
        assert_eq!(names(session.wishlist()), vec!["Hu Tao", "Staff of Homa", "Bennett"]);
        assert_eq!(priorities(session.wishlist()), vec![1, 2, 3]);

        let raw = kv.get(STORAGE_KEY)?.expect("seed should be persisted");
        assert_eq!(Wishlist::from_json(&raw)?, *session.wishlist());
        Ok(())
    }

    #[test]
    fn open_on_corrupt_storage_falls_back_to_starters() -> Result<()> {
        let kv = InMemoryKv::default();
        kv.set(STORAGE_KEY, "not json {")?;
        let session = WishlistSession::open(&kv);
        assert_eq!(session.wishlist().len(), 3);

        // The fallback replaces the corrupt slot.
        let raw = kv.get(STORAGE_KEY)?.expect("seed should be persisted");
        assert!(Wishlist::from_json(&raw).is_ok());
        Ok(())
    }

    #[test]
    fn open_round_trips_a_persisted_collection() -> Result<()> {
        let kv = InMemoryKv::default();
        {
            let mut session = WishlistSession::open(&kv);
            let hu_tao = session.wishlist().items()[0].id.clone();
            session.set_obtained(&hu_tao, true);
            session.add(new_item("Furina", ItemKind::Character, 5))?;
        }

        let session = WishlistSession::open(&kv);
        assert_eq!(session.wishlist().len(), 4);
        assert!(session.wishlist().items()[0].obtained);
        assert_eq!(session.wishlist().items()[3].name, "Furina");
        assert_eq!(priorities(session.wishlist()), vec![1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn open_preserves_an_explicitly_emptied_collection() -> Result<()> {
        let kv = InMemoryKv::default();
        {
            let mut session = WishlistSession::open(&kv);
            let ids: Vec<_> = session.wishlist().items().iter().map(|i| i.id.clone()).collect();
            for id in &ids {
                assert!(session.remove(id));
            }
        }

        // An empty array is valid data, not a missing slot.
        let session = WishlistSession::open(&kv);
        assert!(session.wishlist().is_empty());
        Ok(())
    }

    #[test]
    fn session_mutations_survive_storage_loss() -> Result<()> {
        // NoopKv drops every write; the in-memory model keeps working.
        let mut session = WishlistSession::open(NoopKv);
        let id = session.add(new_item("Furina", ItemKind::Character, 5))?;
        assert!(session.set_obtained(&id, true));
        assert_eq!(session.wishlist().len(), 4);
        Ok(())
    }

    #[test]
    fn session_surfaces_domain_errors_unchanged() {
        let mut session = WishlistSession::open(NoopKv);
        assert_eq!(
            session.add(new_item("", ItemKind::Character, 5)),
            Err(WishlistError::EmptyName)
        );
        let ghost = ItemId::from("ghost");
        let target = session.wishlist().items()[0].id.clone();
        assert_eq!(
            session.reorder(&ghost, &target),
            Err(WishlistError::UnknownItem(ghost))
        );
    }
}
