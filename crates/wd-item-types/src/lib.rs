use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ItemId(pub String);

impl ItemId {
    /// Fresh opaque id for a newly added item.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Character,
    Weapon,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Character => "character",
            ItemKind::Weapon => "weapon",
        }
    }

    /// Parse a form/select value. Anything else is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "character" => Some(ItemKind::Character),
            "weapon" => Some(ItemKind::Weapon),
            _ => None,
        }
    }
}

/// One collectible entry. Wire names (`type`, `imageUrl`) match the
/// persisted localStorage payload of the original application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WishlistItem {
    pub id: ItemId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub rarity: u8,
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub obtained: bool,
    pub priority: u32,
}

/// Payload for adding an item. `id`, `obtained`, and `priority` are
/// assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub rarity: u8,
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    #[serde(default)]
    pub notes: String,
}

/// Named predicate over `(kind, rarity)`. Keys match the filter bar's
/// `data-filter` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterCriterion {
    #[default]
    All,
    Character4,
    Character5,
    Weapon4,
    Weapon5,
}

impl FilterCriterion {
    pub fn key(self) -> &'static str {
        match self {
            FilterCriterion::All => "all",
            FilterCriterion::Character4 => "character-4",
            FilterCriterion::Character5 => "character-5",
            FilterCriterion::Weapon4 => "weapon-4",
            FilterCriterion::Weapon5 => "weapon-5",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "all" => Some(FilterCriterion::All),
            "character-4" => Some(FilterCriterion::Character4),
            "character-5" => Some(FilterCriterion::Character5),
            "weapon-4" => Some(FilterCriterion::Weapon4),
            "weapon-5" => Some(FilterCriterion::Weapon5),
            _ => None,
        }
    }

    pub fn matches(self, item: &WishlistItem) -> bool {
        match self {
            FilterCriterion::All => true,
            FilterCriterion::Character4 => item.kind == ItemKind::Character && item.rarity == 4,
            FilterCriterion::Character5 => item.kind == ItemKind::Character && item.rarity == 5,
            FilterCriterion::Weapon4 => item.kind == ItemKind::Weapon && item.rarity == 4,
            FilterCriterion::Weapon5 => item.kind == ItemKind::Weapon && item.rarity == 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WishlistItem {
        WishlistItem {
            id: ItemId::from("1"),
            name: "Hu Tao".to_owned(),
            kind: ItemKind::Character,
            rarity: 5,
            image_url: "https://example.com/hu-tao.jpg".to_owned(),
            notes: String::new(),
            obtained: false,
            priority: 1,
        }
    }

    #[test]
    fn wire_format_uses_original_field_names() -> anyhow::Result<()> {
        let json = serde_json::to_value(sample())?;
        assert_eq!(json["type"], "character");
        assert_eq!(json["imageUrl"], "https://example.com/hu-tao.jpg");
        assert_eq!(json["rarity"], 5);
        assert!(json.get("kind").is_none());
        assert!(json.get("image_url").is_none());
        Ok(())
    }

    #[test]
    fn original_payload_deserializes() -> anyhow::Result<()> {
        let raw = r#"{
            "id": "2",
            "name": "Staff of Homa",
            "type": "weapon",
            "rarity": 5,
            "imageUrl": "",
            "notes": "Hu Tao's signature weapon",
            "obtained": false,
            "priority": 2
        }"#;
        let item: WishlistItem = serde_json::from_str(raw)?;
        assert_eq!(item.kind, ItemKind::Weapon);
        assert_eq!(item.notes, "Hu Tao's signature weapon");
        assert_eq!(item.priority, 2);
        Ok(())
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let raw = r#"{"id":"3","name":"X","type":"artifact","rarity":5,"priority":1}"#;
        assert!(serde_json::from_str::<WishlistItem>(raw).is_err());
    }

    #[test]
    fn criterion_keys_round_trip() {
        for criterion in [
            FilterCriterion::All,
            FilterCriterion::Character4,
            FilterCriterion::Character5,
            FilterCriterion::Weapon4,
            FilterCriterion::Weapon5,
        ] {
            assert_eq!(FilterCriterion::from_key(criterion.key()), Some(criterion));
        }
        assert_eq!(FilterCriterion::from_key("character-3"), None);
    }

    #[test]
    fn criterion_matches_kind_and_rarity() {
        let mut item = sample();
        assert!(FilterCriterion::All.matches(&item));
        assert!(FilterCriterion::Character5.matches(&item));
        assert!(!FilterCriterion::Character4.matches(&item));
        assert!(!FilterCriterion::Weapon5.matches(&item));

        item.kind = ItemKind::Weapon;
        item.rarity = 4;
        assert!(FilterCriterion::Weapon4.matches(&item));
        assert!(!FilterCriterion::Character4.matches(&item));
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(ItemId::generate(), ItemId::generate());
    }
}
