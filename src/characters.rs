//! Playable character roster
//!
//! The house character plus the NFT collection, addressed by string id.

use serde::Serialize;

/// Number of NFT characters after the house character
pub const NFT_COUNT: u32 = 250;

const NFT_IMAGE_BASE: &str = "https://gateway.pinit.io/cdn-cgi/image/format=auto/https://na-assets.pinit.io/HfqcAE9Za88tX3kpNYU3bNfST9cssNK7KBMgTEgnkXVd/a4f3b1e9-17de-4789-98c6-3007ce15db79/";

/// A selectable player sprite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub image_url: String,
}

/// All selectable characters, house character first
#[derive(Debug, Clone)]
pub struct Roster {
    characters: Vec<Character>,
}

impl Default for Roster {
    fn default() -> Self {
        let mut characters = Vec::with_capacity(NFT_COUNT as usize + 1);
        characters.push(Character {
            id: "xisk".to_string(),
            name: "XISK".to_string(),
            image_url: "/game/xisk.png".to_string(),
        });
        characters.extend((0..NFT_COUNT).map(|i| Character {
            id: format!("nft-{}", i),
            name: format!("GEMtard #{}", i),
            image_url: format!("{}{}", NFT_IMAGE_BASE, i),
        }));
        Self { characters }
    }
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// The character a fresh session starts with
    pub fn default_character(&self) -> &Character {
        &self.characters[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    /// Serialise every character, house character first
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.iter().collect::<Vec<_>>())
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_contents() {
        let roster = Roster::new();
        assert_eq!(roster.len(), 251);
        assert_eq!(roster.default_character().name, "XISK");

        let last = roster.get("nft-249").unwrap();
        assert_eq!(last.name, "GEMtard #249");
        assert!(last.image_url.ends_with("/249"));
        assert!(roster.get("nft-250").is_none());
    }

    #[test]
    fn test_roster_json_for_gallery() {
        let roster = Roster::new();
        let value: serde_json::Value = serde_json::from_str(&roster.to_json().unwrap()).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 251);
        assert_eq!(entries[0]["id"], "xisk");
        assert_eq!(entries[1]["name"], "GEMtard #0");
        assert_eq!(entries[250]["id"], "nft-249");
    }
}
