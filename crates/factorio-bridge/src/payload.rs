//! JSON payloads printed by the helper scripts
//!
//! `table_to_json` renders an empty Lua table as `{}`, so list-shaped
//! payloads accept an empty object as an empty list.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Ticks per in-game second
pub const TICKS_PER_SECOND: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A connected player
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    #[serde(default)]
    pub position: Option<Position>,
}

/// Result of the inventory helper
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InventoryReport {
    pub found: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contents: ItemContents,
}

/// Inventory contents in either of the shapes `get_contents()` returns
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ItemContents {
    /// `{ "iron-plate": 50 }`
    Counts(BTreeMap<String, u64>),
    /// `[{ "name": "iron-plate", "count": 50, "quality": "normal" }]`
    Stacks(Vec<ItemStack>),
}

impl Default for ItemContents {
    fn default() -> Self {
        ItemContents::Counts(BTreeMap::new())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemStack {
    pub name: String,
    pub count: u64,
    #[serde(default)]
    pub quality: Option<String>,
}

impl ItemContents {
    /// `(label, count)` pairs sorted by label
    pub fn entries(&self) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = match self {
            ItemContents::Counts(map) => map.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            ItemContents::Stacks(stacks) => stacks
                .iter()
                .map(|s| {
                    let label = match s.quality.as_deref() {
                        Some(q) if q != "normal" => format!("{} ({})", s.name, q),
                        _ => s.name.clone(),
                    };
                    (label, s.count)
                })
                .collect(),
        };
        entries.sort();
        entries
    }
}

/// A JSON array, or `{}` standing in for an empty one
fn list_or_empty_object<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrObject<T> {
        List(Vec<T>),
        Object(BTreeMap<String, serde_json::Value>),
    }

    match ListOrObject::<T>::deserialize(deserializer)? {
        ListOrObject::List(items) => Ok(items),
        ListOrObject::Object(map) if map.is_empty() => Ok(Vec::new()),
        ListOrObject::Object(_) => Err(serde::de::Error::custom("expected a JSON array")),
    }
}

#[derive(Deserialize)]
#[serde(transparent)]
struct PlayerList(#[serde(deserialize_with = "list_or_empty_object")] Vec<PlayerInfo>);

/// Decode the player-list payload; an empty response means no players
pub fn parse_players(raw: &str) -> Result<Vec<PlayerInfo>, serde_json::Error> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str::<PlayerList>(raw).map(|list| list.0)
}

pub fn parse_inventory(raw: &str) -> Result<InventoryReport, serde_json::Error> {
    serde_json::from_str(raw)
}

/// One line per player
pub fn format_players(players: &[PlayerInfo]) -> String {
    if players.is_empty() {
        return "No players connected".to_string();
    }

    let mut out = format!("Connected players ({}):", players.len());
    for player in players {
        match player.position {
            Some(pos) => {
                let _ = write!(out, "\n- {} at ({:.1}, {:.1})", player.name, pos.x, pos.y);
            }
            None => {
                let _ = write!(out, "\n- {}", player.name);
            }
        }
    }
    out
}

/// Inventory listing for a player known to be connected
pub fn format_inventory(name: &str, contents: &ItemContents) -> String {
    let entries = contents.entries();
    if entries.is_empty() {
        return format!("Inventory of {} is empty", name);
    }

    let mut out = format!("Inventory of {}:", name);
    for (item, count) in entries {
        let _ = write!(out, "\n- {}: {}", item, count);
    }
    out
}

/// Elapsed game time in days, hours and minutes
pub fn format_game_time(tick: u64) -> String {
    let total_minutes = tick / (TICKS_PER_SECOND * 60);
    let days = total_minutes / (60 * 24);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;
    format!(
        "Game time: {} days, {} hours, {} minutes (Total ticks: {})",
        days, hours, minutes, tick
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_players() {
        let players =
            parse_players(r#"[{"name":"Alice","position":{"x":1.5,"y":-2}},{"name":"Bob"}]"#)
                .unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].position, Some(Position { x: 1.5, y: -2.0 }));
        assert_eq!(players[1].position, None);
    }

    #[test]
    fn test_empty_player_payloads() {
        assert!(parse_players("").unwrap().is_empty());
        assert!(parse_players("{}").unwrap().is_empty());
        assert!(parse_players("[]").unwrap().is_empty());
        assert!(parse_players(r#"{"name":"Alice"}"#).is_err());
        assert!(parse_players("Unknown command").is_err());
    }

    #[test]
    fn test_format_players() {
        assert_eq!(format_players(&[]), "No players connected");

        let players = vec![
            PlayerInfo {
                name: "Alice".into(),
                position: Some(Position { x: 10.0, y: -3.3 }),
            },
            PlayerInfo {
                name: "Bob".into(),
                position: None,
            },
        ];
        assert_eq!(
            format_players(&players),
            "Connected players (2):\n- Alice at (10.0, -3.3)\n- Bob"
        );
    }

    #[test]
    fn test_inventory_shapes() {
        let legacy = parse_inventory(
            r#"{"found":true,"name":"Alice","contents":{"iron-plate":50,"coal":7}}"#,
        )
        .unwrap();
        assert!(legacy.found);
        assert_eq!(
            format_inventory("Alice", &legacy.contents),
            "Inventory of Alice:\n- coal: 7\n- iron-plate: 50"
        );

        let stacks = parse_inventory(
            r#"{"found":true,"name":"Alice","contents":[{"name":"gear","count":3,"quality":"rare"},{"name":"coal","count":1,"quality":"normal"}]}"#,
        )
        .unwrap();
        assert_eq!(
            stacks.contents.entries(),
            vec![("coal".to_string(), 1), ("gear (rare)".to_string(), 3)]
        );
    }

    #[test]
    fn test_inventory_not_found_and_empty() {
        let missing = parse_inventory(r#"{"found":false}"#).unwrap();
        assert!(!missing.found);
        assert_eq!(missing.name, None);

        let empty = parse_inventory(r#"{"found":true,"name":"Bob","contents":{}}"#).unwrap();
        assert_eq!(
            format_inventory("Bob", &empty.contents),
            "Inventory of Bob is empty"
        );
    }

    #[test]
    fn test_format_game_time() {
        assert_eq!(
            format_game_time(0),
            "Game time: 0 days, 0 hours, 0 minutes (Total ticks: 0)"
        );
        // 1 day, 2 hours, 3 minutes, plus a few stray ticks
        let tick = ((24 + 2) * 60 + 3) * 60 * TICKS_PER_SECOND + 59;
        assert_eq!(
            format_game_time(tick),
            format!("Game time: 1 days, 2 hours, 3 minutes (Total ticks: {})", tick)
        );
    }
}
