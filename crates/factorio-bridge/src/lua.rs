//! Lua expression builder
//!
//! Every value that ends up inside a Lua chunk goes through this module:
//! strings are emitted as escaped literals and player names are validated
//! before they are interpolated.

use factorio_mcp_core::{FactorioMcpError, Result};

/// Longest player name accepted
pub const MAX_PLAYER_NAME_LEN: usize = 60;

/// Render `s` as a double-quoted Lua string literal
pub fn string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => out.push_str(&format!("\\{:03}", c as u8)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Wrap an expression so its value is sent back over RCON
pub fn print(expr: &str) -> String {
    format!("rcon.print({})", expr)
}

/// Wrap a table expression so it is sent back as JSON
///
/// `table_to_json` lives on `helpers` since 2.0 and on `game` before that.
pub fn print_json(expr: &str) -> String {
    print(&format!("(helpers or game).table_to_json({})", expr))
}

/// A validated Factorio player name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName(String);

impl PlayerName {
    /// Accepts ASCII letters, digits, `_`, `-` and `.`
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FactorioMcpError::InvalidArgument(
                "Player name must not be empty".to_string(),
            ));
        }
        if name.len() > MAX_PLAYER_NAME_LEN {
            return Err(FactorioMcpError::InvalidArgument(format!(
                "Player name longer than {} characters",
                MAX_PLAYER_NAME_LEN
            )));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
        {
            return Err(FactorioMcpError::InvalidArgument(format!(
                "Invalid character {:?} in player name",
                bad
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name as a Lua string literal
    pub fn to_lua(&self) -> String {
        string(&self.0)
    }
}

impl std::fmt::Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Base version, tick, player count and surface count as one line
pub fn server_status() -> String {
    print(
        r#""Version: " .. script.active_mods["base"] .. ", Tick: " .. game.tick .. ", Players: " .. #game.connected_players .. ", Surfaces: " .. #game.surfaces"#,
    )
}

/// Current tick
pub fn game_tick() -> String {
    print("game.tick")
}

/// Connected players as a JSON array of `{name, position}`
pub fn list_players() -> String {
    format!(
        "local players = {{}} for _, p in pairs(game.connected_players) do players[#players + 1] = {{name = p.name, position = p.position}} end {}",
        print_json("players")
    )
}

/// Main inventory of `player` (or the first connected player) as JSON
///
/// Prints `{found = false}` when the player is unknown or offline.
pub fn player_inventory(player: Option<&PlayerName>) -> String {
    let lookup = match player {
        Some(name) => format!("game.get_player({})", name.to_lua()),
        None => "game.connected_players[1]".to_string(),
    };
    format!(
        "local p = {} if p and p.connected then local inv = p.get_main_inventory() {} else {} end",
        lookup,
        print_json("{found = true, name = p.name, contents = inv and inv.get_contents() or {}}"),
        print_json("{found = false}")
    )
}
