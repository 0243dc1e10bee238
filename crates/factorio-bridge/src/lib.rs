//! Factorio bridge for the RCON MCP server
//!
//! Turns MCP tool calls into Factorio console commands:
//!
//! - **Commands**: bare Lua is prefixed with `/silent-command` (or `/c`)
//!   exactly once; text already starting with `/` is sent as is
//! - **Delivery**: one run of the external `rcon` client per command, using
//!   either its config file or an address and password
//! - **Responses**: trimmed client stdout; JSON helper payloads are decoded
//!   and formatted, with the raw text as fallback

pub mod bridge;
pub mod command;
pub mod config;
pub mod lua;
pub mod payload;
pub mod rcon;

pub use bridge::FactorioBridge;
pub use command::{ConsoleCommand, normalize};
pub use config::{RconConfig, RconConnection};
pub use lua::PlayerName;
pub use rcon::{CommandRunner, RconCli, RconClient};
