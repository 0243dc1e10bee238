//! RCON client configuration
//!
//! The external `rcon` client is driven in one of two ways:
//!
//! - **Config file**: `rcon -c <path> <command>`, credentials live in the
//!   client's own YAML config
//! - **Direct**: `rcon -a <host>:<port> -p <password> <command>`

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Client binary looked up on `PATH` when none is configured
pub const DEFAULT_RCON_BIN: &str = "rcon";
/// Config file used by the `rcon` client when none is configured
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/rcon/rcon.yaml";
/// Default Factorio RCON address
pub const DEFAULT_SERVER_IP: &str = "127.0.0.1";
/// Default Factorio RCON port
pub const DEFAULT_RCON_PORT: u16 = 27015;
/// Default bound on a single client invocation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How the client finds the server
#[derive(Clone, PartialEq, Eq)]
pub enum RconConnection {
    /// Address and credentials come from the client's config file
    ConfigFile { path: PathBuf },
    /// Address and credentials are passed on the command line
    Direct {
        host: String,
        port: u16,
        password: String,
    },
}

impl RconConnection {
    /// `host:port` as the client expects it (IPv6 hosts are bracketed)
    fn address(host: &str, port: u16) -> String {
        if host.contains(':') && !host.starts_with('[') {
            format!("[{}]:{}", host, port)
        } else {
            format!("{}:{}", host, port)
        }
    }
}

// Keeps the password out of logs
impl fmt::Debug for RconConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RconConnection::ConfigFile { path } => {
                f.debug_struct("ConfigFile").field("path", path).finish()
            }
            RconConnection::Direct { host, port, .. } => f
                .debug_struct("Direct")
                .field("host", host)
                .field("port", port)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

impl fmt::Display for RconConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RconConnection::ConfigFile { path } => write!(f, "config file {}", path.display()),
            RconConnection::Direct { host, port, .. } => {
                write!(f, "{}", Self::address(host, *port))
            }
        }
    }
}

/// Configuration for the RCON command adapter
///
/// Built once at startup and shared by reference with the adapter.
#[derive(Debug, Clone)]
pub struct RconConfig {
    /// Path or name of the external client binary
    pub rcon_bin: PathBuf,
    /// Connection mode
    pub connection: RconConnection,
    /// Upper bound on one client invocation
    pub timeout: Duration,
}

impl Default for RconConfig {
    fn default() -> Self {
        Self::config_file(expand_home(DEFAULT_CONFIG_PATH))
    }
}

impl RconConfig {
    /// Use the client's own config file
    pub fn config_file(path: impl Into<PathBuf>) -> Self {
        Self {
            rcon_bin: PathBuf::from(DEFAULT_RCON_BIN),
            connection: RconConnection::ConfigFile { path: path.into() },
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Pass address and password on the command line
    pub fn direct(host: impl Into<String>, port: u16, password: impl Into<String>) -> Self {
        Self {
            rcon_bin: PathBuf::from(DEFAULT_RCON_BIN),
            connection: RconConnection::Direct {
                host: host.into(),
                port,
                password: password.into(),
            },
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_rcon_bin(mut self, rcon_bin: impl Into<PathBuf>) -> Self {
        self.rcon_bin = rcon_bin.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Arguments for one client invocation, command last
    ///
    /// The command is a single argv element; no shell is involved, so it is
    /// never quoted.
    pub fn args(&self, command: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = match &self.connection {
            RconConnection::ConfigFile { path } => {
                vec!["-c".into(), path.clone().into_os_string()]
            }
            RconConnection::Direct {
                host,
                port,
                password,
            } => vec![
                "-a".into(),
                RconConnection::address(host, *port).into(),
                "-p".into(),
                password.into(),
            ],
        };
        args.push(command.into());
        args
    }
}

/// Expand a leading `~` to the current user's home directory
pub fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
