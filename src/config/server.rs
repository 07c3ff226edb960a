/// Server configuration constants.
///
/// Address and port the HTTP/WebSocket server binds to.
pub const BIND_ADDR: &str = "127.0.0.1";

pub const BIND_PORT: u16 = 8080;

/// A session nobody has joined after this many seconds is shut down.
pub const IDLE_SESSION_TIMEOUT_SECS: u64 = 120;
