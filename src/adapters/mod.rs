//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements    | Connects to                          |
//! |---------------|---------------|--------------------------------------|
//! | `config_file` | ConfigPort    | JSON file (host)                     |
//! | `http_link`   | RemoteLink    | Coordinator over HTTP/1.1            |
//! | `log_sink`    | EventSink     | Serial / stderr log output           |
//! | `shutdown`    | —             | Ctrl-C listener (host)               |
//! | `switch`      | SwitchPort    | Valve script (host), relay GPIO      |
//! | `time`        | DelayNs       | FreeRTOS delay, `thread::sleep`      |
//! | `wifi`        | —             | ESP-IDF WiFi STA                     |

#[cfg(not(target_os = "espidf"))]
pub mod config_file;
pub mod http_link;
pub mod log_sink;
pub mod shutdown;
pub mod switch;
pub mod time;
pub mod wifi;
