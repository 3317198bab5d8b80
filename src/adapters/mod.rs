//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                  |
//! |----------------|--------------------|------------------------------|
//! | `hardware`     | ActuatorPort       | Servo on LEDC PWM            |
//! |                | DisplayPort        | HD44780 LCD, GPIO            |
//! |                | DelayNs            | FreeRTOS delay               |
//! | `log_sink`     | EventSink          | Serial log output            |
//! | `remote_store` | RemoteStorePort    | HTTP key-value / in-memory   |
//! | `time`         | (uptime clock)     | ESP32 system timer           |
//! | `token`        | TokenSource        | Hardware RNG                 |
//! | `wifi`         | ConnectivityPort   | ESP-IDF WiFi STA             |

pub mod hardware;
pub mod log_sink;
pub mod remote_store;
pub mod time;
pub mod token;
pub mod wifi;
