//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to              |
//! |------------|--------------------|--------------------------|
//! | `hardware` | DistancePort       | HC-SR04 on GPIO          |
//! |            | ActuatorPort       | Fan LEDC PWM, UV GPIO    |
//! | `log_sink` | EventSink          | Serial log output        |
//! | `nvs`      | ConfigPort         | NVS / in-memory store    |
//! | `reporter` | StatusReporter     | JSON payload transport   |
//! | `time`     | ClockPort          | ESP32 system timer       |
//! | `wifi`     | ConnectivityPort   | ESP-IDF WiFi STA         |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod reporter;
pub mod time;
pub mod wifi;
