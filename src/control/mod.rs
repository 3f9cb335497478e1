//! Control logic: fullness classification, the actuator decision policy,
//! and the controller that owns what is currently commanded.
//!
//! Everything here is pure or talks to hardware only through
//! [`ActuatorPort`](crate::app::ports::ActuatorPort).

pub mod actuator;
pub mod classifier;
pub mod policy;
