//! UV attractant light driver (relay/MOSFET on a plain GPIO).
//!
//! On/off only.  On host the level lands in the simulated GPIO bank so
//! tests can read it back through [`hw_init::gpio_read`].

use crate::drivers::hw_init;

pub struct UvLightDriver {
    pin: i32,
    on: bool,
}

impl UvLightDriver {
    pub fn new(pin: i32) -> Self {
        Self { pin, on: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(self.pin, on);
        self.on = on;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
