//! Indicator adapter over any `embedded-hal` output pin.
//!
//! Keeps the core independent of the GPIO backend: the device build wraps
//! an esp-idf pin driver, the bench build can wrap anything that implements
//! [`OutputPin`].

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::IndicatorPort;

/// [`IndicatorPort`] over a single output pin.
pub struct IndicatorPin<P: OutputPin> {
    pin: P,
    active_low: bool,
}

impl<P: OutputPin> IndicatorPin<P> {
    /// LED wired active-high (pin high = LED on).
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }

    /// LED wired active-low (pin low = LED on).
    pub fn active_low(pin: P) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }
}

impl<P: OutputPin> IndicatorPort for IndicatorPin<P> {
    fn set_indicator(&mut self, on: bool) {
        let high = on != self.active_low;
        let result = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if let Err(e) = result {
            warn!("indicator pin write failed: {e:?}");
        }
    }
}
