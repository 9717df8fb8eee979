//! Device hardware adapter (ESP-IDF targets only).
//!
//! Bridges real peripherals to the port traits: the contact input with its
//! level interrupt, the indicator LED, the battery ADC, and the climate
//! sensor handed in by the bootstrap. This is the only module that touches
//! esp-idf peripheral APIs on behalf of the core.

use esp_idf_hal::adc::attenuation::DB_11;
use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::adc::ADC1;
use esp_idf_hal::gpio::{Gpio1, Gpio5, Output, PinDriver};
use log::warn;

use crate::app::ports::{
    BatteryAdcPort, ClimateSample, ClimateSensorPort, ContactGpioPort, IndicatorPort,
};
use crate::error::SensorError;
use crate::pins;

/// Oversampling factor for one battery reading.
const BATTERY_OVERSAMPLE: u32 = 8;

/// ISR-side view of the contact line.
///
/// The interrupt callback cannot borrow the task-side adapter, so it goes
/// through the raw GPIO registers with the pin number baked in. Only the
/// three operations the ISR needs are exposed.
pub struct IsrContactGpio;

impl ContactGpioPort for IsrContactGpio {
    fn level(&self) -> bool {
        unsafe { esp_idf_sys::gpio_get_level(pins::CONTACT_GPIO) != 0 }
    }

    fn disable_trigger(&mut self) {
        unsafe {
            esp_idf_sys::gpio_set_intr_type(
                pins::CONTACT_GPIO,
                esp_idf_sys::gpio_int_type_t_GPIO_INTR_DISABLE,
            );
        }
    }

    fn arm_trigger(&mut self, level: bool) {
        let intr_type = if level {
            esp_idf_sys::gpio_int_type_t_GPIO_INTR_HIGH_LEVEL
        } else {
            esp_idf_sys::gpio_int_type_t_GPIO_INTR_LOW_LEVEL
        };
        unsafe {
            esp_idf_sys::gpio_set_intr_type(pins::CONTACT_GPIO, intr_type);
        }
    }
}

/// Task-side hardware adapter: owns the indicator pin and the battery ADC
/// channel (the ADC driver itself stays with the bootstrap, borrowed here),
/// and reads the contact line through the same registers as the ISR view.
pub struct EspHardware<'d, C> {
    indicator: PinDriver<'d, Gpio5, Output>,
    adc: &'d AdcDriver<'d, ADC1>,
    battery_channel: AdcChannelDriver<'d, Gpio1, &'d AdcDriver<'d, ADC1>>,
    climate: C,
}

impl<'d, C: ClimateSensorPort> EspHardware<'d, C> {
    pub fn new(
        indicator: PinDriver<'d, Gpio5, Output>,
        adc: &'d AdcDriver<'d, ADC1>,
        battery_channel: AdcChannelDriver<'d, Gpio1, &'d AdcDriver<'d, ADC1>>,
        climate: C,
    ) -> Self {
        Self {
            indicator,
            adc,
            battery_channel,
            climate,
        }
    }

    /// ADC channel configuration for the battery divider tap.
    pub fn battery_adc_config() -> AdcChannelConfig {
        AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        }
    }
}

impl<C: ClimateSensorPort> IndicatorPort for EspHardware<'_, C> {
    fn set_indicator(&mut self, on: bool) {
        let result = if on {
            self.indicator.set_high()
        } else {
            self.indicator.set_low()
        };
        if let Err(e) = result {
            warn!("indicator write failed: {e}");
        }
    }
}

impl<C: ClimateSensorPort> ContactGpioPort for EspHardware<'_, C> {
    fn level(&self) -> bool {
        IsrContactGpio.level()
    }

    fn disable_trigger(&mut self) {
        IsrContactGpio.disable_trigger();
    }

    fn arm_trigger(&mut self, level: bool) {
        IsrContactGpio.arm_trigger(level);
    }
}

impl<C: ClimateSensorPort> BatteryAdcPort for EspHardware<'_, C> {
    fn read_battery_millivolts(&mut self) -> Result<u16, SensorError> {
        // The oneshot driver powers the converter per conversion; averaging a
        // short burst stands in for hardware oversampling.
        let mut sum: u32 = 0;
        for _ in 0..BATTERY_OVERSAMPLE {
            match self.adc.read(&mut self.battery_channel) {
                Ok(mv) => sum += u32::from(mv),
                Err(e) => {
                    warn!("battery ADC read failed: {e}");
                    return Err(SensorError::AdcFailed);
                }
            }
        }
        Ok((sum / BATTERY_OVERSAMPLE) as u16)
    }
}

impl<C: ClimateSensorPort> ClimateSensorPort for EspHardware<'_, C> {
    fn read_climate(&mut self) -> Result<ClimateSample, SensorError> {
        self.climate.read_climate()
    }
}

