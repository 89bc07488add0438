//! Named hardware channels.
//!
//! Single source of truth for the LED outputs, pumps and AS7341 sensor
//! channels recognised by the control application. Each table is exposed
//! both as a plain name slice (for iteration and validation of external
//! input) and as a typed enum whose discriminant is the position in that
//! slice.
//!
//! Order is significant for [`LED_OUTPUTS`] and [`AS7341_ADCS`]: the index
//! of a name is its physical channel index.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;
use thiserror::Error;

/// A channel name that is not part of the expected table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {name:?}")]
pub struct UnknownChannel {
    /// Table the name was checked against.
    pub kind: &'static str,
    /// The rejected name.
    pub name: String,
}

macro_rules! channel_enum {
    (
        $(#[$emeta:meta])*
        pub enum $name:ident;
        $(#[$tmeta:meta])*
        pub const $table:ident;
        kind = $kind:literal;
        $( $variant:ident => $label:literal ),+ $(,)?
    ) => {
        $(#[$emeta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        $(#[$tmeta])*
        pub const $table: &[&str] = &[$($label),+];

        impl $name {
            /// Every channel, in table order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical channel name.
            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Position in the name table.
            pub const fn index(self) -> usize {
                self as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = UnknownChannel;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    _ => Err(UnknownChannel {
                        kind: $kind,
                        name: s.to_string(),
                    }),
                }
            }
        }
    };
}

// ─── LED outputs ────────────────────────────────────────────────────

channel_enum! {
    /// LED output of a reactor module.
    pub enum LedOutput;
    /// LED output names, ordered by physical channel index.
    pub const LED_OUTPUTS;
    kind = "LED output";
    LedA => "LEDA",
    LedB => "LEDB",
    LedC => "LEDC",
    LedD => "LEDD",
    LedE => "LEDE",
    LedF => "LEDF",
    LedG => "LEDG",
    LedH => "LEDH",
    LedI => "LEDI",
    LedV => "LEDV",
}

/// Number of LED outputs driven directly by the PWM controller.
pub const PWM_LED_COUNT: usize = 7;

/// LED outputs driven directly by the PWM controller (`LEDA`..`LEDG`).
pub const PWM_LED_OUTPUTS: &[&str] = LED_OUTPUTS.split_at(PWM_LED_COUNT).0;

/// Virtual / composite LED outputs with no dedicated PWM channel.
pub const VIRTUAL_LED_OUTPUTS: &[&str] = LED_OUTPUTS.split_at(PWM_LED_COUNT).1;

/// Name of the laser output present on modules fitted with one.
pub const LASER_OUTPUT: &str = "LASER650";

/// LED outputs extended with the laser channel.
pub const LED_OUTPUTS_WITH_LASER: &[&str] = &[
    "LEDA",
    "LEDB",
    "LEDC",
    "LEDD",
    "LEDE",
    "LEDF",
    "LEDG",
    "LEDH",
    "LEDI",
    "LEDV",
    LASER_OUTPUT,
];

impl LedOutput {
    /// True when the output maps to its own PWM channel.
    pub const fn is_pwm_driven(self) -> bool {
        self.index() < PWM_LED_COUNT
    }

    /// True for composite outputs.
    pub const fn is_virtual(self) -> bool {
        !self.is_pwm_driven()
    }
}

// ─── Pumps ──────────────────────────────────────────────────────────

channel_enum! {
    /// Peristaltic pump attached to a reactor module.
    pub enum Pump;
    /// Pump names.
    pub const PUMPS;
    kind = "pump";
    Pump1 => "Pump1",
    Pump2 => "Pump2",
    Pump3 => "Pump3",
    Pump4 => "Pump4",
}

// ─── AS7341 spectral sensor ─────────────────────────────────────────

channel_enum! {
    /// AS7341 spectral sensor channel.
    pub enum SpectralChannel;
    /// AS7341 channel names. The first [`SPECTRUM_BAND_COUNT`] entries form
    /// the spectrum bands.
    pub const AS7341_CHANNELS;
    kind = "AS7341 channel";
    Nm410 => "nm410",
    Nm440 => "nm440",
    Nm470 => "nm470",
    Nm510 => "nm510",
    Nm550 => "nm550",
    Nm583 => "nm583",
    Nm620 => "nm620",
    Nm670 => "nm670",
    Clear => "CLEAR",
    Nir => "NIR",
    Dark => "DARK",
    ExtGpio => "ExtGPIO",
    ExtInt => "ExtINT",
    Flicker => "FLICKER",
}

/// Number of AS7341 channels that make up the measured spectrum.
pub const SPECTRUM_BAND_COUNT: usize = 9;

/// AS7341 spectrum bands (`nm410`..`CLEAR`).
pub const AS7341_SPECTRUM_BANDS: &[&str] = AS7341_CHANNELS.split_at(SPECTRUM_BAND_COUNT).0;

impl SpectralChannel {
    /// True for channels that belong to the measured spectrum.
    pub const fn is_spectrum_band(self) -> bool {
        self.index() < SPECTRUM_BAND_COUNT
    }
}

channel_enum! {
    /// AS7341 analog-to-digital converter.
    pub enum AdcChannel;
    /// AS7341 ADC names, ordered by physical channel index.
    pub const AS7341_ADCS;
    kind = "AS7341 ADC";
    Adc0 => "ADC0",
    Adc1 => "ADC1",
    Adc2 => "ADC2",
    Adc3 => "ADC3",
    Adc4 => "ADC4",
    Adc5 => "ADC5",
}

const_assert_eq!(LED_OUTPUTS.len(), 10);
const_assert_eq!(LED_OUTPUTS_WITH_LASER.len(), LED_OUTPUTS.len() + 1);
const_assert_eq!(PUMPS.len(), 4);
const_assert_eq!(AS7341_CHANNELS.len(), 14);
const_assert_eq!(AS7341_ADCS.len(), 6);

// ─── Validation helpers ─────────────────────────────────────────────

/// True if `name` is a recognised LED output (laser excluded).
pub fn is_known_led(name: &str) -> bool {
    LED_OUTPUTS.contains(&name)
}

/// True if `name` is a recognised LED output or the laser.
pub fn is_known_led_with_laser(name: &str) -> bool {
    LED_OUTPUTS_WITH_LASER.contains(&name)
}

/// True if `name` is a recognised pump.
pub fn is_known_pump(name: &str) -> bool {
    PUMPS.contains(&name)
}

/// True if `name` is a recognised AS7341 channel.
pub fn is_known_spectral_channel(name: &str) -> bool {
    AS7341_CHANNELS.contains(&name)
}

/// True if `name` is a recognised AS7341 ADC.
pub fn is_known_adc(name: &str) -> bool {
    AS7341_ADCS.contains(&name)
}
