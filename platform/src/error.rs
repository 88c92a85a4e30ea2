use std::error::Error;
use std::fmt::Display;

use crate::{BufferKind, DataRate, PinDirection};

/// A pin request that cannot be lowered as described. Always reported before any cell is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    UnsupportedFeature { platform: String, pin: String, kind: BufferKind },
    UnsupportedDataRate { platform: String, pin: String, kind: BufferKind, data_rate: DataRate },
    UnsupportedAttributes { platform: String, pin: String, kind: BufferKind },
    DirectionMismatch { pin: String, kind: BufferKind, direction: PinDirection },
    InvalidWidth(String),
    InvalidDataRate(String, u32),
    PortWidthMismatch { pin: String, expected: usize, found: usize },
    DifferentialWidthMismatch { pin: String, p_width: usize, n_width: usize },
    MissingSignal { pin: String, signal: &'static str },
    UnexpectedSignal { pin: String, signal: &'static str },
    SignalWidthMismatch { pin: String, signal: &'static str, expected: usize, found: usize },
}

impl ConfigurationError {
    pub fn pin(&self) -> &str {
        match self {
            ConfigurationError::UnsupportedFeature { pin, .. }
            | ConfigurationError::UnsupportedDataRate { pin, .. }
            | ConfigurationError::UnsupportedAttributes { pin, .. }
            | ConfigurationError::DirectionMismatch { pin, .. }
            | ConfigurationError::InvalidWidth(pin)
            | ConfigurationError::InvalidDataRate(pin, _)
            | ConfigurationError::PortWidthMismatch { pin, .. }
            | ConfigurationError::DifferentialWidthMismatch { pin, .. }
            | ConfigurationError::MissingSignal { pin, .. }
            | ConfigurationError::UnexpectedSignal { pin, .. }
            | ConfigurationError::SignalWidthMismatch { pin, .. } => pin,
        }
    }
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::UnsupportedFeature { platform, pin, kind } => {
                write!(f, "platform {platform:?} does not support {kind} (pin {pin:?})")
            }
            ConfigurationError::UnsupportedDataRate { platform, pin, kind, data_rate } => {
                write!(f, "platform {platform:?} does not support {kind} for XDR {data_rate} (pin {pin:?})")
            }
            ConfigurationError::UnsupportedAttributes { platform, pin, kind } => {
                write!(f, "platform {platform:?} does not support attributes for {kind} (pin {pin:?})")
            }
            ConfigurationError::DirectionMismatch { pin, kind, direction } => {
                write!(f, "pin {pin:?} has direction \"{direction}\" and cannot use a {kind} buffer")
            }
            ConfigurationError::InvalidWidth(pin) => write!(f, "pin {pin:?} must be at least one bit wide"),
            ConfigurationError::InvalidDataRate(pin, xdr) => write!(f, "pin {pin:?} has invalid XDR {xdr}"),
            ConfigurationError::PortWidthMismatch { pin, expected, found } => {
                write!(f, "port of pin {pin:?} is {found} bits wide, expected {expected}")
            }
            ConfigurationError::DifferentialWidthMismatch { pin, p_width, n_width } => {
                write!(f, "differential port of pin {pin:?} has {p_width} true and {n_width} complement bits")
            }
            ConfigurationError::MissingSignal { pin, signal } => write!(f, "pin {pin:?} requires signal {signal:?}"),
            ConfigurationError::UnexpectedSignal { pin, signal } => {
                write!(f, "pin {pin:?} does not accept signal {signal:?}")
            }
            ConfigurationError::SignalWidthMismatch { pin, signal, expected, found } => {
                write!(f, "signal {signal:?} of pin {pin:?} is {found} bits wide, expected {expected}")
            }
        }
    }
}

impl Error for ConfigurationError {}
