use std::fmt::Display;

use iopad_netlist::IoValue;

use crate::{Attributes, ConfigurationError, DataRate, Pin, PinDirection};

/// The eight ways a pin can be attached to the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BufferKind {
    Input,
    Output,
    Tristate,
    InputOutput,
    DiffInput,
    DiffOutput,
    DiffTristate,
    DiffInputOutput,
}

impl BufferKind {
    pub fn is_differential(self) -> bool {
        matches!(
            self,
            BufferKind::DiffInput | BufferKind::DiffOutput | BufferKind::DiffTristate | BufferKind::DiffInputOutput
        )
    }

    pub fn direction(self) -> PinDirection {
        match self {
            BufferKind::Input | BufferKind::DiffInput => PinDirection::Input,
            BufferKind::Output | BufferKind::DiffOutput => PinDirection::Output,
            BufferKind::Tristate | BufferKind::DiffTristate => PinDirection::OutputEnable,
            BufferKind::InputOutput | BufferKind::DiffInputOutput => PinDirection::InputOutput,
        }
    }
}

impl Display for BufferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (signaling, direction) = match self {
            BufferKind::Input => ("single-ended", "input"),
            BufferKind::Output => ("single-ended", "output"),
            BufferKind::Tristate => ("single-ended", "tristate"),
            BufferKind::InputOutput => ("single-ended", "input/output"),
            BufferKind::DiffInput => ("differential", "input"),
            BufferKind::DiffOutput => ("differential", "output"),
            BufferKind::DiffTristate => ("differential", "tristate"),
            BufferKind::DiffInputOutput => ("differential", "input/output"),
        };
        write!(f, "{signaling} {direction}")
    }
}

/// What a platform can do with one buffer kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSupport {
    pub data_rates: &'static [DataRate],
    pub attributes: bool,
}

impl FeatureSupport {
    pub const UNSUPPORTED: FeatureSupport = FeatureSupport { data_rates: &[], attributes: false };

    pub const COMBINATIONAL: FeatureSupport =
        FeatureSupport { data_rates: &[DataRate::Combinational], attributes: false };

    pub fn is_supported(&self) -> bool {
        !self.data_rates.is_empty()
    }
}

/// Validates a request against `support`, before anything is added to the design.
pub fn check_feature(
    platform: &str,
    support: FeatureSupport,
    kind: BufferKind,
    pin: &Pin,
    ports: &[&IoValue],
    attrs: &Attributes,
) -> Result<(), ConfigurationError> {
    if !support.is_supported() {
        return Err(ConfigurationError::UnsupportedFeature { platform: platform.into(), pin: pin.name().into(), kind });
    }
    if !support.data_rates.contains(&pin.data_rate()) {
        return Err(ConfigurationError::UnsupportedDataRate {
            platform: platform.into(),
            pin: pin.name().into(),
            kind,
            data_rate: pin.data_rate(),
        });
    }
    if !attrs.is_empty() && !support.attributes {
        return Err(ConfigurationError::UnsupportedAttributes {
            platform: platform.into(),
            pin: pin.name().into(),
            kind,
        });
    }
    if pin.direction() != kind.direction() {
        return Err(ConfigurationError::DirectionMismatch {
            pin: pin.name().into(),
            kind,
            direction: pin.direction(),
        });
    }
    assert_eq!(ports.len(), if kind.is_differential() { 2 } else { 1 });
    if let [p_port, n_port] = ports {
        if p_port.len() != n_port.len() {
            return Err(ConfigurationError::DifferentialWidthMismatch {
                pin: pin.name().into(),
                p_width: p_port.len(),
                n_width: n_port.len(),
            });
        }
    }
    for port in ports {
        if port.len() != pin.width() {
            return Err(ConfigurationError::PortWidthMismatch {
                pin: pin.name().into(),
                expected: pin.width(),
                found: port.len(),
            });
        }
    }
    Ok(())
}
