use std::fmt::Debug;

use iopad_netlist::{ControlNet, Design, IoBuffer, IoValue, Value};

use crate::polarity::{invert_input, invert_output};
use crate::{
    Attributes, BufferKind, BufferRequest, ConfigurationError, DataRate, FeatureSupport, LoweredFragment, Pin,
    PinDirection, PinInput, PinOutput, PinPort,
};

/// A device family that knows how to attach pins to its package.
///
/// The provided entry points lower single-ended combinational pins to generic [`IoBuffer`] cells
/// and reject everything else; vendor platforms override [`Platform::feature_support`] together
/// with the entry points for the buffer kinds they implement.
pub trait Platform: Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Get the data rates and attribute support available for a buffer kind.
    fn feature_support(&self, kind: BufferKind) -> FeatureSupport {
        if kind.is_differential() {
            FeatureSupport::UNSUPPORTED
        } else {
            FeatureSupport::COMBINATIONAL
        }
    }

    fn check_feature(
        &self,
        kind: BufferKind,
        pin: &Pin,
        ports: &[&IoValue],
        attrs: &Attributes,
    ) -> Result<(), ConfigurationError> {
        crate::feature::check_feature(self.name(), self.feature_support(kind), kind, pin, ports, attrs)
    }

    fn get_input(
        &self,
        design: &Design,
        pin: &Pin,
        port: &IoValue,
        attrs: &Attributes,
        invert: bool,
    ) -> Result<LoweredFragment, ConfigurationError> {
        self.check_feature(BufferKind::Input, pin, &[port], attrs)?;
        log::debug!("lowering {} input {:?} to generic buffers", self.name(), pin.name());
        let i = design.add_iob(IoBuffer { io: port.clone(), output: Value::undef(pin.width()), enable: ControlNet::ZERO });
        let input = invert_input(design, i.clone(), invert);
        Ok(LoweredFragment {
            pin: pin.name().into(),
            i: Some(i),
            o: None,
            t: None,
            input: Some(PinInput::Single(input)),
            attrs: attrs.clone(),
        })
    }

    fn get_output(
        &self,
        design: &Design,
        pin: &Pin,
        port: &IoValue,
        attrs: &Attributes,
        invert: bool,
    ) -> Result<LoweredFragment, ConfigurationError> {
        self.check_feature(BufferKind::Output, pin, &[port], attrs)?;
        log::debug!("lowering {} output {:?} to generic buffers", self.name(), pin.name());
        let o = invert_output(design, combinational_output(pin).clone(), invert);
        design.add_iob(IoBuffer { io: port.clone(), output: o.clone(), enable: ControlNet::ONE });
        Ok(LoweredFragment { pin: pin.name().into(), i: None, o: Some(o), t: None, input: None, attrs: attrs.clone() })
    }

    fn get_tristate(
        &self,
        design: &Design,
        pin: &Pin,
        port: &IoValue,
        attrs: &Attributes,
        invert: bool,
    ) -> Result<LoweredFragment, ConfigurationError> {
        self.check_feature(BufferKind::Tristate, pin, &[port], attrs)?;
        log::debug!("lowering {} tristate {:?} to generic buffers", self.name(), pin.name());
        let o = invert_output(design, combinational_output(pin).clone(), invert);
        let t = combinational_tristate(pin);
        design.add_iob(IoBuffer { io: port.clone(), output: o.clone(), enable: !t });
        Ok(LoweredFragment { pin: pin.name().into(), i: None, o: Some(o), t: Some(t), input: None, attrs: attrs.clone() })
    }

    fn get_input_output(
        &self,
        design: &Design,
        pin: &Pin,
        port: &IoValue,
        attrs: &Attributes,
        invert: bool,
    ) -> Result<LoweredFragment, ConfigurationError> {
        self.check_feature(BufferKind::InputOutput, pin, &[port], attrs)?;
        log::debug!("lowering {} input/output {:?} to generic buffers", self.name(), pin.name());
        let o = invert_output(design, combinational_output(pin).clone(), invert);
        let t = combinational_tristate(pin);
        let i = design.add_iob(IoBuffer { io: port.clone(), output: o.clone(), enable: !t });
        let input = invert_input(design, i.clone(), invert);
        Ok(LoweredFragment {
            pin: pin.name().into(),
            i: Some(i),
            o: Some(o),
            t: Some(t),
            input: Some(PinInput::Single(input)),
            attrs: attrs.clone(),
        })
    }

    fn get_diff_input(
        &self,
        _design: &Design,
        pin: &Pin,
        _p_port: &IoValue,
        _n_port: &IoValue,
        _attrs: &Attributes,
        _invert: bool,
    ) -> Result<LoweredFragment, ConfigurationError> {
        Err(unsupported(self.name(), BufferKind::DiffInput, pin))
    }

    fn get_diff_output(
        &self,
        _design: &Design,
        pin: &Pin,
        _p_port: &IoValue,
        _n_port: &IoValue,
        _attrs: &Attributes,
        _invert: bool,
    ) -> Result<LoweredFragment, ConfigurationError> {
        Err(unsupported(self.name(), BufferKind::DiffOutput, pin))
    }

    fn get_diff_tristate(
        &self,
        _design: &Design,
        pin: &Pin,
        _p_port: &IoValue,
        _n_port: &IoValue,
        _attrs: &Attributes,
        _invert: bool,
    ) -> Result<LoweredFragment, ConfigurationError> {
        Err(unsupported(self.name(), BufferKind::DiffTristate, pin))
    }

    fn get_diff_input_output(
        &self,
        _design: &Design,
        pin: &Pin,
        _p_port: &IoValue,
        _n_port: &IoValue,
        _attrs: &Attributes,
        _invert: bool,
    ) -> Result<LoweredFragment, ConfigurationError> {
        Err(unsupported(self.name(), BufferKind::DiffInputOutput, pin))
    }

    /// Lower a request through the entry point matching its port kind and pin direction.
    fn lower(&self, design: &Design, request: &BufferRequest) -> Result<LoweredFragment, ConfigurationError> {
        let BufferRequest { pin, port, attrs, invert } = request;
        let invert = *invert;
        match (port, pin.direction()) {
            (PinPort::SingleEnded(port), PinDirection::Input) => self.get_input(design, pin, port, attrs, invert),
            (PinPort::SingleEnded(port), PinDirection::Output) => self.get_output(design, pin, port, attrs, invert),
            (PinPort::SingleEnded(port), PinDirection::OutputEnable) => {
                self.get_tristate(design, pin, port, attrs, invert)
            }
            (PinPort::SingleEnded(port), PinDirection::InputOutput) => {
                self.get_input_output(design, pin, port, attrs, invert)
            }
            (PinPort::Differential(p_port, n_port), PinDirection::Input) => {
                self.get_diff_input(design, pin, p_port, n_port, attrs, invert)
            }
            (PinPort::Differential(p_port, n_port), PinDirection::Output) => {
                self.get_diff_output(design, pin, p_port, n_port, attrs, invert)
            }
            (PinPort::Differential(p_port, n_port), PinDirection::OutputEnable) => {
                self.get_diff_tristate(design, pin, p_port, n_port, attrs, invert)
            }
            (PinPort::Differential(p_port, n_port), PinDirection::InputOutput) => {
                self.get_diff_input_output(design, pin, p_port, n_port, attrs, invert)
            }
        }
    }
}

fn unsupported(platform: &str, kind: BufferKind, pin: &Pin) -> ConfigurationError {
    ConfigurationError::UnsupportedFeature { platform: platform.into(), pin: pin.name().into(), kind }
}

fn combinational_output(pin: &Pin) -> &Value {
    assert_eq!(pin.data_rate(), DataRate::Combinational, "generic buffers cannot register pin {:?}", pin.name());
    match pin.output() {
        Some(PinOutput::Single(output)) => output,
        _ => unreachable!("pin {:?} has no output", pin.name()),
    }
}

// `t` is the complement of the output enable.
fn combinational_tristate(pin: &Pin) -> ControlNet {
    match pin.output_enable() {
        Some(output_enable) => ControlNet::Neg(output_enable),
        None => unreachable!("pin {:?} has no output enable", pin.name()),
    }
}

/// Vendor-neutral platform that only uses generic I/O buffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericPlatform;

impl Platform for GenericPlatform {
    fn name(&self) -> &str {
        "generic"
    }
}

/// Lower every request, in order, into `design`. Stops at the first rejected request.
pub fn lower_pins(
    platform: &dyn Platform,
    design: &Design,
    requests: &[BufferRequest],
) -> Result<Vec<LoweredFragment>, ConfigurationError> {
    let mut fragments = Vec::with_capacity(requests.len());
    for request in requests {
        log::debug!(
            "pin {:?}: {} bits, direction {}, XDR {}",
            request.pin.name(),
            request.pin.width(),
            request.pin.direction(),
            request.pin.data_rate()
        );
        fragments.push(platform.lower(design, request)?);
    }
    Ok(fragments)
}
