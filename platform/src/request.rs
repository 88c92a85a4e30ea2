use std::collections::BTreeMap;

use iopad_netlist::{ControlNet, IoValue, Value};

use crate::{Pin, PinInput};

/// Vendor buffer attributes, such as `IOSTANDARD` or `SLEW`.
pub type Attributes = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinPort {
    SingleEnded(IoValue),
    /// True and complement halves of a differential pair.
    Differential(IoValue, IoValue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferRequest {
    pub pin: Pin,
    pub port: PinPort,
    pub attrs: Attributes,
    pub invert: bool,
}

/// Pad-facing signals of a lowered pin.
///
/// `i` is the value presented by the input buffer, `o` is the value fed to the output buffer,
/// and `t` is active while the output buffer is high-impedance. `input` is the logical input
/// bundle for the fabric. Like any value obtained from a [`iopad_netlist::Design`], these are
/// only meaningful until the design is next applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweredFragment {
    pub pin: String,
    pub i: Option<Value>,
    pub o: Option<Value>,
    pub t: Option<ControlNet>,
    pub input: Option<PinInput>,
    /// Attributes to be emitted as constraints on the pad.
    pub attrs: Attributes,
}
