use std::fmt::Display;
use std::str::FromStr;

use iopad_netlist::{Net, Value};

use crate::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PinDirection {
    Input,
    Output,
    /// Output with a separate enable; the pad is high-impedance while the enable is low.
    OutputEnable,
    InputOutput,
}

impl PinDirection {
    pub fn has_input(self) -> bool {
        matches!(self, PinDirection::Input | PinDirection::InputOutput)
    }

    pub fn has_output(self) -> bool {
        matches!(self, PinDirection::Output | PinDirection::OutputEnable | PinDirection::InputOutput)
    }

    pub fn has_enable(self) -> bool {
        matches!(self, PinDirection::OutputEnable | PinDirection::InputOutput)
    }
}

impl FromStr for PinDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "i" => Ok(PinDirection::Input),
            "o" => Ok(PinDirection::Output),
            "oe" => Ok(PinDirection::OutputEnable),
            "io" => Ok(PinDirection::InputOutput),
            _ => Err(()),
        }
    }
}

impl Display for PinDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PinDirection::Input => write!(f, "i"),
            PinDirection::Output => write!(f, "o"),
            PinDirection::OutputEnable => write!(f, "oe"),
            PinDirection::InputOutput => write!(f, "io"),
        }
    }
}

/// Number of register stages between the pad and the fabric, also known as XDR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataRate {
    Combinational = 0,
    Single = 1,
    Double = 2,
}

impl DataRate {
    pub fn is_registered(self) -> bool {
        self != DataRate::Combinational
    }
}

impl TryFrom<u32> for DataRate {
    type Error = ();

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DataRate::Combinational),
            1 => Ok(DataRate::Single),
            2 => Ok(DataRate::Double),
            _ => Err(()),
        }
    }
}

impl Display for DataRate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", *self as u32)
    }
}

/// Output data supplied by the fabric.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PinOutput {
    Single(Value),
    /// Phases driven after the rising and the falling edge of the output clock, respectively.
    Double(Value, Value),
}

/// Input data made available to the fabric.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PinInput {
    Single(Value),
    /// Phases sampled at the rising and the falling edge of the input clock, presented together
    /// after the rising edge.
    Double(Value, Value),
}

impl PinInput {
    pub fn map(self, mut f: impl FnMut(Value) -> Value) -> PinInput {
        match self {
            PinInput::Single(value) => PinInput::Single(f(value)),
            PinInput::Double(value0, value1) => PinInput::Double(f(value0), f(value1)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinSignals {
    pub input_clock: Option<Net>,
    pub output_clock: Option<Net>,
    pub output: Option<PinOutput>,
    pub output_enable: Option<Net>,
}

/// Logical pin as seen by the fabric. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    name: String,
    width: usize,
    direction: PinDirection,
    data_rate: DataRate,
    signals: PinSignals,
}

impl Pin {
    pub fn new(
        name: impl Into<String>,
        width: usize,
        direction: PinDirection,
        data_rate: DataRate,
        signals: PinSignals,
    ) -> Result<Pin, ConfigurationError> {
        let name = name.into();
        if width == 0 {
            return Err(ConfigurationError::InvalidWidth(name));
        }

        let expect = |signal: &'static str, required: bool, present: bool| match (required, present) {
            (true, false) => Err(ConfigurationError::MissingSignal { pin: name.clone(), signal }),
            (false, true) => Err(ConfigurationError::UnexpectedSignal { pin: name.clone(), signal }),
            _ => Ok(()),
        };
        let registered = data_rate.is_registered();
        expect("i_clk", direction.has_input() && registered, signals.input_clock.is_some())?;
        expect("o_clk", direction.has_output() && registered, signals.output_clock.is_some())?;
        expect("oe", direction.has_enable(), signals.output_enable.is_some())?;

        let check_width = |signal: &'static str, value: &Value| {
            if value.len() == width {
                Ok(())
            } else {
                Err(ConfigurationError::SignalWidthMismatch {
                    pin: name.clone(),
                    signal,
                    expected: width,
                    found: value.len(),
                })
            }
        };
        match (&signals.output, direction.has_output(), data_rate) {
            (None, false, _) => (),
            (None, true, DataRate::Double) => expect("o0", true, false)?,
            (None, true, _) => expect("o", true, false)?,
            (Some(_), false, _) => expect("o", false, true)?,
            (Some(PinOutput::Single(_)), true, DataRate::Double) => expect("o", false, true)?,
            (Some(PinOutput::Double(..)), true, DataRate::Combinational | DataRate::Single) => {
                expect("o0", false, true)?
            }
            (Some(PinOutput::Single(output)), true, _) => check_width("o", output)?,
            (Some(PinOutput::Double(output0, output1)), true, DataRate::Double) => {
                check_width("o0", output0)?;
                check_width("o1", output1)?;
            }
        }

        Ok(Pin { name, width, direction, data_rate, signals })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn direction(&self) -> PinDirection {
        self.direction
    }

    pub fn data_rate(&self) -> DataRate {
        self.data_rate
    }

    pub fn input_clock(&self) -> Option<Net> {
        self.signals.input_clock
    }

    pub fn output_clock(&self) -> Option<Net> {
        self.signals.output_clock
    }

    pub fn output(&self) -> Option<&PinOutput> {
        self.signals.output.as_ref()
    }

    pub fn output_enable(&self) -> Option<Net> {
        self.signals.output_enable
    }
}
