use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::Display;

use jzon::JsonValue;

use iopad_netlist::{Design, Net};
use iopad_platform::{
    Attributes, BufferRequest, ConfigurationError, DataRate, LoweredFragment, Pin, PinDirection, PinInput, PinOutput,
    PinPort, PinSignals,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pin: Option<String>,
    field: &'static str,
    reason: String,
}

impl RequestError {
    fn new(pin: Option<&str>, field: &'static str, reason: impl Into<String>) -> Self {
        RequestError { pin: pin.map(str::to_owned), field, reason: reason.into() }
    }
}

impl Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.pin {
            Some(pin) => write!(f, "pin {pin:?}: field {:?} {}", self.field, self.reason),
            None => write!(f, "field {:?} {}", self.field, self.reason),
        }
    }
}

impl Error for RequestError {}

/// Widest pin a request file may declare.
const MAX_WIDTH: usize = 1 << 16;

/// One entry of the `pins` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinEntry {
    pub name: String,
    pub direction: PinDirection,
    pub width: usize,
    pub xdr: u32,
    pub input_clock: Option<String>,
    pub output_clock: Option<String>,
    pub invert: bool,
    pub differential: bool,
    pub attrs: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFile {
    pub platform: Option<String>,
    pub pins: Vec<PinEntry>,
}

fn optional_string(value: &JsonValue, pin: Option<&str>, field: &'static str) -> Result<Option<String>, RequestError> {
    if value.is_null() {
        Ok(None)
    } else {
        match value.as_str() {
            Some(string) => Ok(Some(string.to_owned())),
            None => Err(RequestError::new(pin, field, "must be a string")),
        }
    }
}

fn optional_bool(value: &JsonValue, pin: &str, field: &'static str) -> Result<bool, RequestError> {
    if value.is_null() {
        Ok(false)
    } else {
        value.as_bool().ok_or_else(|| RequestError::new(Some(pin), field, "must be a boolean"))
    }
}

impl PinEntry {
    fn parse(value: &JsonValue) -> Result<PinEntry, RequestError> {
        if !value.is_object() {
            return Err(RequestError::new(None, "pins", "must contain only objects"));
        }
        let Some(name) = optional_string(&value["name"], None, "name")? else {
            return Err(RequestError::new(None, "name", "is required"));
        };
        let pin = Some(name.as_str());
        let direction = match value["dir"].as_str().map(str::parse::<PinDirection>) {
            Some(Ok(direction)) => direction,
            _ => return Err(RequestError::new(pin, "dir", "must be one of \"i\", \"o\", \"oe\", \"io\"")),
        };
        let width = if value["width"].is_null() {
            1
        } else {
            value["width"].as_usize().ok_or_else(|| RequestError::new(pin, "width", "must be a number"))?
        };
        if width > MAX_WIDTH {
            return Err(RequestError::new(pin, "width", format!("must be at most {MAX_WIDTH}")));
        }
        let xdr = if value["xdr"].is_null() {
            0
        } else {
            value["xdr"].as_u32().ok_or_else(|| RequestError::new(pin, "xdr", "must be a number"))?
        };
        let mut attrs = Attributes::new();
        if !value["attrs"].is_null() {
            if !value["attrs"].is_object() {
                return Err(RequestError::new(pin, "attrs", "must be an object"));
            }
            for (key, attr_value) in value["attrs"].entries() {
                let Some(attr_value) = attr_value.as_str() else {
                    return Err(RequestError::new(pin, "attrs", format!("entry {key:?} must be a string")));
                };
                attrs.insert(key.to_owned(), attr_value.to_owned());
            }
        }
        Ok(PinEntry {
            direction,
            width,
            xdr,
            input_clock: optional_string(&value["i_clk"], pin, "i_clk")?,
            output_clock: optional_string(&value["o_clk"], pin, "o_clk")?,
            invert: optional_bool(&value["invert"], &name, "invert")?,
            differential: optional_bool(&value["diff"], &name, "diff")?,
            attrs,
            name,
        })
    }
}

impl PinEntry {
    // Package ports declared for this pin.
    fn port_names(&self) -> Vec<String> {
        if self.differential {
            vec![format!("{}_p", self.name), format!("{}_n", self.name)]
        } else {
            vec![self.name.clone()]
        }
    }

    // Fabric inputs declared for this pin, other than its clocks.
    fn signal_names(&self) -> Vec<String> {
        let mut suffixes = vec![];
        if self.direction.has_output() {
            if self.xdr == 2 {
                suffixes.extend(["o0", "o1"]);
            } else {
                suffixes.push("o");
            }
        }
        if self.direction.has_enable() {
            suffixes.push("oe");
        }
        suffixes.into_iter().map(|suffix| format!("{}_{suffix}", self.name)).collect()
    }
}

// Every port and every fabric input of the design must have a distinct name.
fn check_names(pins: &[PinEntry]) -> Result<(), RequestError> {
    let mut ports = BTreeMap::<String, &str>::new();
    for pin in pins {
        for port in pin.port_names() {
            if let Some(owner) = ports.get(&port) {
                return Err(RequestError::new(
                    Some(&pin.name),
                    "name",
                    format!("collides with port {port:?} of pin {owner:?}"),
                ));
            }
            ports.insert(port, &pin.name);
        }
    }
    let signals = pins.iter().flat_map(PinEntry::signal_names).collect::<BTreeSet<_>>();
    for pin in pins {
        for (field, clock) in [("i_clk", &pin.input_clock), ("o_clk", &pin.output_clock)] {
            if let Some(clock) = clock.as_ref().filter(|clock| signals.contains(*clock)) {
                return Err(RequestError::new(Some(&pin.name), field, format!("collides with signal {clock:?}")));
            }
        }
    }
    Ok(())
}

impl RequestFile {
    pub fn parse(text: &str) -> Result<RequestFile, Box<dyn Error>> {
        let value = jzon::parse(text)?;
        if !value.is_object() {
            return Err(RequestError::new(None, "pins", "must be in a top-level object").into());
        }
        let platform = optional_string(&value["platform"], None, "platform")?;
        if !value["pins"].is_array() {
            return Err(RequestError::new(None, "pins", "must be an array").into());
        }
        let mut names = BTreeSet::new();
        let mut pins = vec![];
        for pin_value in value["pins"].members() {
            let pin = PinEntry::parse(pin_value)?;
            if !names.insert(pin.name.clone()) {
                return Err(RequestError::new(Some(&pin.name), "name", "is used by more than one pin").into());
            }
            pins.push(pin);
        }
        check_names(&pins)?;
        Ok(RequestFile { platform, pins })
    }
}

/// Declares the ports and fabric signals for every pin and assembles the requests to lower.
pub fn build_requests(design: &Design, pins: &[PinEntry]) -> Result<Vec<BufferRequest>, ConfigurationError> {
    let mut clocks = BTreeMap::<String, Net>::new();
    let mut clock = |name: &Option<String>| {
        name.as_ref().map(|name| *clocks.entry(name.clone()).or_insert_with(|| design.add_input(name, 1).unwrap_net()))
    };
    let mut requests = vec![];
    for entry in pins {
        let name = entry.name.as_str();
        let data_rate = DataRate::try_from(entry.xdr)
            .map_err(|()| ConfigurationError::InvalidDataRate(entry.name.clone(), entry.xdr))?;
        let output = match (entry.direction.has_output(), data_rate) {
            (false, _) => None,
            (true, DataRate::Double) => Some(PinOutput::Double(
                design.add_input(format!("{name}_o0"), entry.width),
                design.add_input(format!("{name}_o1"), entry.width),
            )),
            (true, DataRate::Combinational | DataRate::Single) => {
                Some(PinOutput::Single(design.add_input(format!("{name}_o"), entry.width)))
            }
        };
        let output_enable = entry.direction.has_enable().then(|| design.add_input(format!("{name}_oe"), 1).unwrap_net());
        let signals = PinSignals {
            input_clock: clock(&entry.input_clock),
            output_clock: clock(&entry.output_clock),
            output,
            output_enable,
        };
        let pin = Pin::new(name, entry.width, entry.direction, data_rate, signals)?;
        let port = if entry.differential {
            PinPort::Differential(
                design.add_io(format!("{name}_p"), entry.width),
                design.add_io(format!("{name}_n"), entry.width),
            )
        } else {
            PinPort::SingleEnded(design.add_io(name, entry.width))
        };
        requests.push(BufferRequest { pin, port, attrs: entry.attrs.clone(), invert: entry.invert });
    }
    Ok(requests)
}

/// Makes the logical inputs of every pin visible as outputs of the design.
pub fn expose_inputs(design: &Design, fragments: &[LoweredFragment]) {
    for fragment in fragments {
        match &fragment.input {
            None => (),
            Some(PinInput::Single(input)) => design.add_output(format!("{}_i", fragment.pin), input),
            Some(PinInput::Double(input0, input1)) => {
                design.add_output(format!("{}_i0", fragment.pin), input0);
                design.add_output(format!("{}_i1", fragment.pin), input1);
            }
        }
    }
}
