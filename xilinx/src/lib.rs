//! This library covers the I/O tiles of the Xilinx 7-series FPGA families (Spartan-7, Artix-7,
//! Kintex-7, Virtex-7, and the Zynq-7000 programmable logic).
use std::sync::Arc;

use iopad_netlist::{Const, ControlNet, Design, Instance, IoValue, Net, Value};
use iopad_platform::{
    invert_input, invert_output, register_platform, Attributes, BufferKind, ConfigurationError, DataRate,
    FeatureSupport, LoweredFragment, Pin, PinInput, PinOutput, Platform,
};

#[derive(Debug, Default)]
pub struct Xilinx7SeriesPlatform;

impl Xilinx7SeriesPlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Xilinx7SeriesPlatform)
    }
}

pub fn register() {
    register_platform("xilinx_7series", |options| {
        if let Some(name) = options.keys().next() {
            return Err(format!("Xilinx 7-series platform has no option {name:?}").into());
        }
        Ok(Xilinx7SeriesPlatform::new() as Arc<dyn Platform>)
    });
}

// Registers of the I/O tile, one instance per bit. They are all clocked on the rising edge, never
// reset, and always enabled.

fn get_dff(design: &Design, clock: Net, data: &Value) -> Value {
    Value::from_iter(data.iter().map(|net| {
        let mut fdce = Instance::new("FDCE");
        // Without DONT_TOUCH, the flip-flop may be optimized into a form that cannot be packed
        // into the I/O tile.
        fdce.add_attr("IOB", "TRUE");
        fdce.add_attr("DONT_TOUCH", "TRUE");
        fdce.add_input("C", clock);
        fdce.add_input("CE", Net::ONE);
        fdce.add_input("CLR", Net::ZERO);
        fdce.add_input("D", net);
        let q = fdce.add_output("Q", 1);
        log::trace!("adding FDCE for {net:?}");
        design.add_other(fdce)[q.start]
    }))
}

fn get_iddr(design: &Design, clock: Net, data: &Value) -> (Value, Value) {
    let (mut q1_nets, mut q2_nets) = (vec![], vec![]);
    for net in data {
        let mut iddr = Instance::new("IDDR");
        iddr.add_param("DDR_CLK_EDGE", "SAME_EDGE_PIPELINED");
        iddr.add_param("SRTYPE", "ASYNC");
        iddr.add_param("INIT_Q1", Const::zero(1));
        iddr.add_param("INIT_Q2", Const::zero(1));
        iddr.add_input("C", clock);
        iddr.add_input("CE", Net::ONE);
        iddr.add_input("S", Net::ZERO);
        iddr.add_input("R", Net::ZERO);
        iddr.add_input("D", net);
        let q1 = iddr.add_output("Q1", 1);
        let q2 = iddr.add_output("Q2", 1);
        log::trace!("adding IDDR for {net:?}");
        let output = design.add_other(iddr);
        q1_nets.push(output[q1.start]);
        q2_nets.push(output[q2.start]);
    }
    (Value::from(q1_nets), Value::from(q2_nets))
}

fn get_oddr(design: &Design, clock: Net, data1: &Value, data2: &Value) -> Value {
    assert_eq!(data1.len(), data2.len());
    Value::from_iter(data1.iter().zip(data2.iter()).map(|(net1, net2)| {
        let mut oddr = Instance::new("ODDR");
        oddr.add_param("DDR_CLK_EDGE", "SAME_EDGE");
        oddr.add_param("SRTYPE", "ASYNC");
        oddr.add_param("INIT", Const::zero(1));
        oddr.add_input("C", clock);
        oddr.add_input("CE", Net::ONE);
        oddr.add_input("S", Net::ZERO);
        oddr.add_input("R", Net::ZERO);
        oddr.add_input("D1", net1);
        oddr.add_input("D2", net2);
        let q = oddr.add_output("Q", 1);
        log::trace!("adding ODDR for {net1:?}, {net2:?}");
        design.add_other(oddr)[q.start]
    }))
}

/// Pad-facing side of the register stage.
#[derive(Debug, Default)]
struct XdrBuffer {
    /// Placeholder for the input buffer outputs.
    i: Option<Value>,
    o: Option<Value>,
    /// Active high: the output buffer is disabled while `t` is set.
    t: Option<Net>,
    input: Option<PinInput>,
}

fn get_xdr_buffer(design: &Design, pin: &Pin, i_invert: bool, o_invert: bool) -> XdrBuffer {
    let direction = pin.direction();
    let input_clock = || match pin.input_clock() {
        Some(clock) => clock,
        None => unreachable!("registered input pin {:?} has no input clock", pin.name()),
    };
    let output_clock = || match pin.output_clock() {
        Some(clock) => clock,
        None => unreachable!("registered output pin {:?} has no output clock", pin.name()),
    };

    let mut xdr = XdrBuffer::default();
    if direction.has_input() {
        let raw = design.add_void(pin.width());
        let input = match pin.data_rate() {
            DataRate::Combinational => PinInput::Single(invert_input(design, raw.clone(), i_invert)),
            DataRate::Single => {
                let q = get_dff(design, input_clock(), &raw);
                PinInput::Single(invert_input(design, q, i_invert))
            }
            DataRate::Double => {
                let (q1, q2) = get_iddr(design, input_clock(), &raw);
                PinInput::Double(invert_input(design, q1, i_invert), invert_input(design, q2, i_invert))
            }
        };
        xdr.i = Some(raw);
        xdr.input = Some(input);
    }
    if direction.has_output() {
        let o = match (pin.data_rate(), pin.output()) {
            (DataRate::Combinational, Some(PinOutput::Single(output))) => {
                invert_output(design, output.clone(), o_invert)
            }
            (DataRate::Single, Some(PinOutput::Single(output))) => {
                let d = invert_output(design, output.clone(), o_invert);
                get_dff(design, output_clock(), &d)
            }
            (DataRate::Double, Some(PinOutput::Double(output0, output1))) => {
                let d1 = invert_output(design, output0.clone(), o_invert);
                let d2 = invert_output(design, output1.clone(), o_invert);
                get_oddr(design, output_clock(), &d1, &d2)
            }
            (data_rate, output) => {
                unreachable!("pin {:?} has output {output:?} at XDR {data_rate}", pin.name())
            }
        };
        xdr.o = Some(o);
    }
    if direction.has_enable() {
        let Some(output_enable) = pin.output_enable() else {
            unreachable!("pin {:?} has no output enable", pin.name())
        };
        let t = design.add_not(output_enable);
        let t = match pin.data_rate() {
            DataRate::Combinational => t,
            // The enable uses a single-edge register even when the data uses a DDR register.
            DataRate::Single | DataRate::Double => get_dff(design, output_clock(), &t),
        };
        xdr.t = Some(t.unwrap_net());
    }
    xdr
}

impl Xilinx7SeriesPlatform {
    // Pad-facing port names of each buffer primitive, in the order the ports are passed in.
    fn buffer_primitive(kind: BufferKind) -> (&'static str, &'static [&'static str]) {
        match kind {
            BufferKind::Input => ("IBUF", &["I"]),
            BufferKind::Output => ("OBUF", &["O"]),
            BufferKind::Tristate => ("OBUFT", &["O"]),
            BufferKind::InputOutput => ("IOBUF", &["IO"]),
            BufferKind::DiffInput => ("IBUFDS", &["I", "IB"]),
            BufferKind::DiffOutput => ("OBUFDS", &["O", "OB"]),
            BufferKind::DiffTristate => ("OBUFTDS", &["O", "OB"]),
            BufferKind::DiffInputOutput => ("IOBUFDS", &["IO", "IOB"]),
        }
    }

    fn get_buffer(
        &self,
        design: &Design,
        kind: BufferKind,
        pin: &Pin,
        ports: &[&IoValue],
        attrs: &Attributes,
        invert: bool,
    ) -> Result<LoweredFragment, ConfigurationError> {
        self.check_feature(kind, pin, ports, attrs)?;
        log::debug!("lowering {kind} pin {:?} at XDR {}", pin.name(), pin.data_rate());

        let direction = pin.direction();
        let xdr = get_xdr_buffer(design, pin, invert && direction.has_input(), invert && direction.has_output());

        let (primitive, io_names) = Self::buffer_primitive(kind);
        let mut i_nets = vec![];
        for bit in 0..pin.width() {
            let mut buffer = Instance::new(primitive);
            if let Some(t) = xdr.t {
                buffer.add_input("T", t);
            }
            if let Some(o) = &xdr.o {
                buffer.add_input("I", o[bit]);
            }
            for (name, port) in io_names.iter().zip(ports) {
                buffer.add_io(*name, port[bit]);
            }
            let i_range = xdr.i.as_ref().map(|_| buffer.add_output("O", 1));
            log::trace!("adding {primitive} for bit {bit} of {:?}", pin.name());
            let output = design.add_other(buffer);
            if let Some(i_range) = i_range {
                i_nets.push(output[i_range.start]);
            }
        }

        let (i, input) = match xdr.i {
            Some(raw) => {
                let i = Value::from(i_nets);
                design.replace_value(&raw, &i);
                // An unregistered, uninverted input is the placeholder itself.
                let input = xdr.input.map(|input| input.map(|value| if value == raw { i.clone() } else { value }));
                (Some(i), input)
            }
            None => (None, None),
        };
        Ok(LoweredFragment {
            pin: pin.name().into(),
            i,
            o: xdr.o,
            t: xdr.t.map(ControlNet::Pos),
            input,
            attrs: attrs.clone(),
        })
    }
}

const ALL_DATA_RATES: FeatureSupport =
    FeatureSupport { data_rates: &[DataRate::Combinational, DataRate::Single, DataRate::Double], attributes: true };

impl Platform for Xilinx7SeriesPlatform {
    fn name(&self) -> &str {
        "xilinx_7series"
    }

    fn feature_support(&self, _kind: BufferKind) -> FeatureSupport {
        ALL_DATA_RATES
    }

    fn get_input(
        &self,
        design: &Design,
        pin: &Pin,
        port: &IoValue,
        attrs: &Attributes,
        invert: bool,
    ) -> Result<LoweredFragment, ConfigurationError> {
        self.get_buffer(design, BufferKind::Input, pin, &[port], attrs, invert)
    }

    fn get_output(
        &self,
        design: &Design,
        pin: &Pin,
        port: &IoValue,
        attrs: &Attributes,
        invert: bool,
    ) -> Result<LoweredFragment, ConfigurationError> {
        self.get_buffer(design, BufferKind::Output, pin, &[port], attrs, invert)
    }

    fn get_tristate(
        &self,
        design: &Design,
        pin: &Pin,
        port: &IoValue,
        attrs: &Attributes,
        invert: bool,
    ) -> Result<LoweredFragment, ConfigurationError> {
        self.get_buffer(design, BufferKind::Tristate, pin, &[port], attrs, invert)
    }

    fn get_input_output(
        &self,
        design: &Design,
        pin: &Pin,
        port: &IoValue,
        attrs: &Attributes,
        invert: bool,
    ) -> Result<LoweredFragment, ConfigurationError> {
        self.get_buffer(design, BufferKind::InputOutput, pin, &[port], attrs, invert)
    }

    fn get_diff_input(
        &self,
        design: &Design,
        pin: &Pin,
        p_port: &IoValue,
        n_port: &IoValue,
        attrs: &Attributes,
        invert: bool,
    ) -> Result<LoweredFragment, ConfigurationError> {
        self.get_buffer(design, BufferKind::DiffInput, pin, &[p_port, n_port], attrs, invert)
    }

    fn get_diff_output(
        &self,
        design: &Design,
        pin: &Pin,
        p_port: &IoValue,
        n_port: &IoValue,
        attrs: &Attributes,
        invert: bool,
    ) -> Result<LoweredFragment, ConfigurationError> {
        self.get_buffer(design, BufferKind::DiffOutput, pin, &[p_port, n_port], attrs, invert)
    }

    fn get_diff_tristate(
        &self,
        design: &Design,
        pin: &Pin,
        p_port: &IoValue,
        n_port: &IoValue,
        attrs: &Attributes,
        invert: bool,
    ) -> Result<LoweredFragment, ConfigurationError> {
        self.get_buffer(design, BufferKind::DiffTristate, pin, &[p_port, n_port], attrs, invert)
    }

    fn get_diff_input_output(
        &self,
        design: &Design,
        pin: &Pin,
        p_port: &IoValue,
        n_port: &IoValue,
        attrs: &Attributes,
        invert: bool,
    ) -> Result<LoweredFragment, ConfigurationError> {
        self.get_buffer(design, BufferKind::DiffInputOutput, pin, &[p_port, n_port], attrs, invert)
    }
}
