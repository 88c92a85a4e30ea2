use std::collections::BTreeMap;

use iopad_netlist::{CellRepr, Design};
use iopad_platform::{
    create_platform, lower_pins, Attributes, BufferRequest, ConfigurationError, DataRate, LoweredFragment, Pin,
    PinDirection, PinInput, PinOutput, PinPort, PinSignals, Platform,
};
use iopad_xilinx::Xilinx7SeriesPlatform;

const DIRECTIONS: [PinDirection; 4] =
    [PinDirection::Input, PinDirection::Output, PinDirection::OutputEnable, PinDirection::InputOutput];
const DATA_RATES: [DataRate; 3] = [DataRate::Combinational, DataRate::Single, DataRate::Double];

fn make_pin(design: &Design, name: &str, width: usize, direction: PinDirection, data_rate: DataRate) -> Pin {
    let clock = data_rate.is_registered().then(|| design.add_input("clk", 1).unwrap_net());
    let output = direction.has_output().then(|| match data_rate {
        DataRate::Double => PinOutput::Double(
            design.add_input(format!("{name}_o0"), width),
            design.add_input(format!("{name}_o1"), width),
        ),
        DataRate::Combinational | DataRate::Single => PinOutput::Single(design.add_input(format!("{name}_o"), width)),
    });
    let output_enable = direction.has_enable().then(|| design.add_input(format!("{name}_oe"), 1).unwrap_net());
    let signals = PinSignals {
        input_clock: clock.filter(|_| direction.has_input()),
        output_clock: clock.filter(|_| direction.has_output()),
        output,
        output_enable,
    };
    Pin::new(name, width, direction, data_rate, signals).unwrap()
}

fn expose_input(design: &Design, fragment: &LoweredFragment) {
    match &fragment.input {
        None => (),
        Some(PinInput::Single(input)) => design.add_output(format!("{}_i", fragment.pin), input),
        Some(PinInput::Double(input0, input1)) => {
            design.add_output(format!("{}_i0", fragment.pin), input0);
            design.add_output(format!("{}_i1", fragment.pin), input1);
        }
    }
}

fn single_ended(design: &Design, pin: Pin, invert: bool) -> BufferRequest {
    let port = design.add_io(pin.name(), pin.width());
    BufferRequest { pin, port: PinPort::SingleEnded(port), attrs: Attributes::new(), invert }
}

fn differential(design: &Design, pin: Pin, invert: bool) -> BufferRequest {
    let p_port = design.add_io(format!("{}_p", pin.name()), pin.width());
    let n_port = design.add_io(format!("{}_n", pin.name()), pin.width());
    BufferRequest { pin, port: PinPort::Differential(p_port, n_port), attrs: Attributes::new(), invert }
}

fn count(design: &Design, class: &str) -> usize {
    design.statistics().get(class).copied().unwrap_or(0)
}

#[test]
fn test_scenario_a() {
    let _ = env_logger::try_init();
    let mut design = Design::new();
    let pin = make_pin(&design, "btn", 4, PinDirection::Input, DataRate::Combinational);
    let request = single_ended(&design, pin, false);
    let fragment = Xilinx7SeriesPlatform.lower(&design, &request).unwrap();
    assert_eq!(fragment.input, Some(PinInput::Single(fragment.i.clone().unwrap())));
    expose_input(&design, &fragment);
    design.apply();
    assert_eq!(count(&design, "IBUF"), 4);
    assert_eq!(count(&design, "FDCE") + count(&design, "IDDR"), 0);
    assert_eq!(count(&design, "not"), 0);
    assert_eq!(
        format!("{design}"),
        concat!(
            "&\"btn\":4\n",
            "%0:_ = \"IBUF\" {\n",
            "  %0:1 = output \"O\"\n",
            "  io \"I\" = &\"btn\"+0\n",
            "}\n",
            "%1:_ = \"IBUF\" {\n",
            "  %1:1 = output \"O\"\n",
            "  io \"I\" = &\"btn\"+1\n",
            "}\n",
            "%2:_ = \"IBUF\" {\n",
            "  %2:1 = output \"O\"\n",
            "  io \"I\" = &\"btn\"+2\n",
            "}\n",
            "%3:_ = \"IBUF\" {\n",
            "  %3:1 = output \"O\"\n",
            "  io \"I\" = &\"btn\"+3\n",
            "}\n",
            "%4:0 = output \"btn_i\" [ %3 %2 %1 %0 ]\n",
        )
    );
}

#[test]
fn test_scenario_b() {
    let _ = env_logger::try_init();
    let mut design = Design::new();
    let pin = make_pin(&design, "led", 1, PinDirection::Output, DataRate::Single);
    let request = single_ended(&design, pin, true);
    let fragment = Xilinx7SeriesPlatform.lower(&design, &request).unwrap();
    assert_eq!((fragment.i.is_some(), fragment.o.is_some(), fragment.t.is_some()), (false, true, false));
    design.apply();
    assert_eq!(
        format!("{design}"),
        concat!(
            "&\"led\":1\n",
            "%0:1 = input \"clk\"\n",
            "%1:1 = input \"led_o\"\n",
            "%2:1 = not %1\n",
            "%3:_ = \"FDCE\" {\n",
            "  attr \"DONT_TOUCH\" = \"TRUE\"\n",
            "  attr \"IOB\" = \"TRUE\"\n",
            "  input \"C\" = %0\n",
            "  input \"CE\" = 1\n",
            "  input \"CLR\" = 0\n",
            "  input \"D\" = %2\n",
            "  %3:1 = output \"Q\"\n",
            "}\n",
            "%4:_ = \"OBUF\" {\n",
            "  input \"I\" = %3\n",
            "  io \"O\" = &\"led\"\n",
            "}\n",
        )
    );
}

#[test]
fn test_scenario_c() {
    let _ = env_logger::try_init();
    let mut design = Design::new();
    let pin = make_pin(&design, "data", 2, PinDirection::Input, DataRate::Double);
    let request = differential(&design, pin, false);
    let fragment = Xilinx7SeriesPlatform.lower(&design, &request).unwrap();
    let Some(PinInput::Double(input0, input1)) = &fragment.input else { panic!("expected two phases") };
    assert_eq!((input0.len(), input1.len()), (2, 2));
    expose_input(&design, &fragment);
    design.apply();
    assert_eq!(count(&design, "IDDR"), 2);
    assert_eq!(count(&design, "IBUFDS"), 2);
    assert_eq!(count(&design, "FDCE"), 0);
    for cell_ref in design.iter_cells() {
        if let CellRepr::Other(instance) = cell_ref.repr() {
            if instance.kind == "IBUFDS" {
                let p_io = &instance.ios["I"];
                let n_io = &instance.ios["IB"];
                let p_offset = design.find_io(p_io[0]).map(|(_, offset)| offset);
                assert_eq!(p_offset, design.find_io(n_io[0]).map(|(_, offset)| offset));
                assert_eq!(design.find_io(n_io[0]).map(|(name, _)| name), Some("data_n"));
            }
        }
    }
}

#[test]
fn test_scenario_d() {
    let _ = env_logger::try_init();
    let mut design = Design::new();
    let pin = make_pin(&design, "pad", 1, PinDirection::InputOutput, DataRate::Single);
    let request = single_ended(&design, pin, false);
    let fragments = lower_pins(&Xilinx7SeriesPlatform, &design, &[request]).unwrap();
    expose_input(&design, &fragments[0]);
    design.apply();
    assert_eq!(
        format!("{design}"),
        concat!(
            "&\"pad\":1\n",
            "%0:1 = input \"clk\"\n",
            "%1:1 = input \"pad_o\"\n",
            "%2:1 = input \"pad_oe\"\n",
            "%3:_ = \"FDCE\" {\n",
            "  attr \"DONT_TOUCH\" = \"TRUE\"\n",
            "  attr \"IOB\" = \"TRUE\"\n",
            "  input \"C\" = %0\n",
            "  input \"CE\" = 1\n",
            "  input \"CLR\" = 0\n",
            "  input \"D\" = %7\n",
            "  %3:1 = output \"Q\"\n",
            "}\n",
            "%4:_ = \"FDCE\" {\n",
            "  attr \"DONT_TOUCH\" = \"TRUE\"\n",
            "  attr \"IOB\" = \"TRUE\"\n",
            "  input \"C\" = %0\n",
            "  input \"CE\" = 1\n",
            "  input \"CLR\" = 0\n",
            "  input \"D\" = %1\n",
            "  %4:1 = output \"Q\"\n",
            "}\n",
            "%5:1 = not %2\n",
            "%6:_ = \"FDCE\" {\n",
            "  attr \"DONT_TOUCH\" = \"TRUE\"\n",
            "  attr \"IOB\" = \"TRUE\"\n",
            "  input \"C\" = %0\n",
            "  input \"CE\" = 1\n",
            "  input \"CLR\" = 0\n",
            "  input \"D\" = %5\n",
            "  %6:1 = output \"Q\"\n",
            "}\n",
            "%7:_ = \"IOBUF\" {\n",
            "  input \"I\" = %4\n",
            "  input \"T\" = %6\n",
            "  %7:1 = output \"O\"\n",
            "  io \"IO\" = &\"pad\"\n",
            "}\n",
            "%8:0 = output \"pad_i\" %3\n",
        )
    );
}

#[test]
fn test_populated_signals() {
    let _ = env_logger::try_init();
    for direction in DIRECTIONS {
        for data_rate in DATA_RATES {
            for is_differential in [false, true] {
                let design = Design::new();
                let pin = make_pin(&design, "pin", 3, direction, data_rate);
                let request = if is_differential {
                    differential(&design, pin, true)
                } else {
                    single_ended(&design, pin, true)
                };
                let fragment = Xilinx7SeriesPlatform.lower(&design, &request).unwrap();
                assert_eq!(fragment.i.is_some(), direction.has_input(), "{direction} at XDR {data_rate}");
                assert_eq!(fragment.o.is_some(), direction.has_output(), "{direction} at XDR {data_rate}");
                assert_eq!(fragment.t.is_some(), direction.has_enable(), "{direction} at XDR {data_rate}");
                match (&fragment.input, data_rate) {
                    (None, _) => assert!(!direction.has_input()),
                    (Some(PinInput::Single(input)), DataRate::Combinational | DataRate::Single) => {
                        assert_eq!(input.len(), 3)
                    }
                    (Some(PinInput::Double(input0, input1)), DataRate::Double) => {
                        assert_eq!((input0.len(), input1.len()), (3, 3))
                    }
                    (input, _) => panic!("unexpected input {input:?} at XDR {data_rate}"),
                }
                if let Some(i) = &fragment.i {
                    assert_eq!(i.len(), 3);
                }
                if let Some(o) = &fragment.o {
                    assert_eq!(o.len(), 3);
                }
            }
        }
    }
}

#[test]
fn test_primitive_counts() {
    let _ = env_logger::try_init();
    // (direction, data rate) -> (FDCE, IDDR, ODDR, not) for a 2-bit pin, without inversion
    let expected = [
        (PinDirection::Input, DataRate::Combinational, (0, 0, 0, 0)),
        (PinDirection::Input, DataRate::Single, (2, 0, 0, 0)),
        (PinDirection::Input, DataRate::Double, (0, 2, 0, 0)),
        (PinDirection::Output, DataRate::Single, (2, 0, 0, 0)),
        (PinDirection::Output, DataRate::Double, (0, 0, 2, 0)),
        (PinDirection::OutputEnable, DataRate::Combinational, (0, 0, 0, 1)),
        (PinDirection::OutputEnable, DataRate::Double, (1, 0, 2, 1)),
        (PinDirection::InputOutput, DataRate::Double, (1, 2, 2, 1)),
    ];
    for (direction, data_rate, counts) in expected {
        let mut design = Design::new();
        let pin = make_pin(&design, "pin", 2, direction, data_rate);
        let request = single_ended(&design, pin, false);
        let fragment = Xilinx7SeriesPlatform.lower(&design, &request).unwrap();
        expose_input(&design, &fragment);
        design.apply();
        assert_eq!(
            (count(&design, "FDCE"), count(&design, "IDDR"), count(&design, "ODDR"), count(&design, "not")),
            counts,
            "{direction} at XDR {data_rate}"
        );
    }
}

#[test]
fn test_deterministic() {
    let _ = env_logger::try_init();
    let build = || {
        let mut design = Design::new();
        let pin = make_pin(&design, "bus", 4, PinDirection::InputOutput, DataRate::Double);
        let mut request = differential(&design, pin, true);
        request.attrs.insert("IOSTANDARD".into(), "DIFF_SSTL15".into());
        let fragment = Xilinx7SeriesPlatform.lower(&design, &request).unwrap();
        expose_input(&design, &fragment);
        design.apply();
        (format!("{design}"), fragment.attrs)
    };
    let (text, attrs) = build();
    assert_eq!((text.clone(), attrs.clone()), build());
    assert_eq!(attrs["IOSTANDARD"], "DIFF_SSTL15");
    assert!(!text.contains("IOSTANDARD"));
}

#[test]
fn test_differential_width_mismatch() {
    let _ = env_logger::try_init();
    let mut design = Design::new();
    let pin = make_pin(&design, "lvds", 2, PinDirection::Output, DataRate::Single);
    let p_port = design.add_io("lvds_p", 2);
    let n_port = design.add_io("lvds_n", 1);
    let request = BufferRequest {
        pin,
        port: PinPort::Differential(p_port, n_port),
        attrs: Attributes::new(),
        invert: true,
    };
    assert_eq!(
        Xilinx7SeriesPlatform.lower(&design, &request),
        Err(ConfigurationError::DifferentialWidthMismatch { pin: "lvds".into(), p_width: 2, n_width: 1 })
    );
    let narrow = design.add_io("lvds_x", 1);
    assert_eq!(
        Xilinx7SeriesPlatform.get_diff_output(&design, &request.pin, &narrow, &narrow, &Attributes::new(), false),
        Err(ConfigurationError::PortWidthMismatch { pin: "lvds".into(), expected: 2, found: 1 })
    );
    design.apply();
    // Only the clock and the data inputs.
    assert_eq!(design.iter_cells().count(), 2);
}

#[test]
fn test_rejected_before_emission() {
    let _ = env_logger::try_init();
    let mut design = Design::new();
    let pin = make_pin(&design, "btn", 1, PinDirection::Input, DataRate::Combinational);
    let port = design.add_io("btn", 1);
    assert!(matches!(
        Xilinx7SeriesPlatform.get_output(&design, &pin, &port, &Attributes::new(), false),
        Err(ConfigurationError::DirectionMismatch { .. })
    ));
    design.apply();
    assert_eq!(design.iter_cells().count(), 0);
}

#[test]
fn test_registry() {
    iopad_xilinx::register();
    let platform = create_platform("xilinx_7series", BTreeMap::new()).unwrap();
    assert_eq!(platform.name(), "xilinx_7series");
    let options = BTreeMap::from([("family".to_owned(), "artix7".to_owned())]);
    assert!(create_platform("xilinx_7series", options).is_err());
}
