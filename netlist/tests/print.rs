use iopad_netlist::{Const, ControlNet, Design, Instance, IoBuffer, Net, Value};

#[track_caller]
fn assert_text(design: &Design, expect: &str) {
    assert_eq!(format!("{}", design), expect);
}

#[test]
fn test_empty() {
    let mut design = Design::new();
    design.apply();
    assert_text(&design, "");
}

#[test]
fn test_not() {
    let mut design = Design::new();
    design.add_io("pad", 1);
    let a = design.add_input("a", 2);
    let y = design.add_not(&a);
    design.add_output("y", &y);
    design.apply();
    assert_text(
        &design,
        concat!(
            "&\"pad\":1\n",
            "%0:2 = input \"a\"\n",
            "%2:2 = not %0:2\n",
            "%4:0 = output \"y\" %2:2\n",
        ),
    );
}

#[test]
fn test_slices_and_consts() {
    let mut design = Design::new();
    let a = design.add_input("a", 3);
    let value = Value::from(Net::ONE).concat(a.slice(1..3)).concat(Net::UNDEF);
    design.add_output("y", value);
    design.apply();
    assert_text(
        &design,
        concat!(
            "%0:3 = input \"a\"\n", //
            "%3:0 = output \"y\" [ X %0+1:2 1 ]\n",
        ),
    );
}

#[test]
fn test_iobuf() {
    let mut design = Design::new();
    let pad = design.add_io("pad", 2);
    let oe = design.add_input("oe", 1);
    let o = design.add_input("o", 2);
    let i = design.add_iob(IoBuffer { io: pad, output: o, enable: ControlNet::Neg(oe.unwrap_net()) });
    design.add_output("i", i);
    design.apply();
    assert_text(
        &design,
        concat!(
            "&\"pad\":2\n",
            "%0:1 = input \"oe\"\n",
            "%1:2 = input \"o\"\n",
            "%3:2 = iobuf &\"pad\":2 o=%1:2 en=!%0\n",
            "%5:0 = output \"i\" %3:2\n",
        ),
    );
}

#[test]
fn test_instance() {
    let mut design = Design::new();
    let pad = design.add_io("pad", 1);
    let clk = design.add_input("clk", 1);
    let mut iddr = Instance::new("IDDR");
    iddr.add_param("DDR_CLK_EDGE", "SAME_EDGE_PIPELINED");
    iddr.add_param("INIT_Q1", Const::zero(1));
    iddr.add_attr("IOB", "TRUE");
    iddr.add_input("C", &clk);
    iddr.add_input("D", Net::ZERO);
    iddr.add_output("Q1", 1);
    iddr.add_output("Q2", 1);
    let q = design.add_other(iddr);
    let mut ibuf = Instance::new("IBUF");
    ibuf.add_io("I", &pad);
    ibuf.add_output("O", 1);
    design.add_other(ibuf);
    design.add_output("q", &q);
    design.apply();
    assert_text(
        &design,
        concat!(
            "&\"pad\":1\n",
            "%0:1 = input \"clk\"\n",
            "%1:_ = \"IDDR\" {\n",
            "  param \"DDR_CLK_EDGE\" = \"SAME_EDGE_PIPELINED\"\n",
            "  param \"INIT_Q1\" = 0\n",
            "  attr \"IOB\" = \"TRUE\"\n",
            "  input \"C\" = %0\n",
            "  input \"D\" = 0\n",
            "  %1:1 = output \"Q1\"\n",
            "  %2:1 = output \"Q2\"\n",
            "}\n",
            "%3:_ = \"IBUF\" {\n",
            "  %3:1 = output \"O\"\n",
            "  io \"I\" = &\"pad\"\n",
            "}\n",
            "%4:0 = output \"q\" [ %2 %1 ]\n",
        ),
    );
}

#[test]
fn test_void_renumbered() {
    let mut design = Design::new();
    let pad = design.add_io("pad", 1);
    let raw = design.add_void(1);
    let y = design.add_not(&raw);
    design.add_output("y", y);
    let mut ibuf = Instance::new("IBUF");
    ibuf.add_io("I", pad);
    let output = ibuf.add_output("O", 1);
    let buffered = design.add_other(ibuf).slice(output);
    design.replace_value(&raw, &buffered);
    design.apply();
    assert_text(
        &design,
        concat!(
            "&\"pad\":1\n",
            "%0:1 = not %2\n",
            "%1:0 = output \"y\" %0\n",
            "%2:_ = \"IBUF\" {\n",
            "  %2:1 = output \"O\"\n",
            "  io \"I\" = &\"pad\"\n",
            "}\n",
        ),
    );
}

#[test]
fn test_deterministic() {
    let build = || {
        let mut design = Design::new();
        let pad = design.add_io("pad", 1);
        let a = design.add_input("a", 1);
        let mut obuf = Instance::new("OBUF");
        obuf.add_input("I", design.add_not(a));
        obuf.add_io("O", pad);
        design.add_other(obuf);
        design.apply();
        format!("{design}")
    };
    assert_eq!(build(), build());
}
