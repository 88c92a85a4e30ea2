use std::{collections::BTreeMap, error::Error, fs::File, io::Write};

use iopad_netlist::Design;
use iopad_platform::LoweredFragment;

mod request;

use request::{build_requests, expose_inputs, RequestFile};

fn read_input(name: String) -> Result<RequestFile, Box<dyn Error>> {
    if name.ends_with(".json") {
        RequestFile::parse(&std::fs::read_to_string(name)?)
    } else if name.is_empty() {
        Err("no input provided")?
    } else {
        Err(format!("don't know what to do with input {name:?}"))?
    }
}

fn write_design(writer: &mut impl Write, design: &Design, fragments: &[LoweredFragment]) -> std::io::Result<()> {
    write!(writer, "{design}")?;
    for fragment in fragments {
        for (name, value) in &fragment.attrs {
            writeln!(writer, "; pin {:?} attribute {name}={value:?}", fragment.pin)?;
        }
    }
    writeln!(writer, "; cell counts:")?;
    for (class, amount) in design.statistics() {
        writeln!(writer, "; {:>7} {}", amount, class)?;
    }
    Ok(())
}

fn write_output(design: &Design, fragments: &[LoweredFragment], name: String) -> Result<(), Box<dyn Error>> {
    if name.is_empty() {
        write_design(&mut std::io::stdout().lock(), design, fragments)?;
    } else {
        write_design(&mut File::create(name)?, design, fragments)?;
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut version = false;
    let mut input = String::new();
    let mut output = String::new();
    let mut platform = None::<String>;
    {
        let mut parser = argparse::ArgumentParser::new();
        parser.set_description("Lower FPGA pin requests into vendor I/O buffer primitives");
        parser.refer(&mut version).add_option(&["--version"], argparse::StoreTrue, "Display version");
        parser.refer(&mut platform).add_option(&["-p", "--platform"], argparse::StoreOption, "Target platform");
        parser.refer(&mut input).add_argument("INPUT", argparse::Store, "Pin request file (.json)");
        parser.refer(&mut output).add_argument("OUTPUT", argparse::Store, "Output file");
        parser.parse_args_or_exit();
    }

    if version {
        println!("iopad {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let request_file = read_input(input)?;
    let platform_name = platform.or(request_file.platform).unwrap_or_else(|| "generic".to_owned());
    let platform = iopad_platform::create_platform(&platform_name, BTreeMap::new())?;
    log::info!("lowering {} pins for platform {:?}", request_file.pins.len(), platform.name());

    let mut design = Design::new();
    let requests = build_requests(&design, &request_file.pins)?;
    let fragments = iopad_platform::lower_pins(&*platform, &design, &requests)?;
    expose_inputs(&design, &fragments);
    design.apply();
    write_output(&design, &fragments, output)?;
    Ok(())
}

fn main() {
    env_logger::init();
    iopad_platform::register();
    iopad_xilinx::register();
    if let Err(error) = run() {
        eprintln!("error: {}", error);
        std::process::exit(1)
    }
}
