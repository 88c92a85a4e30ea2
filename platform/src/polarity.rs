//! Optional inversion between the register stage and the fabric.
//!
//! The inverter always sits on the fabric side of the register: an inverted input is registered
//! first and inverted afterwards, an inverted output is inverted first and registered afterwards.

use iopad_netlist::{Design, Value};

/// Returns the logical input corresponding to `raw`, which comes from the register stage.
pub fn invert_input(design: &Design, raw: Value, invert: bool) -> Value {
    if invert {
        log::trace!("inverting {} input bits", raw.len());
        design.add_not(raw)
    } else {
        raw
    }
}

/// Returns the value to be fed to the register stage for the logical output `logical`.
pub fn invert_output(design: &Design, logical: Value, invert: bool) -> Value {
    if invert {
        log::trace!("inverting {} output bits", logical.len());
        design.add_not(logical)
    } else {
        logical
    }
}

#[cfg(test)]
mod test {
    use iopad_netlist::{CellRepr, Design};

    use super::{invert_input, invert_output};

    #[test]
    fn test_identity() {
        let mut design = Design::new();
        let a = design.add_input("a", 3);
        assert_eq!(invert_input(&design, a.clone(), false), a);
        assert_eq!(invert_output(&design, a.clone(), false), a);
        design.apply();
        assert_eq!(design.iter_cells().count(), 1);
    }

    #[test]
    fn test_one_inverter() {
        let mut design = Design::new();
        let a = design.add_input("a", 3);
        let y = invert_output(&design, a.clone(), true);
        assert_eq!(y.len(), 3);
        design.apply();
        let cells = design.iter_cells().collect::<Vec<_>>();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].repr(), &CellRepr::Not(cells[0].output()));
    }
}
