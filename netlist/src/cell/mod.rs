use crate::{Net, Value};

mod instance;
mod io_buffer;

pub use instance::Instance;
pub use io_buffer::IoBuffer;

// Storage representation of a cell slot. A cell with an N-bit output occupies N slots, the first
// of which holds the cell and the rest of which point back at it.
#[derive(Debug, Clone)]
pub(crate) enum Cell {
    // Placeholder for a net that will be driven by a cell added later.
    Void,
    Skip(u32),
    Repr(Box<CellRepr>),
}

impl Cell {
    pub(crate) fn output_len(&self) -> usize {
        match self {
            Cell::Void => 1,
            Cell::Skip(_) => 0,
            Cell::Repr(repr) => repr.output_len(),
        }
    }

    pub(crate) fn visit_mut(&mut self, f: impl FnMut(&mut Net)) {
        match self {
            Cell::Void | Cell::Skip(_) => (),
            Cell::Repr(repr) => repr.visit_mut(f),
        }
    }
}

impl From<CellRepr> for Cell {
    fn from(repr: CellRepr) -> Self {
        Cell::Repr(Box::new(repr))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CellRepr {
    Not(Value),

    Iob(IoBuffer),
    Other(Instance),

    Input(String, usize),
    Output(String, Value),
}

impl CellRepr {
    pub fn validate(&self) {
        match self {
            CellRepr::Not(_) => (),
            CellRepr::Iob(io_buffer) => {
                assert_eq!(io_buffer.output.len(), io_buffer.io.len());
            }
            CellRepr::Other(instance) => {
                let mut next = 0;
                let mut ranges = instance.outputs.values().cloned().collect::<Vec<_>>();
                ranges.sort_by_key(|range| range.start);
                for range in ranges {
                    assert_eq!(range.start, next, "instance outputs must be contiguous");
                    next = range.end;
                }
            }
            CellRepr::Input(..) | CellRepr::Output(..) => (),
        }
    }

    pub fn output_len(&self) -> usize {
        match self {
            CellRepr::Not(arg) => arg.len(),
            CellRepr::Iob(io_buffer) => io_buffer.output_len(),
            CellRepr::Other(instance) => instance.output_len(),
            CellRepr::Input(_, width) => *width,
            CellRepr::Output(..) => 0,
        }
    }

    pub fn visit(&self, mut f: impl FnMut(Net)) {
        match self {
            CellRepr::Not(arg) | CellRepr::Output(_, arg) => arg.visit(&mut f),
            CellRepr::Iob(io_buffer) => io_buffer.visit(&mut f),
            CellRepr::Other(instance) => instance.visit(&mut f),
            CellRepr::Input(..) => (),
        }
    }

    pub fn visit_mut(&mut self, mut f: impl FnMut(&mut Net)) {
        match self {
            CellRepr::Not(arg) | CellRepr::Output(_, arg) => arg.visit_mut(&mut f),
            CellRepr::Iob(io_buffer) => io_buffer.visit_mut(&mut f),
            CellRepr::Other(instance) => instance.visit_mut(&mut f),
            CellRepr::Input(..) => (),
        }
    }
}
