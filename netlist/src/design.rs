use std::cell::RefCell;
use std::collections::{btree_map, BTreeMap};
use std::ops::Range;

use crate::cell::{Cell, CellRepr};
use crate::{Instance, IoBuffer, IoNet, IoValue, Net, Trit, Value};

/// A netlist under construction.
///
/// Cells and ports are added through a shared reference and queued; [`Design::apply`] commits
/// them in the order they were added. Nets held by the caller stay meaningful only until the
/// next call to `apply`, which may renumber cells.
#[derive(Debug)]
pub struct Design {
    ios: BTreeMap<String, Range<u32>>,
    cells: Vec<Cell>,
    changes: RefCell<ChangeQueue>,
}

#[derive(Debug, Default)]
struct ChangeQueue {
    next_io: u32,
    added_ios: BTreeMap<String, Range<u32>>,
    added_cells: Vec<Cell>,
    replaced_nets: BTreeMap<Net, Net>,
}

impl Design {
    pub fn new() -> Design {
        Design { ios: BTreeMap::new(), cells: vec![], changes: RefCell::new(ChangeQueue::default()) }
    }

    pub fn add_io(&self, name: impl Into<String>, width: usize) -> IoValue {
        let mut changes = self.changes.borrow_mut();
        let name = name.into();
        let end = u32::try_from(width).ok().and_then(|width| changes.next_io.checked_add(width));
        let Some(end) = end else {
            panic!("IO port {name} of width {width} does not fit in the IO address space");
        };
        let range = changes.next_io..end;
        changes.next_io = end;
        if self.ios.contains_key(&name) {
            panic!("duplicate IO port {name}");
        }
        match changes.added_ios.entry(name) {
            btree_map::Entry::Occupied(entry) => {
                panic!("duplicate IO port {}", entry.key());
            }
            btree_map::Entry::Vacant(entry) => {
                entry.insert(range.clone());
            }
        }
        IoValue::from_range(range)
    }

    pub fn get_io(&self, name: impl AsRef<str>) -> Option<IoValue> {
        self.ios.get(name.as_ref()).map(|range| IoValue::from_range(range.clone()))
    }

    pub fn find_io(&self, io_net: IoNet) -> Option<(&str, usize)> {
        for (name, range) in self.ios.iter() {
            if range.contains(&io_net.0) {
                return Some((name.as_str(), (io_net.0 - range.start) as usize));
            }
        }
        None
    }

    pub fn iter_ios(&self) -> impl Iterator<Item = (&str, IoValue)> {
        self.ios.iter().map(|(name, range)| (name.as_str(), IoValue::from_range(range.clone())))
    }

    pub fn add_cell(&self, repr: CellRepr) -> Value {
        repr.validate();
        let mut changes = self.changes.borrow_mut();
        let index = self.cells.len() + changes.added_cells.len();
        let output_len = repr.output_len();
        changes.added_cells.push(repr.into());
        for _ in 1..output_len {
            changes.added_cells.push(Cell::Skip(index.try_into().expect("cell index too large")));
        }
        Value::cell(index, output_len)
    }

    /// Allocates nets that must later be bound to a driver with [`Design::replace_value`].
    pub fn add_void(&self, width: usize) -> Value {
        let mut changes = self.changes.borrow_mut();
        let index = self.cells.len() + changes.added_cells.len();
        for _ in 0..width {
            changes.added_cells.push(Cell::Void);
        }
        Value::cell(index, width)
    }

    pub fn replace_net(&self, from_net: impl Into<Net>, to_net: impl Into<Net>) {
        let (from_net, to_net) = (from_net.into(), to_net.into());
        if from_net == to_net {
            return;
        }
        let mut changes = self.changes.borrow_mut();
        assert_eq!(changes.replaced_nets.insert(from_net, to_net), None);
    }

    pub fn replace_value(&self, from_value: impl Into<Value>, to_value: impl Into<Value>) {
        let (from_value, to_value) = (from_value.into(), to_value.into());
        assert_eq!(from_value.len(), to_value.len());
        for (from_net, to_net) in from_value.iter().zip(to_value.iter()) {
            self.replace_net(from_net, to_net);
        }
    }

    pub fn apply(&mut self) {
        let changes = self.changes.get_mut();
        let replaced_nets = std::mem::take(&mut changes.replaced_nets);
        self.ios.extend(std::mem::take(&mut changes.added_ios));
        self.cells.extend(std::mem::take(&mut changes.added_cells));
        if !replaced_nets.is_empty() {
            for cell in self.cells.iter_mut() {
                cell.visit_mut(|net| {
                    while let Some(new_net) = replaced_nets.get(&*net) {
                        *net = *new_net;
                    }
                });
            }
        }
        self.remove_voids();
    }

    fn remove_voids(&mut self) {
        if !self.cells.iter().any(|cell| matches!(cell, Cell::Void)) {
            return;
        }
        let mut index_map = BTreeMap::new();
        for (old_index, cell) in std::mem::take(&mut self.cells).into_iter().enumerate() {
            match cell {
                Cell::Void => (),
                Cell::Skip(start) => {
                    index_map.insert(old_index, self.cells.len());
                    let new_start = index_map[&(start as usize)];
                    self.cells.push(Cell::Skip(new_start as u32));
                }
                cell => {
                    index_map.insert(old_index, self.cells.len());
                    self.cells.push(cell);
                }
            }
        }
        for cell in self.cells.iter_mut() {
            cell.visit_mut(|net| {
                if let Some(old_index) = net.as_cell() {
                    match index_map.get(&old_index) {
                        Some(&new_index) => *net = Net::from_cell(new_index),
                        None => panic!("void net {net:?} was never driven"),
                    }
                }
            });
        }
    }

    fn locate_cell(&self, net: Net) -> Result<(usize, usize), Trit> {
        if let Some(trit) = net.as_const() {
            return Err(trit);
        }
        let index = net.as_cell().unwrap();
        let (cell_index, bit_index) = match self.cells[index] {
            Cell::Skip(start) => (start as usize, index - start as usize),
            _ => (index, 0),
        };
        Ok((cell_index, bit_index))
    }

    pub fn find_cell(&self, net: Net) -> Result<(CellRef<'_>, usize), Trit> {
        self.locate_cell(net).map(|(cell_index, bit_index)| (CellRef { design: self, index: cell_index }, bit_index))
    }

    pub(crate) fn is_valid_cell_index(&self, index: usize) -> bool {
        index < self.cells.len()
    }

    pub fn iter_cells(&self) -> CellIter<'_> {
        CellIter { design: self, index: 0 }
    }

    /// Counts committed cells by class: instances by their primitive kind, other cells by keyword.
    pub fn statistics(&self) -> BTreeMap<String, usize> {
        let mut result = BTreeMap::<String, usize>::new();
        for cell_ref in self.iter_cells() {
            let class = match cell_ref.repr() {
                CellRepr::Not(_) => "not".to_owned(),
                CellRepr::Iob(_) => "iobuf".to_owned(),
                CellRepr::Other(instance) => instance.kind.clone(),
                CellRepr::Input(..) => "input".to_owned(),
                CellRepr::Output(..) => "output".to_owned(),
            };
            *result.entry(class).or_default() += 1;
        }
        result
    }
}

impl Default for Design {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub struct CellRef<'a> {
    design: &'a Design,
    index: usize,
}

impl PartialEq<CellRef<'_>> for CellRef<'_> {
    fn eq(&self, other: &CellRef<'_>) -> bool {
        std::ptr::eq(self.design, other.design) && self.index == other.index
    }
}

impl Eq for CellRef<'_> {}

impl<'a> CellRef<'a> {
    pub fn repr(&self) -> &'a CellRepr {
        match &self.design.cells[self.index] {
            Cell::Repr(repr) => repr,
            _ => unreachable!("cell %{} is not a cell head", self.index),
        }
    }

    pub fn output(&self) -> Value {
        Value::cell(self.index, self.output_len())
    }

    pub fn output_len(&self) -> usize {
        self.design.cells[self.index].output_len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn visit(&self, f: impl FnMut(Net)) {
        self.repr().visit(f)
    }
}

impl std::fmt::Debug for CellRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "CellRef(%{})", self.index)
    }
}

pub struct CellIter<'a> {
    design: &'a Design,
    index: usize,
}

impl<'a> Iterator for CellIter<'a> {
    type Item = CellRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.design.cells.len() {
            let cell_ref = CellRef { design: self.design, index: self.index };
            self.index += self.design.cells[self.index].output_len().max(1);
            Some(cell_ref)
        } else {
            None
        }
    }
}

macro_rules! builder_fn {
    () => {};

    ($func:ident( $($arg:ident : $ty:ty),+ ) -> $repr:ident $body:tt; $($rest:tt)*) => {
        pub fn $func(&self, $( $arg: $ty ),+) -> Value {
            self.add_cell(CellRepr::$repr $body)
        }

        builder_fn!{ $($rest)* }
    };

    // For cells with no output value.
    ($func:ident( $($arg:ident : $ty:ty),+ ) : $repr:ident $body:tt; $($rest:tt)*) => {
        pub fn $func(&self, $( $arg: $ty ),+) {
            self.add_cell(CellRepr::$repr $body);
        }

        builder_fn!{ $($rest)* }
    };
}

impl Design {
    builder_fn! {
        add_not(arg: impl Into<Value>) ->
            Not(arg.into());

        add_iob(arg: impl Into<IoBuffer>) ->
            Iob(arg.into());
        add_other(arg: impl Into<Instance>) ->
            Other(arg.into());

        add_input(name: impl Into<String>, width: usize) ->
            Input(name.into(), width);
        add_output(name: impl Into<String>, value: impl Into<Value>) :
            Output(name.into(), value.into());
    }
}
