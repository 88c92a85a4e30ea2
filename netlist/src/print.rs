use std::fmt::Display;

use crate::cell::CellRepr;
use crate::{Const, ControlNet, Design, IoNet, IoValue, Net, ParamValue, Trit, Value};

impl Design {
    // For display purposes only: go from a net to a `%x`, taking into account that an instance
    // output port is addressed by its own index rather than by the index of the instance.
    fn find_cell_output(&self, net: Net) -> Result<(Value, usize, usize), Trit> {
        let (cell_ref, offset) = self.find_cell(net)?;
        let cell_index = cell_ref.index();
        match cell_ref.repr() {
            CellRepr::Other(instance) => {
                let (_name, range) = instance.find_output(offset).unwrap();
                Ok((cell_ref.output().slice(range.clone()), cell_index + range.start, offset - range.start))
            }
            _ => Ok((cell_ref.output(), cell_index, offset)),
        }
    }

    fn write_string(&self, f: &mut std::fmt::Formatter, str: &str) -> std::fmt::Result {
        write!(f, "\"")?;
        for byte in str.as_bytes() {
            if (byte.is_ascii_graphic() || matches!(byte, b' ' | b'\t')) && *byte != b'"' && *byte != b'\\' {
                write!(f, "{}", *byte as char)?;
            } else {
                write!(f, "\\{:02x}", byte)?;
            }
        }
        write!(f, "\"")?;
        Ok(())
    }

    fn write_io_net(&self, f: &mut std::fmt::Formatter, io_net: IoNet) -> std::fmt::Result {
        write!(f, "&")?;
        match self.find_io(io_net) {
            Some((name, offset)) => {
                self.write_string(f, name)?;
                if self.get_io(name).unwrap().len() > 1 {
                    write!(f, "+{}", offset)?;
                }
                Ok(())
            }
            None => write!(f, "??"),
        }
    }

    fn write_io_value(&self, f: &mut std::fmt::Formatter, io_value: &IoValue) -> std::fmt::Result {
        if io_value.is_empty() {
            write!(f, "[]")
        } else if io_value.len() == 1 {
            self.write_io_net(f, io_value[0])
        } else {
            if let Some((name, _offset)) = self.find_io(io_value[0]) {
                if self.get_io(name).unwrap() == *io_value {
                    write!(f, "&")?;
                    self.write_string(f, name)?;
                    write!(f, ":{}", io_value.len())?;
                    return Ok(());
                }
            }
            write!(f, "[")?;
            for io_net in io_value.iter().rev() {
                write!(f, " ")?;
                self.write_io_net(f, io_net)?;
            }
            write!(f, " ]")
        }
    }

    fn write_net(&self, f: &mut std::fmt::Formatter, net: Net) -> std::fmt::Result {
        if let Some(index) = net.as_cell() {
            if !self.is_valid_cell_index(index) {
                return write!(f, "%_{index}");
            }
        }
        match self.find_cell_output(net) {
            Ok((output, index, offset)) => {
                if output.len() == 1 {
                    write!(f, "%{index}")
                } else {
                    write!(f, "%{index}+{offset}")
                }
            }
            Err(trit) => write!(f, "{trit}"),
        }
    }

    fn write_value(&self, f: &mut std::fmt::Formatter, value: &Value) -> std::fmt::Result {
        enum Chunk {
            Slice { cell_index: usize, offset: usize, width: usize },
            WholeCell { cell_index: usize, width: usize },
            Pending(Net),
            Const(Const),
        }
        let mut index = 0;
        let mut chunks = vec![];
        while index < value.len() {
            if value[index].as_cell().map(|index| !self.is_valid_cell_index(index)).unwrap_or(false) {
                // Nets of cells that have not been applied yet; nothing to look up.
                chunks.push(Chunk::Pending(value[index]));
                index += 1;
            } else if let Ok((output, index_a, offset_a)) = self.find_cell_output(value[index]) {
                let count = value[index..]
                    .iter()
                    .enumerate()
                    .take_while(|(addend, net)| {
                        if net.as_cell().map(|index| !self.is_valid_cell_index(index)).unwrap_or(false) {
                            return false;
                        }
                        if let Ok((_, index_b, offset_b)) = self.find_cell_output(**net) {
                            index_a == index_b && offset_a + *addend == offset_b
                        } else {
                            false
                        }
                    })
                    .count();
                if offset_a == 0 && output.len() == count {
                    chunks.push(Chunk::WholeCell { cell_index: index_a, width: count });
                } else {
                    chunks.push(Chunk::Slice { cell_index: index_a, offset: offset_a, width: count });
                }
                index += count;
            } else {
                let const_value = Const::from_iter(value[index..].iter().map_while(|net| net.as_const()));
                index += const_value.len();
                chunks.push(Chunk::Const(const_value));
            }
        }
        if chunks.is_empty() {
            return write!(f, "[]");
        }
        let single_chunk = chunks.len() == 1;
        if !single_chunk {
            write!(f, "[")?;
        }
        for chunk in chunks.into_iter().rev() {
            if !single_chunk {
                write!(f, " ")?;
            }
            match chunk {
                Chunk::Slice { cell_index, offset, width } => {
                    write!(f, "%{cell_index}+{offset}")?;
                    if width != 1 {
                        write!(f, ":{width}")?;
                    }
                }
                Chunk::WholeCell { cell_index, width } => {
                    write!(f, "%{cell_index}")?;
                    if width != 1 {
                        write!(f, ":{width}")?;
                    }
                }
                Chunk::Pending(net) => self.write_net(f, net)?,
                Chunk::Const(const_value) => write!(f, "{const_value}")?,
            }
        }
        if !single_chunk {
            write!(f, " ]")?;
        }
        Ok(())
    }

    fn write_param_value(&self, f: &mut std::fmt::Formatter, value: &ParamValue) -> std::fmt::Result {
        match value {
            ParamValue::Const(value) => write!(f, "{value}"),
            ParamValue::Int(value) => write!(f, "#{value}"),
            ParamValue::String(value) => self.write_string(f, value),
        }
    }

    fn write_cell(&self, f: &mut std::fmt::Formatter, index: usize, repr: &CellRepr) -> std::fmt::Result {
        let write_control = |f: &mut std::fmt::Formatter, name: &str, control_net: ControlNet| -> std::fmt::Result {
            write!(f, "{}=", name)?;
            if control_net.is_negative() {
                write!(f, "!")?;
            }
            self.write_net(f, control_net.net())
        };
        let write_argument = |f: &mut std::fmt::Formatter, keyword: &str, name: &str| -> std::fmt::Result {
            write!(f, "  {keyword} ")?;
            self.write_string(f, name)?;
            write!(f, " = ")
        };

        match repr {
            CellRepr::Other(_) => write!(f, "%{}:_ = ", index)?,
            _ => write!(f, "%{}:{} = ", index, repr.output_len())?,
        }
        match repr {
            CellRepr::Not(arg) => {
                write!(f, "not ")?;
                self.write_value(f, arg)?;
            }
            CellRepr::Iob(io_buffer) => {
                write!(f, "iobuf ")?;
                self.write_io_value(f, &io_buffer.io)?;
                write!(f, " o=")?;
                self.write_value(f, &io_buffer.output)?;
                write_control(f, " en", io_buffer.enable)?;
            }
            CellRepr::Other(instance) => {
                self.write_string(f, &instance.kind)?;
                writeln!(f, " {{")?;
                for (name, value) in instance.params.iter() {
                    write_argument(f, "param", name)?;
                    self.write_param_value(f, value)?;
                    writeln!(f)?;
                }
                for (name, value) in instance.attrs.iter() {
                    write_argument(f, "attr", name)?;
                    self.write_param_value(f, value)?;
                    writeln!(f)?;
                }
                for (name, value) in instance.inputs.iter() {
                    write_argument(f, "input", name)?;
                    self.write_value(f, value)?;
                    writeln!(f)?;
                }
                let mut outputs = instance.outputs.iter().collect::<Vec<_>>();
                outputs.sort_by_key(|(_name, range)| range.start);
                for (name, range) in outputs {
                    write!(f, "  %{}:{} = output ", index + range.start, range.len())?;
                    self.write_string(f, name)?;
                    writeln!(f)?;
                }
                for (name, value) in instance.ios.iter() {
                    write_argument(f, "io", name)?;
                    self.write_io_value(f, value)?;
                    writeln!(f)?;
                }
                write!(f, "}}")?;
            }
            CellRepr::Input(name, _width) => {
                write!(f, "input ")?;
                self.write_string(f, name)?;
            }
            CellRepr::Output(name, value) => {
                write!(f, "output ")?;
                self.write_string(f, name)?;
                write!(f, " ")?;
                self.write_value(f, value)?;
            }
        }
        writeln!(f)
    }
}

impl Display for Design {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (name, io_value) in self.iter_ios() {
            write!(f, "&")?;
            self.write_string(f, name)?;
            writeln!(f, ":{}", io_value.len())?;
        }
        for cell_ref in self.iter_cells() {
            self.write_cell(f, cell_ref.index(), cell_ref.repr())?;
        }
        Ok(())
    }
}
