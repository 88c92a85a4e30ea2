//! Netlist representation shared by the pin lowering backends.
//!
//! A [`Design`] owns a flat list of cells and package ports. Backends add cells through a shared
//! reference and commit them with [`Design::apply`].

// Plumbing shared by the vectors of bits (`Const`, `Value`, `IoValue`), all stored LSB first.
macro_rules! bit_vector {
    ($vector:ident, $bit:ty) => {
        impl $vector {
            pub fn len(&self) -> usize {
                self.bits.len()
            }

            pub fn is_empty(&self) -> bool {
                self.bits.is_empty()
            }

            pub fn iter(&self) -> impl DoubleEndedIterator<Item = $bit> + ExactSizeIterator + '_ {
                self.bits.iter().copied()
            }
        }

        impl From<Vec<$bit>> for $vector {
            fn from(bits: Vec<$bit>) -> Self {
                $vector { bits }
            }
        }

        impl From<$bit> for $vector {
            fn from(bit: $bit) -> Self {
                $vector { bits: vec![bit] }
            }
        }

        impl From<&$vector> for $vector {
            fn from(vector: &$vector) -> Self {
                vector.clone()
            }
        }

        impl FromIterator<$bit> for $vector {
            fn from_iter<T: IntoIterator<Item = $bit>>(iter: T) -> Self {
                $vector { bits: iter.into_iter().collect() }
            }
        }

        impl<I: std::slice::SliceIndex<[$bit]>> std::ops::Index<I> for $vector {
            type Output = I::Output;

            fn index(&self, index: I) -> &Self::Output {
                &self.bits[index]
            }
        }

        impl<'a> IntoIterator for &'a $vector {
            type Item = $bit;
            type IntoIter = std::iter::Copied<std::slice::Iter<'a, $bit>>;

            fn into_iter(self) -> Self::IntoIter {
                self.bits.iter().copied()
            }
        }
    };
}

mod net;
mod value;
mod io;
mod param;
mod cell;
mod design;
mod print;

pub use net::{ControlNet, Net, Trit};
pub use value::{Const, Value};
pub use io::{IoNet, IoValue};
pub use param::ParamValue;
pub use cell::{CellRepr, Instance, IoBuffer};
pub use design::{CellIter, CellRef, Design};
