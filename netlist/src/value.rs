use std::fmt::{Debug, Display};
use std::ops::{Bound, RangeBounds};

use crate::{Net, Trit};

/// A constant bit vector, such as a parameter literal or a simulated value.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Const {
    bits: Vec<Trit>,
}

bit_vector!(Const, Trit);

impl Const {
    pub fn zero(width: usize) -> Self {
        Const { bits: vec![Trit::Zero; width] }
    }

    /// Unsigned binary encoding of `value` in `width` bits.
    pub fn from_uint(value: u128, width: usize) -> Self {
        assert!(width >= 128 || value >> width == 0, "{value} does not fit in {width} bits");
        (0..width).map(|bit| Trit::from(bit < 128 && (value >> bit) & 1 == 1)).collect()
    }
}

impl Display for Const {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.bits.iter().rev().try_for_each(|trit| write!(f, "{trit}"))
    }
}

impl Debug for Const {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Const({self})")
    }
}

/// A vector of nets, such as the output of a cell or the operand of one.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Value {
    bits: Vec<Net>,
}

bit_vector!(Value, Net);

impl Value {
    pub fn zero(width: usize) -> Self {
        Value { bits: vec![Net::ZERO; width] }
    }

    pub fn ones(width: usize) -> Self {
        Value { bits: vec![Net::ONE; width] }
    }

    pub fn undef(width: usize) -> Self {
        Value { bits: vec![Net::UNDEF; width] }
    }

    // Output of the cell occupying `count` slots starting at `slot`.
    pub(crate) fn cell(slot: usize, count: usize) -> Value {
        (slot..slot + count).map(Net::from_cell).collect()
    }

    pub fn as_const(&self) -> Option<Const> {
        self.iter().map(Net::as_const).collect()
    }

    pub fn as_net(&self) -> Option<Net> {
        match self.bits[..] {
            [net] => Some(net),
            _ => None,
        }
    }

    pub fn unwrap_net(&self) -> Net {
        match self.as_net() {
            Some(net) => net,
            None => panic!("expected a single net, found {self:?}"),
        }
    }

    pub fn concat(&self, other: impl Into<Value>) -> Self {
        let other: Value = other.into();
        self.iter().chain(&other).collect()
    }

    pub fn slice(&self, range: impl RangeBounds<usize>) -> Value {
        let bounds: (Bound<usize>, Bound<usize>) = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bits[bounds].iter().copied().collect()
    }

    pub fn visit(&self, f: impl FnMut(Net)) {
        self.iter().for_each(f)
    }

    pub fn visit_mut(&mut self, f: impl FnMut(&mut Net)) {
        self.bits.iter_mut().for_each(f)
    }
}

impl From<Const> for Value {
    fn from(value: Const) -> Self {
        value.iter().map(Net::from).collect()
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_tuple("Value").field(&self.bits).finish()
    }
}

#[cfg(test)]
mod test {
    use crate::{Const, Net, Trit, Value};

    #[test]
    fn test_value() {
        let v01 = Value::from_iter([Net::ONE, Net::ZERO]);
        assert_eq!(v01.into_iter().collect::<Vec<_>>(), vec![Net::ONE, Net::ZERO]);
        assert_eq!(v01.as_const(), Some(Const::from(vec![Trit::One, Trit::Zero])));
        assert_eq!(v01.slice(1..), Value::from(Net::ZERO));
        assert_eq!(Value::from(Const::from_uint(2, 2)), Value::from(vec![Net::ZERO, Net::ONE]));
    }

    #[test]
    fn test_value_cell() {
        let value = Value::cell(4, 3);
        assert_eq!(value.len(), 3);
        assert_eq!(value[2], Net::from_cell(6));
        assert_eq!(value.as_const(), None);
        assert_eq!(value.as_net(), None);
        assert_eq!(value.slice(..1).unwrap_net(), Net::from_cell(4));
        assert_eq!(value.concat(Net::ONE).len(), 4);
    }

    #[test]
    fn test_const_format() {
        assert_eq!(format!("{}", Const::from(vec![Trit::One, Trit::Zero, Trit::Undef])), "X01");
        assert_eq!(format!("{}", Const::from_uint(6, 4)), "0110");
        assert_eq!(format!("{:?}", Const::zero(2)), "Const(00)");
        assert_eq!(format!("{:?}", Value::from(Net::ONE)), "Value([1])");
    }
}
