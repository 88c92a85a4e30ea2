use std::fmt::{Debug, Display};
use std::ops::Not;

/// A logic level; `Undef` is a level nobody cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Trit {
    Undef,
    Zero,
    One,
}

impl Display for Trit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let symbol = match self {
            Trit::Undef => 'X',
            Trit::Zero => '0',
            Trit::One => '1',
        };
        write!(f, "{symbol}")
    }
}

impl From<bool> for Trit {
    fn from(level: bool) -> Self {
        if level { Trit::One } else { Trit::Zero }
    }
}

impl Not for Trit {
    type Output = Trit;

    fn not(self) -> Trit {
        match self {
            Trit::Zero => Trit::One,
            Trit::One => Trit::Zero,
            Trit::Undef => Trit::Undef,
        }
    }
}

/// A single bit: either a constant, or one output bit of a cell in a [`Design`](crate::Design).
///
/// Indices 0 and 1 are the constant levels and `u32::MAX` is the undefined level; every other
/// index names a cell slot, offset by two.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Net {
    pub(crate) index: u32,
}

impl Net {
    pub const ZERO: Net = Net { index: 0 };
    pub const ONE: Net = Net { index: 1 };
    pub const UNDEF: Net = Net { index: u32::MAX };

    const SLOT_BASE: u32 = 2;

    pub(crate) fn from_cell(slot: usize) -> Net {
        let index = u32::try_from(slot).ok().and_then(|slot| slot.checked_add(Net::SLOT_BASE));
        match index {
            Some(index) if index != Net::UNDEF.index => Net { index },
            _ => panic!("cell slot {slot} is out of range"),
        }
    }

    pub(crate) fn as_cell(self) -> Option<usize> {
        match self.as_const() {
            Some(_) => None,
            None => Some((self.index - Net::SLOT_BASE) as usize),
        }
    }

    pub fn as_const(self) -> Option<Trit> {
        match self {
            Net::ZERO => Some(Trit::Zero),
            Net::ONE => Some(Trit::One),
            Net::UNDEF => Some(Trit::Undef),
            _ => None,
        }
    }
}

impl From<Trit> for Net {
    fn from(trit: Trit) -> Self {
        match trit {
            Trit::Zero => Net::ZERO,
            Trit::One => Net::ONE,
            Trit::Undef => Net::UNDEF,
        }
    }
}

impl Debug for Net {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match (self.as_const(), self.as_cell()) {
            (Some(trit), _) => write!(f, "{trit}"),
            (None, Some(slot)) => write!(f, "%{slot}"),
            (None, None) => unreachable!(),
        }
    }
}

/// A control signal with an explicit active level.
///
/// `Pos(net)` is active when `net` is high, `Neg(net)` is active when `net` is low. Flipping
/// the polarity with `!` never requires any logic to be emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ControlNet {
    Pos(Net),
    Neg(Net),
}

impl ControlNet {
    pub const ZERO: ControlNet = ControlNet::Pos(Net::ZERO);
    pub const ONE: ControlNet = ControlNet::Pos(Net::ONE);

    pub fn net(self) -> Net {
        let (ControlNet::Pos(net) | ControlNet::Neg(net)) = self;
        net
    }

    pub fn is_negative(self) -> bool {
        matches!(self, ControlNet::Neg(_))
    }

    pub fn visit(self, mut f: impl FnMut(Net)) {
        f(self.net())
    }

    pub fn visit_mut(&mut self, mut f: impl FnMut(&mut Net)) {
        let (ControlNet::Pos(net) | ControlNet::Neg(net)) = self;
        f(net)
    }
}

impl From<Net> for ControlNet {
    fn from(net: Net) -> Self {
        ControlNet::Pos(net)
    }
}

impl Not for ControlNet {
    type Output = ControlNet;

    fn not(self) -> ControlNet {
        match self {
            ControlNet::Pos(net) => ControlNet::Neg(net),
            ControlNet::Neg(net) => ControlNet::Pos(net),
        }
    }
}
