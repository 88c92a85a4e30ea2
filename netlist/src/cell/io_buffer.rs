use crate::{ControlNet, IoValue, Net, Value};

/// A vendor-neutral pad buffer.
///
/// While `enable` is active, `output` is driven onto `io`. The cell's own output is the value
/// present on `io`, whether driven by this buffer or by something outside the device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IoBuffer {
    pub io: IoValue,
    pub output: Value,
    pub enable: ControlNet,
}

impl IoBuffer {
    pub fn output_len(&self) -> usize {
        self.io.len()
    }

    pub fn visit(&self, mut f: impl FnMut(Net)) {
        self.output.iter().chain([self.enable.net()]).for_each(&mut f)
    }

    pub fn visit_mut(&mut self, mut f: impl FnMut(&mut Net)) {
        self.output.visit_mut(&mut f);
        self.enable.visit_mut(f);
    }
}
