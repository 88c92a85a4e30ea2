use std::{collections::BTreeMap, ops::Range};

use crate::{IoValue, Net, ParamValue, Value};

/// An instance of a vendor primitive.
///
/// The instance produces a single combined output value; `outputs` maps each output port to its
/// range within that value. Ports connected to the package are listed in `ios` rather than in
/// `inputs` or `outputs`, since their direction is fixed by the primitive itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instance {
    pub kind: String,
    pub params: BTreeMap<String, ParamValue>,
    pub attrs: BTreeMap<String, ParamValue>,
    pub inputs: BTreeMap<String, Value>,
    pub outputs: BTreeMap<String, Range<usize>>,
    pub ios: BTreeMap<String, IoValue>,
}

impl Instance {
    pub fn new(kind: impl Into<String>) -> Self {
        Instance {
            kind: kind.into(),
            params: Default::default(),
            attrs: Default::default(),
            inputs: Default::default(),
            outputs: Default::default(),
            ios: Default::default(),
        }
    }

    pub fn output_len(&self) -> usize {
        self.outputs.values().map(|range| range.len()).sum()
    }

    pub fn add_param(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.params.insert(name.into(), value.into());
    }

    pub fn add_attr(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn add_input(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.inputs.insert(name.into(), value.into());
    }

    /// Appends an output port of the given width after all existing outputs.
    pub fn add_output(&mut self, name: impl Into<String>, width: usize) -> Range<usize> {
        let start = self.output_len();
        let range = start..start + width;
        assert!(self.outputs.insert(name.into(), range.clone()).is_none());
        range
    }

    pub fn add_io(&mut self, name: impl Into<String>, value: impl Into<IoValue>) {
        self.ios.insert(name.into(), value.into());
    }

    /// Finds the output port that `offset` (within the combined output) belongs to.
    pub fn find_output(&self, offset: usize) -> Option<(&str, Range<usize>)> {
        self.outputs
            .iter()
            .find(|(_name, range)| range.contains(&offset))
            .map(|(name, range)| (name.as_str(), range.clone()))
    }

    pub fn visit(&self, mut f: impl FnMut(Net)) {
        for val in self.inputs.values() {
            val.visit(&mut f);
        }
    }

    pub fn visit_mut(&mut self, mut f: impl FnMut(&mut Net)) {
        for val in self.inputs.values_mut() {
            val.visit_mut(&mut f);
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{Instance, Net};

    #[test]
    fn test_outputs() {
        let mut instance = Instance::new("IDDR");
        assert_eq!(instance.add_output("Q1", 1), 0..1);
        assert_eq!(instance.add_output("Q2", 1), 1..2);
        instance.add_input("D", Net::ONE);
        assert_eq!(instance.output_len(), 2);
        assert_eq!(instance.find_output(1), Some(("Q2", 1..2)));
        assert_eq!(instance.find_output(2), None);
    }
}
