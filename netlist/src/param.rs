use crate::Const;

/// A literal bound to a primitive parameter or attribute.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamValue {
    Const(Const),
    Int(i64),
    String(String),
}

macro_rules! param_from {
    ($($source:ty => |$value:ident| $param:expr;)*) => {
        $(
            impl From<$source> for ParamValue {
                fn from($value: $source) -> Self {
                    $param
                }
            }
        )*
    };
}

param_from! {
    Const => |value| ParamValue::Const(value);
    &Const => |value| ParamValue::Const(value.clone());
    i64 => |value| ParamValue::Int(value);
    String => |value| ParamValue::String(value);
    &str => |value| ParamValue::String(value.to_owned());
}
