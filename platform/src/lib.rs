//! Vendor-independent description of logical pins and the contract for lowering them to I/O
//! buffer primitives.

mod error;
mod feature;
mod pin;
mod platform;
mod polarity;
mod registry;
mod request;

pub use error::ConfigurationError;
pub use feature::{check_feature, BufferKind, FeatureSupport};
pub use pin::{DataRate, Pin, PinDirection, PinInput, PinOutput, PinSignals};
pub use platform::{lower_pins, GenericPlatform, Platform};
pub use polarity::{invert_input, invert_output};
pub use registry::{create_platform, register, register_platform, UnknownPlatformError};
pub use request::{Attributes, BufferRequest, LoweredFragment, PinPort};
