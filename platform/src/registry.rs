use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;
use std::sync::{Arc, Mutex};

use crate::{GenericPlatform, Platform};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlatformError(String);

impl Display for UnknownPlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown platform {:?}", self.0)
    }
}

impl Error for UnknownPlatformError {}

type PlatformBuilder = Box<dyn Fn(BTreeMap<String, String>) -> Result<Arc<dyn Platform>, Box<dyn Error>> + Send>;

static REGISTRY: Mutex<BTreeMap<String, PlatformBuilder>> = Mutex::new(BTreeMap::new());

pub fn register_platform(
    name: impl Into<String>,
    builder: impl Fn(BTreeMap<String, String>) -> Result<Arc<dyn Platform>, Box<dyn Error>> + Send + 'static,
) {
    let mut registry = REGISTRY.lock().unwrap();
    let name = name.into();
    assert!(registry.insert(name.clone(), Box::new(builder)).is_none(), "platform {name:?} registered twice");
}

pub fn create_platform(name: &str, options: BTreeMap<String, String>) -> Result<Arc<dyn Platform>, Box<dyn Error>> {
    let registry = REGISTRY.lock().unwrap();
    match registry.get(name).map(|builder| builder(options)) {
        Some(platform) => platform,
        None => Err(UnknownPlatformError(name.into()))?,
    }
}

/// Registers the generic platform, which accepts no options.
pub fn register() {
    register_platform("generic", |options| {
        if let Some(name) = options.keys().next() {
            return Err(format!("generic platform has no option {name:?}").into());
        }
        Ok(Arc::new(GenericPlatform) as Arc<dyn Platform>)
    });
}
