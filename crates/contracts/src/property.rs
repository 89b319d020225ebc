//! PropertySource trait - configuration lookup boundary
//!
//! Persisted properties live outside this workspace. Routing code only
//! needs single-value lookups addressed by `(key, property_type, name)`.

/// Name of the property holding one backend server name.
pub const SERVER_NAME_PROP: &str = "SERVER_NAME";

/// Read-only property lookup.
///
/// A missing property is an expected outcome and is reported as `None`.
pub trait PropertySource: Send + Sync {
    /// Look up one property value
    fn property(&self, key: &str, property_type: &str, name: &str) -> Option<String>;
}

impl<P: PropertySource + ?Sized> PropertySource for &P {
    fn property(&self, key: &str, property_type: &str, name: &str) -> Option<String> {
        (**self).property(key, property_type, name)
    }
}

impl<P: PropertySource + ?Sized> PropertySource for std::sync::Arc<P> {
    fn property(&self, key: &str, property_type: &str, name: &str) -> Option<String> {
        (**self).property(key, property_type, name)
    }
}
