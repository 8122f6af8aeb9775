//! Resolution of `Any` fields nested in request bodies

use crate::{any::Any, error::UnpackError};

/// Maps type URLs to the concrete types that may be packed into an [`Any`]
pub trait InterfaceRegistry: Send + Sync {
    /// Checks that `any` names a registered type and that its value decodes
    /// as that type
    /// # Errors
    /// Returns an error if the type URL is unknown or the value is malformed
    fn resolve(&self, any: &Any) -> Result<(), UnpackError>;
}

/// Implemented by request types so the router can resolve every nested [`Any`]
/// before the handler runs
pub trait UnpackInterfaces {
    /// Resolves every nested [`Any`] against `registry`. Types without `Any`
    /// fields keep the default, which accepts everything.
    /// # Errors
    /// Returns the first resolution failure
    fn unpack_interfaces(&self, registry: &dyn InterfaceRegistry) -> Result<(), UnpackError> {
        let _ = registry;
        Ok(())
    }
}

impl UnpackInterfaces for Any {
    fn unpack_interfaces(&self, registry: &dyn InterfaceRegistry) -> Result<(), UnpackError> {
        registry.resolve(self)
    }
}

impl<T: UnpackInterfaces> UnpackInterfaces for Option<T> {
    fn unpack_interfaces(&self, registry: &dyn InterfaceRegistry) -> Result<(), UnpackError> {
        self.as_ref()
            .map_or(Ok(()), |inner| inner.unpack_interfaces(registry))
    }
}
