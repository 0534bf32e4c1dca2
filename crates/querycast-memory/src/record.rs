//! Field access for in-memory records.

use querycast_core::types::TypedValue;

/// A record whose fields can be read by name.
///
/// Returning `None` means the field is null or unknown; both sort and
/// filter treat it as null.
pub trait Record {
    /// Read the field called `name`.
    fn field(&self, name: &str) -> Option<TypedValue>;
}
