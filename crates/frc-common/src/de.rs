//! Deserialization helpers shared by the wire types.

use serde::{Deserialize, Deserializer};

/// Deserialize a field, mapping an explicit JSON `null` to the type's default.
///
/// Combined with a container-level `#[serde(default)]` this treats a missing
/// field and a `null` field the same way.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
