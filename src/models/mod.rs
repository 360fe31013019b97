pub mod chat;
pub mod first_aid;
pub mod profile;

use serde::{ Deserialize, Deserializer };

/// Accepts an explicit JSON `null` wherever a missing field would fall back to its default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where D: Deserializer<'de>, T: Default + Deserialize<'de>
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
