//! GUID conversion between `uuid` and `windows::core::GUID`.

use uuid::Uuid;
use windows::core::GUID;

pub fn to_guid(id: &Uuid) -> GUID {
    GUID::from_u128(id.as_u128())
}

pub fn from_guid(guid: &GUID) -> Uuid {
    Uuid::from_u128(guid.to_u128())
}
