pub mod intersection;
pub mod speaker_map;
pub mod wire_format;
