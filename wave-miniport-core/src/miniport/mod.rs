pub mod descriptors;
pub mod pins;
pub mod power;
pub mod properties;
pub mod wave;
