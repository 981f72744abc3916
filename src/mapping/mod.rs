pub mod collection;
pub mod generator;
pub mod source;
pub mod synth;
pub mod wrapper;
