pub mod collector;
pub mod pairing;
pub mod pipeline;
pub mod source;
