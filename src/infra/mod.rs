pub mod archive;
pub mod paths;
