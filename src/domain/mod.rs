pub mod episode;
pub mod models;
