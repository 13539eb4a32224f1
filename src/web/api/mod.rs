pub mod download;
pub mod listing;
pub mod media;
