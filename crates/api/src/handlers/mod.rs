pub mod events;
pub mod feed;
pub mod reports;
pub mod sessions;
