pub mod folder;
pub mod handlers;
pub mod upload;
