//! Data model shared by every backend adapter

pub mod chunk;
pub mod info;
pub mod message;
pub mod request;
pub mod response;
pub mod settings;
