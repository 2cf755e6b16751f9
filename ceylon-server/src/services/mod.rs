//! Outbound and storage services shared by the handlers

pub mod chat;
pub mod image_store;

pub use chat::{ChatBackend, ChatConfig, ChatError, OpenAiChat};
pub use image_store::{ImageStore, StoredImage};
