pub mod client;
pub mod types;

pub use client::{TranslateClient, TranslateError, Uploader};
pub use types::{TranslateConfig, TranslateResponse};
