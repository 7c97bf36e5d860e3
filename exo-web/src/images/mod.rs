//! Image store: source listing and display conversion

pub mod convert;
pub mod store;

pub use store::{DisplayImage, ImageAsset, ImageStore, SourceFormat};
