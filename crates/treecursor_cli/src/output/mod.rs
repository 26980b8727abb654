//! Output formatting module

pub mod json;
pub mod text;
