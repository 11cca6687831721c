//! Entity models and DTOs.

pub mod author;
pub mod pod;
pub mod tag;
pub mod video;
