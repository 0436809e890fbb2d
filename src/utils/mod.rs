//! Small helpers shared by the endpoint modules.

pub mod body;

pub use body::BodyBuilder;
