pub mod surface;
pub mod text;
