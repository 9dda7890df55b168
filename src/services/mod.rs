pub mod gateway;
pub mod gemini;
pub mod model;
