// Presentation layer - Render seam and page wiring
pub mod json_lines;
pub mod page;
pub mod render;
