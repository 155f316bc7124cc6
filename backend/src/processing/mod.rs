pub mod parser;
pub mod editor;
