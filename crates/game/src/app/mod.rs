pub mod script;
pub mod story;
