pub mod presenter;
pub mod prompt;
pub mod settings;
