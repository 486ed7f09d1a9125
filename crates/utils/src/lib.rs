pub mod response;
pub mod shell;
pub mod text;
