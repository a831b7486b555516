pub mod markdown;
pub mod response;
pub mod shell;
