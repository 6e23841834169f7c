pub mod inbox;
pub mod init;
pub mod misc;
pub mod read;
pub mod register;
pub mod send;
pub mod shell;
