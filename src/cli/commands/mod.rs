pub mod check;
pub mod fix;
pub mod init;
pub mod list;
pub mod refs;
