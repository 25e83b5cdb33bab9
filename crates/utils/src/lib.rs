pub mod browser;
pub mod date;
pub mod logging;
pub mod response;
pub mod storage;
pub mod text;
