pub mod storage;
pub mod timer;
pub mod upload;
