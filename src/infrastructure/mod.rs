pub mod ai;
pub mod observability;
pub mod storage;
