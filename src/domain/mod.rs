pub mod diagnostics;
pub mod errors;
pub mod events;
pub mod logging;
pub mod storage;
pub mod time;
