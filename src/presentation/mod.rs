pub mod hooks;
pub mod wasm_api;

pub use hooks::{StorageContext, provide_storage_context, use_local_storage, use_session_storage, use_storage};
pub use wasm_api::StorageApi;
