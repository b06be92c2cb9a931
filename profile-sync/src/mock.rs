pub mod api;
pub mod storage;

pub use api::MockApi;
pub use storage::MockStorage;
