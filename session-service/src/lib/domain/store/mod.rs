pub mod errors;
pub mod models;
pub mod ports;

pub use errors::StoreError;
pub use models::Collection;
pub use models::Document;
pub use models::Filter;
pub use ports::DocumentStore;
