/// Keyed blob persistence backends.
pub mod blob_store;
/// Serialized shapes of the persisted blobs.
pub mod models;
/// Storage abstraction layer shared by every backend.
pub mod storage;
