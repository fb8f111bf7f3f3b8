/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// History listing, deletion and clearing.
pub mod history_service;
/// Blob encoding, start-up restore and the background writer.
pub mod persistence;
/// Remote-control WebSocket handling.
pub mod remote_service;
/// Live match commands and queries.
pub mod score_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events streaming.
pub mod sse_service;
/// Statistics queries.
pub mod stats_service;
/// Storage health polling and degraded mode.
pub mod storage_supervisor;
