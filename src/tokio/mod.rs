//! Support for listening without blocking a Tokio worker thread.

#[cfg(feature = "tokio-stt")]
mod stt;

#[cfg(feature = "tokio-stt")]
pub use stt::AsyncSession;
