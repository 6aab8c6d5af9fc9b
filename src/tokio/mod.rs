//! Feeding the parser from async Tokio readers. Enabled by the `tokio`
//! feature.

mod asyncbufreader;

pub use asyncbufreader::AsyncBufReaderJsonFeeder;
