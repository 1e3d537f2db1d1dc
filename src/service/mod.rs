//! The three batch stages: collect feed metadata, extract full articles, publish.

pub mod collect;
pub mod extract;
pub mod publish;

pub use collect::collect_metadata;
pub use extract::extract_full_articles;
pub use publish::{send_all, SendSummary};
