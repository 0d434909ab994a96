//! Capture narrowing: the application filter table and the `tcpdump`
//! process that applies it.

mod expression;
mod tcpdump;

pub use expression::{FilterTable, DEFAULT_FILTERS};
pub use tcpdump::{TcpdumpOutput, TcpdumpSource};
