//! Flatgraph: Zero-Copy binary interchange untuk tensor-graph messages
//!
//! Producer membangun buffer bottom-up dengan [`Builder`], consumer membaca
//! langsung dari buffer lewat view yang lazy ([`Table`], [`Vector`]).
//!
//! ```
//! use flatgraph::{root, Builder, FrameIteration, FrameIterationArgs};
//!
//! let mut b = Builder::new();
//! let frame = b.create_string("while_loop_1")?;
//! let fi = FrameIteration::create(&mut b, &FrameIterationArgs {
//!     frame: Some(frame),
//!     iteration: 3,
//! })?;
//! let bytes = b.finish(fi)?;
//!
//! let decoded = root::<FrameIteration>(bytes)?;
//! assert_eq!(decoded.frame()?, Some("while_loop_1"));
//! assert_eq!(decoded.iteration()?, 3);
//! # Ok::<(), flatgraph::FlatError>(())
//! ```

pub mod core;
mod error;
pub mod protocol;

pub use crate::core::{
    root, verified_root, verify, Builder, BuilderConfig, Follow, ForwardsUOffset, Offset, Table,
    Vector, Verifiable, VerifierOptions,
};
pub use error::{BuilderMisuse, CorruptBufferError, FlatError, Result};
pub use protocol::*;
