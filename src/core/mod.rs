//! Core module: Builder dan Reader untuk binary table layout
//!
//! Prinsip desain:
//! - Zero-Copy: Reader membaca langsung dari `&[u8]`, tidak ada decode di depan
//! - Back-to-front: Builder menulis dari alamat tinggi ke rendah, child dulu
//! - Fallible: Semua read bounds-checked, buffer rusak menjadi error, bukan panic

mod builder;
mod table;
mod vector;
mod verifier;
pub mod wire;

pub use builder::{Builder, BuilderConfig, Offset};
pub use table::{root, Follow, ForwardsUOffset, Table, VTable};
pub use vector::{Vector, VectorIter};
pub use verifier::{verified_root, verify, TableVerifier, Verifiable, Verifier, VerifierOptions};
