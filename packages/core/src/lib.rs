//! kvlayer core: the pieces every other layer builds on.
//!
//! - `Error`: the error taxonomy shared by decoding, matching and stores
//! - `Input`: a closed union of writable values and their byte encoding
//! - `pattern`: colon-segmented glob matching for key enumeration
//! - `SetOptions`: per-write options passed through to a backend
//!
//! Nothing in this crate performs I/O.
//!
//! # Example
//!
//! ```rust
//! use kvlayer_core::{pattern, Input};
//!
//! let bytes = Input::from("Alice").to_bytes().unwrap();
//! assert_eq!(&bytes[..], b"Alice");
//!
//! assert!(pattern::matches_str("user:*", "user:1:profile"));
//! assert!(!pattern::matches_str("user:*:profile", "user:1"));
//! ```

pub use bytes::Bytes;

mod error;
mod input;
mod options;
pub mod pattern;

pub use error::{Error, Result};
pub use input::Input;
pub use options::SetOptions;
