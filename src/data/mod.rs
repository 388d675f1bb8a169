//! Session state and value-tree primitives.
//!
//! This module holds everything stateful about an editing session:
//!
//! - [`session`] - The session container tying documents, tree, and
//!   selections together
//! - [`path`] - Path addressing and mutation over the sparse value tree
//! - [`oneof`] - `oneOf` variant selection state

/// `oneOf` variant selection state.
pub mod oneof;

/// Path addressing over the sparse value tree.
pub mod path;

/// The editing session container.
pub mod session;

pub use session::Session;
