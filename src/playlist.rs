//! Linear playlist with a cursor.
//!
//! The cursor is `None` exactly when the playlist is empty; every mutation
//! keeps it inside `0..len`.

mod model;

pub use model::*;
