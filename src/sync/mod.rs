//! Incremental mirroring of a user's feed into a [`Store`](crate::store::Store).
//!
//! ```text
//! feed page ─┬─> candidate ─(has message)───────────> store
//!            ├─> candidate ─(no message)─> detail ───> store
//!            └─> candidate ─(already complete)──────> skip
//! ```
//!
//! Pages are fetched one after another. Candidates of one page are handled
//! concurrently, bounded by a semaphore; a branch that fails only loses its
//! own item.

pub mod endpoints;
pub mod engine;
pub mod report;

pub use endpoints::Endpoints;
pub use engine::{needs_update, FeedPage, Reconciler};
pub use report::SyncReport;
