//! # mindsync
//!
//! Incrementally mirrors a Minds user's activities into a flat text file.
//!
//! ## Architecture
//!
//! ```text
//! Store file → Codec → MemoryStore ⇄ Reconciler ← Normalizer ← Fetcher
//!                                        ↓
//!                               Codec → Store file
//! ```
//!
//! Items already mirrored with a message are not fetched again unless
//! `--force` is given. Feed entries that arrive without a message get a
//! second, per-item detail request.
//!
//! ## Quick Start
//!
//! ```bash
//! # Mirror the default user into ./out.txt
//! mindsync
//!
//! # Another user, another file, re-fetch everything
//! mindsync -f -u 1197537175369949199 -o minds.txt
//!
//! # Show what is mirrored
//! mindsync list -o minds.txt
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together configuration,
/// fetcher and endpoints.
pub mod app;

/// Command-line interface using clap.
///
/// - `sync` (default) - Reconcile the mirror file with the remote feed
/// - `list` - Print mirrored items
pub mod cli;

/// Configuration loaded from `~/.config/mindsync/config.toml`.
pub mod config;

/// Core domain model: [`Item`](domain::Item).
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for GET requests
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Mapping of feed and detail responses into items.
pub mod normalizer;

/// Item storage and the mirror file format.
///
/// - [`Store`](store::Store): Trait for keyed item storage
/// - [`MemoryStore`](store::MemoryStore): Mutex-guarded map shared across tasks
/// - [`codec`](store::codec): Title-line framed text format
/// - [`order`](store::order): Deterministic write order
pub mod store;

/// Feed pagination and reconciliation.
pub mod sync;
