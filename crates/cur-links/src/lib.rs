//! # cur-links
//!
//! Link integrity checking for Curator.
//!
//! - [`extract`]: pure extraction of link occurrences from markdown
//! - [`verify`]: deduplication, grouping by URL, filesystem checks, fan-out
//! - [`probe`]: the [`LinkProber`] seam and its HTTP implementation
//!
//! Bounded concurrency for probes is applied by the caller.

pub mod extract;
pub mod probe;
pub mod verify;

pub use extract::extract_links;
pub use probe::{HttpProber, LinkProber, ProbeOutcome};
pub use verify::{ExternalLink, LinkPlan, check_internal, fan_out, plan};
