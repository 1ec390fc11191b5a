//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<T>`
//! - Thin wrappers that:
//!   1. Call ports (or the admission controller) from the context
//!   2. Write the evidence file
//!   3. Print a one-line summary
//!
//! Service failures are reported, never returned as errors.

pub mod multi;
pub mod ping;
pub mod say;
