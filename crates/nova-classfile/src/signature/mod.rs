//! Generic signatures (JVMS 4.7.9.1) as a stream of structural events.
//!
//! [`SignatureWalker`] turns signature text into [`SignatureEvent`]s,
//! [`WalkContext`] follows those events to track nesting and member position,
//! and [`SignatureWriter`] turns events back into text.

mod context;
mod model;
mod walker;
mod writer;

pub use context::{MemberPosition, WalkContext};
pub use model::{SignatureEvent, SignatureKind, Wildcard};
pub use walker::SignatureWalker;
pub use writer::SignatureWriter;

use crate::error::Result;

/// Walks `signature` to the end, checking both the grammar and that nesting
/// returns to level 0.
pub fn validate_signature(signature: &str, kind: SignatureKind) -> Result<()> {
    let mut ctx = WalkContext::new(signature, kind);
    for event in SignatureWalker::new(signature, kind) {
        ctx.apply(&event?)?;
    }
    ctx.finish()
}
