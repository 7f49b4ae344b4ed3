//! Client-side interaction state for the reel player.
//!
//! Nothing here does I/O or reads a clock. Callers pass the current [Instant](std::time::Instant) in and perform the
//! requests the state machines ask for, then report the outcome back.

pub mod composer;
pub mod like_toggle;
pub mod sheet;
pub mod tap;

pub use composer::CommentDraft;
pub use like_toggle::{LikeCall, LikeToggle};
pub use sheet::{Release, SheetDrag};
pub use tap::{Gesture, TapDetector};
