//! Learning to cross the frozen lake by memorizing one lucky walk.
//!
//! Random episodes are played until one reaches the goal. The states and
//! actions of that episode are folded into a [`Policy`], which is then replayed
//! on the same lake, on a bigger lake, and on a slippery lake.

pub mod driver;
pub mod episode;
pub mod policy;
pub mod trace;

pub use driver::*;
pub use episode::*;
pub use policy::*;
pub use trace::*;
