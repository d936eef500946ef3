//! Mining and shielding subsystem.
//!
//! # Data Flow
//! ```text
//! prepare: z_validateaddress(target) → setgenerate(true, threads)
//! each iteration:
//!     getbalance
//!     → balance > 0 ? z_shieldcoinbase("*", target)
//!     → getinfo (height, peers)
//!     → sleep interval (interruptible by shutdown)
//! ```
//!
//! # Design Decisions
//! - Any failed call ends the loop; nothing inside it is retried
//! - At most one shield call per iteration

pub mod shielding;

pub use shielding::{Iteration, LoopExit, MiningError, ShieldingLoop};
