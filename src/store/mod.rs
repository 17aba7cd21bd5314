//! Process-wide client state
//!
//! Each store owns a `watch` channel holding its current snapshot. Every
//! transition goes through a pure `reduce` function applied with
//! `send_modify`, so transitions are serialized even when requests complete
//! concurrently. The cart store observes the session store's channel.

pub mod cart;
pub mod session;

pub use cart::{CartAction, CartState, CartStore};
pub use session::{SessionAction, SessionState, SessionStore};
