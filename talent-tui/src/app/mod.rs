//! Application core
//!
//! - Actions: what can happen
//! - State: what is true right now
//! - Reducer: `(State, Action) -> State`, no side effects
//! - Effects: slice operations the event loop performs for the reducer

pub mod actions;
pub mod event;
pub mod reducer;
pub mod state;

pub use actions::{Action, Effect, FilterChange};
pub use reducer::reduce;
pub use state::{AppState, ListControl, ListView, StatusBarState, UiConfig};
