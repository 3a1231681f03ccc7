//! Interactive terminal view over the latest snapshot ranking.

pub mod app;
pub mod view;

pub use app::WatchState;
pub use view::run;
