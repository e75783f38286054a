mod app;
mod dom;
mod export;
mod net;
mod render;
mod state;
mod swipe;

pub use app::{run, HoldEditor};
pub use swipe::{load_next, load_previous, SwipeHandler};
