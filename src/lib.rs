#![forbid(unsafe_code)]
#![warn(clippy::all, rust_2018_idioms)]

mod app;
pub mod config;
pub mod countdown;
mod fonts;
pub mod layout;

pub use app::{Countdown, CountdownApp};
