mod chunk;
mod item;

pub use chunk::{chunk, DisplayBlock};
