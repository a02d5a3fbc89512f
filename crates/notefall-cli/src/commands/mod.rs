pub mod play;
pub mod schedule;
pub mod simulate;
