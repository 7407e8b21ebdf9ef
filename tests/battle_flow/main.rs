//! End to end battle presentation tests for `warband-rs`

mod human;
mod setup;
mod siege;
mod skirmish;
