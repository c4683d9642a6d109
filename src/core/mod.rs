//! Core packing types and algorithms

pub mod efficiency;
pub mod heuristic;
pub mod histogram;
pub mod open_set;
pub mod packing;
pub mod shape;
pub mod sweep;

pub use efficiency::{DegradedCapacity, PackingStats, TokenEfficiency};
pub use heuristic::{FnHeuristic, Heuristic, HeuristicKind, UnknownHeuristic};
pub use histogram::{HistogramEntry, SizeHistogram};
pub use packing::{HistogramPacker, PackError, PackingResult, Strategy, pack};
pub use shape::{Capacity, ItemLimit, Score, Shape};
pub use sweep::{Sweep, SweepReport, SweepRow};
