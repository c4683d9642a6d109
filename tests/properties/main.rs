//! Property-based tests for histogram packing.

mod packing_properties;
