//! Cycle-accurate model of a four-stage pipelined 16x16 -> 32 unsigned multiplier that sums its
//! partial products with a tree of 3:2 carry-save compressors.
//!
//! Stage 1 generates the partial products, stage 2 reduces them from 16 to 6 terms, stage 3 from 6 to 2,
//! and stage 4 adds the final pair. A product is valid four clock edges after its operands are sampled.

#![no_std]

mod compressor;
pub use compressor::{Compressed, compress};

mod partial_products;
pub use partial_products::{PARTIAL_PRODUCTS, partial_products};

mod pipeline;
pub use pipeline::{Inputs, LATENCY, Mode, Outputs, Pipeline};

mod reduction_tree;
pub use reduction_tree::{
	Level,
	LEVEL_A, LEVEL_B, LEVEL_C, LEVEL_D, LEVEL_E, LEVEL_F,
	MID_TERMS,
	multiply,
	reduce_to_mid,
	reduce_to_pair,
};

mod validity;
pub use validity::ValidityTracker;
