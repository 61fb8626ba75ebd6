use crate::{
	compressor::Compressed,
	partial_products::{PARTIAL_PRODUCTS, partial_products},
	reduction_tree::{MID_TERMS, reduce_to_mid, reduce_to_pair},
	validity::ValidityTracker,
};

/// Number of clock edges between sampling an operand pair and its product appearing at the output.
pub const LATENCY: usize = 4;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Inputs {
	pub multiplicand: u16,
	pub multiplier: u16,
	pub reset: bool,
}

impl Inputs {
	pub const RESET: Self = Self { multiplicand: 0, multiplier: 0, reset: true };

	pub const fn operands(multiplicand: u16, multiplier: u16) -> Self {
		Self { multiplicand, multiplier, reset: false }
	}
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Outputs {
	pub product: u32,
	pub valid: bool,
}

impl Outputs {
	pub const fn result(self) -> Option<u32> {
		if self.valid { Some(self.product) } else { None }
	}
}

/// What the most recent clock edge did.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Mode {
	#[default]
	Reset,
	Running,
}

/// The four register banks of the multiplier and the validity shift register.
///
/// ```text
///  operands -> [partial products x16] -> A, B, C -> [reduced x6] -> D, E, F -> [sum, carry] -> + -> [product]
/// ```
///
/// Each bank is written only by the logic in front of it, and read only by the logic behind it.
/// The default value is the state right after a reset edge.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Pipeline {
	mode: Mode,
	partial_products: [u32; PARTIAL_PRODUCTS],
	reduced: [u32; MID_TERMS],
	final_pair: Compressed,
	product: u32,
	validity: ValidityTracker,
}

impl Pipeline {
	/// One clock edge. Every bank is computed from the pre-edge state before any of them is replaced.
	///
	/// Reset is synchronous and discards anything in flight.
	pub fn tick(&mut self, inputs: Inputs) -> Outputs {
		*self =
			if inputs.reset {
				Self::default()
			}
			else {
				Self {
					mode: Mode::Running,
					partial_products: partial_products(inputs.multiplicand, inputs.multiplier),
					reduced: reduce_to_mid(&self.partial_products),
					final_pair: reduce_to_pair(&self.reduced),
					product: self.final_pair.total(),
					validity: self.validity.shift(),
				}
			};
		self.outputs()
	}

	pub fn outputs(&self) -> Outputs {
		Outputs { product: self.product, valid: self.validity.valid() }
	}

	pub fn mode(&self) -> Mode {
		self.mode
	}

	pub fn partial_products(&self) -> &[u32; PARTIAL_PRODUCTS] {
		&self.partial_products
	}

	pub fn reduced(&self) -> &[u32; MID_TERMS] {
		&self.reduced
	}

	pub fn final_pair(&self) -> Compressed {
		self.final_pair
	}

	pub fn product(&self) -> u32 {
		self.product
	}

	pub fn validity(&self) -> ValidityTracker {
		self.validity
	}
}

impl core::fmt::Display for Pipeline {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let mode = match self.mode {
			Mode::Reset => "reset",
			Mode::Running => "running",
		};
		writeln!(f, "mode: {mode:<7} | validity: {}", self.validity)?;

		for (row, pp) in self.partial_products.chunks(4).enumerate() {
			for (col, value) in pp.iter().enumerate() {
				if col != 0 {
					f.write_str(" | ")?;
				}
				let i = row * 4 + col;
				write!(f, "pp{i:<2}: 0x{value:08x}")?;
			}
			writeln!(f)?;
		}

		for (i, value) in self.reduced.iter().enumerate() {
			if i != 0 {
				f.write_str(" | ")?;
			}
			write!(f, "r{i}: 0x{value:08x}")?;
		}
		writeln!(f)?;

		writeln!(f, "sum: 0x{:08x} | carry: 0x{:08x}", self.final_pair.sum, self.final_pair.carry)?;

		write!(f, "product: 0x{:08x}", self.product)?;

		Ok(())
	}
}
