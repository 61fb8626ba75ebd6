/// The two residual vectors of a 3:2 compressor.
///
/// `carry` is stored already shifted into its column, so the represented value is `sum + carry`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Compressed {
	pub sum: u32,
	pub carry: u32,
}

impl Compressed {
	/// Carry-propagate addition of the pair. This is the final adder of the datapath.
	pub const fn total(self) -> u32 {
		self.sum.wrapping_add(self.carry)
	}
}

/// 3:2 carry-save adder over 32-bit vectors.
///
/// Every column is an independent full adder: the sum bit is the parity of the three input bits,
/// the carry bit is their majority and lands one column to the left. Column 0 has no carry-in.
pub const fn compress(a: u32, b: u32, c: u32) -> Compressed {
	let sum = a ^ b ^ c;
	let majority = (a & b) | (b & c) | (a & c);
	Compressed { sum, carry: majority << 1 }
}
