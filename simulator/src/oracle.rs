use num_traits::ToPrimitive as _;

use csa_multiplier::LATENCY;

/// Arbitrary-precision product of the zero-extended operands, narrowed to the 32-bit output.
///
/// `None` if the product does not fit, which cannot happen for 16-bit operands.
pub(crate) fn product(multiplicand: u16, multiplier: u16) -> Option<u32> {
	let product = num_bigint::BigUint::from(multiplicand) * num_bigint::BigUint::from(multiplier);
	product.to_u32()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Expectation {
	pub(crate) multiplicand: u16,
	pub(crate) multiplier: u16,
	pub(crate) product: Option<u32>,
}

impl Expectation {
	pub(crate) fn new(multiplicand: u16, multiplier: u16) -> Self {
		Self { multiplicand, multiplier, product: product(multiplicand, multiplier) }
	}
}

impl std::fmt::Display for Expectation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "0x{:04x} * 0x{:04x} = ", self.multiplicand, self.multiplier)?;
		match self.product {
			Some(product) => write!(f, "0x{product:08x}"),
			None => f.write_str("<overflow>"),
		}
	}
}

/// Holds the expectations of the operand pairs currently inside the pipeline,
/// so that each one comes out on the same edge as its product.
#[derive(Debug)]
pub(crate) struct DelayLine {
	in_flight: std::collections::VecDeque<Expectation>,
}

impl DelayLine {
	/// Records the pair sampled on this edge, and returns the expectation whose product the pipeline
	/// presents after this edge, if any.
	pub(crate) fn issue(&mut self, expectation: Expectation) -> Option<Expectation> {
		self.in_flight.push_back(expectation);
		if self.in_flight.len() == LATENCY {
			self.in_flight.pop_front()
		}
		else {
			None
		}
	}

	/// Drops everything in flight. Returns how many expectations were discarded.
	pub(crate) fn reset(&mut self) -> u64 {
		let discarded = self.in_flight.len();
		self.in_flight.clear();
		u64::try_from(discarded).unwrap_or(u64::MAX)
	}
}

impl Default for DelayLine {
	fn default() -> Self {
		Self { in_flight: std::collections::VecDeque::with_capacity(LATENCY) }
	}
}

#[cfg(test)]
mod tests {
	use super::{DelayLine, Expectation, product};

	#[test]
	fn products() {
		assert_eq!(product(0, 12345), Some(0));
		assert_eq!(product(54321, 1), Some(54321));
		assert_eq!(product(0xffff, 0xffff), Some(4_294_836_225));
		assert_eq!(product(256, 256), Some(65536));
	}

	#[test]
	fn delay_line() {
		let mut delay_line: DelayLine = Default::default();

		let mut out = vec![];
		for i in 1..=6 {
			out.push(delay_line.issue(Expectation::new(i, 3)).and_then(|expectation| expectation.product));
		}
		assert_eq!(out, [None, None, None, Some(3), Some(6), Some(9)]);

		assert_eq!(delay_line.reset(), 3);

		for i in 1..=3 {
			assert_eq!(delay_line.issue(Expectation::new(i, 1)), None);
		}
		assert_eq!(delay_line.issue(Expectation::new(4, 1)), Some(Expectation::new(1, 1)));
	}

	#[test]
	fn display() {
		assert_eq!(Expectation::new(10, 20).to_string(), "0x000a * 0x0014 = 0x000000c8");
	}
}
