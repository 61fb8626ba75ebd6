/// 4-bit shift register that runs alongside the datapath. A token enters at bit 0 on every running edge
/// and reaches bit 3 after as many edges as the data takes to reach the output register.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(transparent)]
pub struct ValidityTracker(u8);

impl ValidityTracker {
	const TOP: u8 = 1 << (crate::LATENCY - 1);
	const MASK: u8 = (Self::TOP << 1) - 1;

	pub const CLEAR: Self = Self(0);

	#[must_use]
	pub const fn shift(self) -> Self {
		Self(((self.0 << 1) | 1) & Self::MASK)
	}

	pub const fn valid(self) -> bool {
		self.0 & Self::TOP != 0
	}

	pub const fn bits(self) -> u8 {
		self.0
	}
}

impl core::fmt::Display for ValidityTracker {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "0b{:04b}", self.0)
	}
}
