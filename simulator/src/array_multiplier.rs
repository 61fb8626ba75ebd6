//! Ref: `array_multiplier.sv`
//!
//! Single-cycle baseline: a chain of sixteen 32-bit adders, each adding the multiplicand shifted into its column
//! when the corresponding multiplier bit is set. Only used to check the golden model.

mod awint {
	use awint::{Bits, InlAwi};

	type Awi16 = awint::inlawi_ty!(16);
	type Awi32 = awint::inlawi_ty!(32);

	#[derive(Clone, Copy, Debug)]
	#[repr(transparent)]
	pub(super) struct U32(Awi32);

	impl From<u16> for U32 {
		fn from(i: u16) -> Self {
			let i: Awi16 = i.into();
			let mut result = Awi32::zero();
			result.zero_resize_(&i);
			Self(result)
		}
	}

	impl U32 {
		pub(super) fn zero() -> Self {
			Self(Awi32::zero())
		}

		pub(super) fn to_u32(self) -> u32 {
			self.0.to_u32()
		}
	}

	impl std::ops::AddAssign for U32 {
		fn add_assign(&mut self, rhs: Self) {
			self.0.add_(&rhs.0).unwrap();
		}
	}

	impl std::ops::Shl<usize> for U32 {
		type Output = Self;

		fn shl(self, rhs: usize) -> Self::Output {
			let mut inner = self.0;
			inner.shl_(rhs).unwrap();
			Self(inner)
		}
	}
}
use awint::U32;

pub(crate) fn multiply(multiplicand: u16, multiplier: u16) -> u32 {
	let multiplicand: U32 = multiplicand.into();

	let mut acc = U32::zero();
	for i in 0..16 {
		if (multiplier >> i) & 1 == 1 {
			acc += multiplicand << i;
		}
	}
	acc.to_u32()
}
