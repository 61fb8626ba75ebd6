//! Carry-save reduction of the sixteen partial products down to a single sum / carry pair.
//!
//! The tree has six levels:
//!
//! +-------+-------------+-------------+-------------+
//! | Level | Terms       | Compressors | Passthrough |
//! +=======+=============+=============+=============+
//! | A     | 16 -> 11    | 5           | 1           |
//! | B     | 11 -> 8     | 3           | 2           |
//! | C     | 8 -> 6      | 2           | 2           |
//! | D     | 6 -> 4      | 2           | 0           |
//! | E     | 4 -> 3      | 1           | 1           |
//! | F     | 3 -> 2      | 1           | 0           |
//! +-------+-------------+-------------+-------------+
//!
//! Levels A-C form the second pipeline stage and levels D-F the third.
//!
//! The output of every level is laid out as all sums, then all carries, then passthroughs,
//! each in table order. The next level's groups index into that layout.

use crate::{
	compressor::{Compressed, compress},
	partial_products::{PARTIAL_PRODUCTS, partial_products},
};

/// Terms held in the register bank between the second and third pipeline stages.
pub const MID_TERMS: usize = 6;

/// One level of the tree: which input terms feed which compressor, and which are forwarded untouched.
#[derive(Debug)]
pub struct Level<const INPUTS: usize, const OUTPUTS: usize> {
	pub name: char,
	pub groups: &'static [[usize; 3]],
	pub passthrough: &'static [usize],
}

impl<const INPUTS: usize, const OUTPUTS: usize> Level<INPUTS, OUTPUTS> {
	/// Every input is consumed exactly once, and the output count matches the layout.
	pub const fn is_well_formed(&self) -> bool {
		if self.groups.len() * 2 + self.passthrough.len() != OUTPUTS {
			return false;
		}

		let mut seen = [false; INPUTS];

		let mut group_i = 0;
		while group_i < self.groups.len() {
			let group = self.groups[group_i];
			let mut j = 0;
			while j < 3 {
				let i = group[j];
				if i >= INPUTS || seen[i] {
					return false;
				}
				seen[i] = true;
				j += 1;
			}
			group_i += 1;
		}

		let mut pass_i = 0;
		while pass_i < self.passthrough.len() {
			let i = self.passthrough[pass_i];
			if i >= INPUTS || seen[i] {
				return false;
			}
			seen[i] = true;
			pass_i += 1;
		}

		let mut i = 0;
		while i < INPUTS {
			if !seen[i] {
				return false;
			}
			i += 1;
		}

		true
	}

	pub fn reduce(&self, terms: &[u32; INPUTS]) -> [u32; OUTPUTS] {
		let mut result = [0; OUTPUTS];

		let num_groups = self.groups.len();
		for (group_i, &[a, b, c]) in self.groups.iter().enumerate() {
			let Compressed { sum, carry } = compress(terms[a], terms[b], terms[c]);
			result[group_i] = sum;
			result[num_groups + group_i] = carry;
		}

		for (pass_i, &i) in self.passthrough.iter().enumerate() {
			result[num_groups * 2 + pass_i] = terms[i];
		}

		result
	}

	/// Index in this level's output of the sum of compressor `group_i`.
	#[allow(clippy::unused_self)]
	pub const fn sum_index(&self, group_i: usize) -> usize {
		group_i
	}

	/// Index in this level's output of the carry of compressor `group_i`.
	pub const fn carry_index(&self, group_i: usize) -> usize {
		self.groups.len() + group_i
	}

	/// Index in this level's output of the `pass_i`th passthrough term.
	pub const fn passthrough_index(&self, pass_i: usize) -> usize {
		self.groups.len() * 2 + pass_i
	}
}

pub const LEVEL_A: Level<PARTIAL_PRODUCTS, 11> = Level {
	name: 'A',
	groups: &[[0, 1, 2], [3, 4, 5], [6, 7, 8], [9, 10, 11], [12, 13, 14]],
	passthrough: &[15],
};

pub const LEVEL_B: Level<11, 8> = Level {
	name: 'B',
	groups: &[[0, 1, 2], [3, 4, 5], [6, 7, 8]],
	passthrough: &[9, 10],
};

pub const LEVEL_C: Level<8, MID_TERMS> = Level {
	name: 'C',
	groups: &[[0, 1, 2], [3, 4, 5]],
	passthrough: &[6, 7],
};

pub const LEVEL_D: Level<MID_TERMS, 4> = Level {
	name: 'D',
	groups: &[[0, 1, 2], [3, 4, 5]],
	passthrough: &[],
};

pub const LEVEL_E: Level<4, 3> = Level {
	name: 'E',
	groups: &[[0, 1, 2]],
	passthrough: &[3],
};

pub const LEVEL_F: Level<3, 2> = Level {
	name: 'F',
	groups: &[[0, 1, 2]],
	passthrough: &[],
};

const _: () = {
	assert!(LEVEL_A.is_well_formed());
	assert!(LEVEL_B.is_well_formed());
	assert!(LEVEL_C.is_well_formed());
	assert!(LEVEL_D.is_well_formed());
	assert!(LEVEL_E.is_well_formed());
	assert!(LEVEL_F.is_well_formed());
};

/// Levels A-C.
pub fn reduce_to_mid(partial_products: &[u32; PARTIAL_PRODUCTS]) -> [u32; MID_TERMS] {
	LEVEL_C.reduce(&LEVEL_B.reduce(&LEVEL_A.reduce(partial_products)))
}

/// Levels D-F.
pub fn reduce_to_pair(mid: &[u32; MID_TERMS]) -> Compressed {
	let [sum, carry] = LEVEL_F.reduce(&LEVEL_E.reduce(&LEVEL_D.reduce(mid)));
	Compressed { sum, carry }
}

/// The whole datapath with no pipeline registers in between.
pub fn multiply(multiplicand: u16, multiplier: u16) -> u32 {
	reduce_to_pair(&reduce_to_mid(&partial_products(multiplicand, multiplier))).total()
}

#[cfg(test)]
mod tests {
	use rand::{Rng as _, SeedableRng as _};

	use super::{
		LEVEL_A, LEVEL_B, LEVEL_C, LEVEL_D, LEVEL_E, LEVEL_F,
		Level,
		multiply,
	};
	use crate::partial_products::partial_products;

	fn total<const N: usize>(terms: &[u32; N]) -> u64 {
		terms.iter().copied().map(u64::from).sum()
	}

	fn check_level<const INPUTS: usize, const OUTPUTS: usize>(
		level: &Level<INPUTS, OUTPUTS>,
		terms: &[u32; INPUTS],
	) -> [u32; OUTPUTS] {
		let result = level.reduce(terms);
		assert_eq!(total(&result), total(terms), "level {} does not conserve {terms:08x?}", level.name);
		result
	}

	#[test]
	fn malformed_levels_are_rejected() {
		let dropped: Level<4, 3> = Level { name: 'x', groups: &[[0, 1, 2]], passthrough: &[] };
		assert!(!dropped.is_well_formed());

		let double_counted: Level<3, 3> = Level { name: 'x', groups: &[[0, 1, 2]], passthrough: &[2] };
		assert!(!double_counted.is_well_formed());

		let out_of_range: Level<3, 2> = Level { name: 'x', groups: &[[0, 1, 3]], passthrough: &[] };
		assert!(!out_of_range.is_well_formed());
	}

	#[test]
	fn conservation() {
		let mut rng = rand::rngs::StdRng::seed_from_u64(0x1606);
		for _ in 0..10_000 {
			let multiplicand: u16 = rng.gen_range(0..=u16::MAX);
			let multiplier: u16 = rng.gen_range(0..=u16::MAX);

			let pp = partial_products(multiplicand, multiplier);
			let after_a = check_level(&LEVEL_A, &pp);
			let after_b = check_level(&LEVEL_B, &after_a);
			let after_c = check_level(&LEVEL_C, &after_b);
			let after_d = check_level(&LEVEL_D, &after_c);
			let after_e = check_level(&LEVEL_E, &after_d);
			let pair = check_level(&LEVEL_F, &after_e);

			assert_eq!(total(&pair), u64::from(multiplicand) * u64::from(multiplier));
		}
	}

	#[test]
	fn conservation_of_arbitrary_terms() {
		// Arbitrary rows can exceed 32 bits in total, so only the value modulo 2^32 is preserved.
		fn wrapping_total<const N: usize>(terms: &[u32; N]) -> u32 {
			terms.iter().fold(0, |acc, &term| acc.wrapping_add(term))
		}

		let mut rng = rand::rngs::StdRng::seed_from_u64(0x1607);
		for _ in 0..1_000 {
			let pp: [u32; 16] = core::array::from_fn(|_| rng.gen_range(0..=u32::MAX));
			let expected = wrapping_total(&pp);

			let after_a = LEVEL_A.reduce(&pp);
			assert_eq!(wrapping_total(&after_a), expected);
			let after_b = LEVEL_B.reduce(&after_a);
			assert_eq!(wrapping_total(&after_b), expected);
			let after_c = LEVEL_C.reduce(&after_b);
			assert_eq!(wrapping_total(&after_c), expected);
			let after_d = LEVEL_D.reduce(&after_c);
			assert_eq!(wrapping_total(&after_d), expected);
			let after_e = LEVEL_E.reduce(&after_d);
			assert_eq!(wrapping_total(&after_e), expected);
			let pair = LEVEL_F.reduce(&after_e);
			assert_eq!(wrapping_total(&pair), expected);
		}
	}

	#[test]
	fn levels_are_well_formed() {
		assert!(LEVEL_A.is_well_formed());
		assert!(LEVEL_B.is_well_formed());
		assert!(LEVEL_C.is_well_formed());
		assert!(LEVEL_D.is_well_formed());
		assert!(LEVEL_E.is_well_formed());
		assert!(LEVEL_F.is_well_formed());

		// 6 -> 4 needs two compressors; one compressor plus three passthroughs would leave five terms.
		let one_compressor: Level<6, 4> = Level { name: 'x', groups: &[[0, 1, 2]], passthrough: &[3, 4, 5] };
		assert!(!one_compressor.is_well_formed());
	}

	#[test]
	fn level_d_layout() {
		let out = LEVEL_D.reduce(&[1, 1, 0, 4, 4, 4]);
		assert_eq!(out, [0, 4, 2, 8]);
		assert_eq!(out[LEVEL_D.sum_index(1)], 4);
		assert_eq!(out[LEVEL_D.carry_index(0)], 2);
	}

	#[test]
	fn level_a_layout() {
		let mut pp = [0; 16];
		pp[15] = 0xdead;
		pp[12] = 1;
		pp[13] = 1;
		let out = LEVEL_A.reduce(&pp);
		assert_eq!(out[LEVEL_A.sum_index(4)], 0);
		assert_eq!(out[LEVEL_A.carry_index(4)], 2);
		assert_eq!(out[LEVEL_A.passthrough_index(0)], 0xdead);
	}

	#[test]
	fn products() {
		const TESTS: &[(u16, u16, u32)] = &[
			(0, 12345, 0),
			(1, 54321, 54321),
			(0xffff, 0xffff, 4_294_836_225),
			(0xffff, 1, 0xffff),
			(256, 256, 65536),
			(10, 20, 200),
			(0x8000, 0x8000, 0x4000_0000),
			(0xaaaa, 0x5555, 0x38e3_1c72),
		];
		for &(multiplier, multiplicand, expected) in TESTS {
			assert_eq!(multiply(multiplicand, multiplier), expected, "{multiplier} * {multiplicand}");
			assert_eq!(multiply(multiplier, multiplicand), expected, "{multiplicand} * {multiplier}");
		}
	}

	#[test]
	fn exhaustive_multiplicand_for_sparse_multipliers() {
		for multiplier in (0..16).map(|i| 1_u16 << i).chain([0x0f0f, 0xf0f0, 0xffff]) {
			for multiplicand in 0..=u16::MAX {
				assert_eq!(multiply(multiplicand, multiplier), u32::from(multiplicand) * u32::from(multiplier));
			}
		}
	}
}
