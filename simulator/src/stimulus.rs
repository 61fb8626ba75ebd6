use rand::{Rng as _, SeedableRng as _};

/// `(multiplicand, multiplier)` pairs issued before any random ones.
pub(crate) const DIRECTED: &[(u16, u16)] = &[
	(12345, 0),
	(54321, 1),
	(0xffff, 0xffff),
	(1, 0xffff),
	(256, 256),
	(20, 10),

	(0, 0),
	(0xffff, 0),
	(0, 0xffff),
	(0x8000, 0x8000),
	(0xaaaa, 0x5555),
	(0x5555, 0xaaaa),
	(0x00ff, 0xff00),
];

/// The directed pairs followed by `random` seeded pseudo-random ones.
pub(crate) struct Stimulus {
	directed: std::slice::Iter<'static, (u16, u16)>,
	random: u64,
	rng: rand::rngs::StdRng,
}

impl Stimulus {
	pub(crate) fn new(random: u64, seed: u64) -> Self {
		Self {
			directed: DIRECTED.iter(),
			random,
			rng: rand::rngs::StdRng::seed_from_u64(seed),
		}
	}
}

impl Iterator for Stimulus {
	type Item = (u16, u16);

	fn next(&mut self) -> Option<Self::Item> {
		if let Some(&pair) = self.directed.next() {
			return Some(pair);
		}

		if self.random == 0 {
			return None;
		}
		self.random -= 1;

		Some((self.rng.gen_range(0..=u16::MAX), self.rng.gen_range(0..=u16::MAX)))
	}
}
