pub const PARTIAL_PRODUCTS: usize = 16;

/// One row per multiplier bit: the zero-extended multiplicand shifted into that bit's column, or zero.
pub fn partial_products(multiplicand: u16, multiplier: u16) -> [u32; PARTIAL_PRODUCTS] {
	let multiplicand = u32::from(multiplicand);
	core::array::from_fn(|i| if (multiplier >> i) & 1 == 1 { multiplicand << i } else { 0 })
}
