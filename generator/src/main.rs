//! SystemVerilog generator for the four-stage pipelined carry-save multiplier.
//!
//! The compressor wiring is emitted from the same level tables that the software model evaluates,
//! so the two cannot drift apart.
//!
//! Example:
//!
//!     cargo run -p csa-multiplier-generator -- --testbench >./tc/sv/csa_multiplier.sv

use csa_multiplier::{
	Level,
	LATENCY,
	LEVEL_A, LEVEL_B, LEVEL_C, LEVEL_D, LEVEL_E, LEVEL_F,
	MID_TERMS,
	PARTIAL_PRODUCTS,
};

/// `(multiplier, multiplicand)` pairs driven by the generated testbench.
const SCENARIOS: &[(u16, u16)] = &[
	(0, 12345),
	(1, 54321),
	(65535, 65535),
	(65535, 1),
	(256, 256),
	(10, 20),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let mut args = std::env::args_os();
	let argv0 = args.next().unwrap_or_else(|| env!("CARGO_BIN_NAME").into());
	let testbench = parse_args(args, &argv0);

	let mut stdout = std::io::stdout().lock();
	generate(&mut stdout, testbench)?;

	Ok(())
}

fn generate(w: &mut impl std::io::Write, testbench: bool) -> std::io::Result<()> {
	write_multiplier(w)?;
	writeln!(w)?;
	write_csa(w)?;

	if testbench {
		writeln!(w)?;
		write_testbench(w)?;
	}

	Ok(())
}

fn write_multiplier(w: &mut impl std::io::Write) -> std::io::Result<()> {
	writeln!(w, "module csa_multiplier (")?;
	writeln!(w, "\tinput bit clk,")?;
	writeln!(w, "\tinput bit reset,")?;
	writeln!(w)?;
	writeln!(w, "\tinput bit[15:0] a,")?;
	writeln!(w, "\tinput bit[15:0] b,")?;
	writeln!(w)?;
	writeln!(w, "\toutput bit[31:0] product,")?;
	writeln!(w, "\toutput bit valid")?;
	writeln!(w, ");")?;

	writeln!(w, "\tbit[31:0] pp[{PARTIAL_PRODUCTS}];")?;
	writeln!(w, "\tbit[31:0] r[{MID_TERMS}];")?;
	writeln!(w, "\tbit[31:0] final_sum, final_carry;")?;
	writeln!(w, "\tbit[{}:0] valid_sr;", LATENCY - 1)?;
	writeln!(w)?;

	write_level(w, &LEVEL_A, "pp")?;
	write_level(w, &LEVEL_B, "level_a")?;
	write_level(w, &LEVEL_C, "level_b")?;
	write_level(w, &LEVEL_D, "r")?;
	write_level(w, &LEVEL_E, "level_d")?;
	write_level(w, &LEVEL_F, "level_e")?;

	writeln!(w, "\talways_ff @(posedge clk) begin")?;
	writeln!(w, "\t\tif (reset) begin")?;
	writeln!(w, "\t\t\tfor (int i = 0; i < {PARTIAL_PRODUCTS}; i++) pp[i] <= '0;")?;
	writeln!(w, "\t\t\tfor (int i = 0; i < {MID_TERMS}; i++) r[i] <= '0;")?;
	writeln!(w, "\t\t\tfinal_sum <= '0;")?;
	writeln!(w, "\t\t\tfinal_carry <= '0;")?;
	writeln!(w, "\t\t\tproduct <= '0;")?;
	writeln!(w, "\t\t\tvalid_sr <= '0;")?;
	writeln!(w, "\t\tend")?;
	writeln!(w, "\t\telse begin")?;
	writeln!(w, "\t\t\tfor (int i = 0; i < {PARTIAL_PRODUCTS}; i++) pp[i] <= a[i] ? (32'(b) << i) : '0;")?;
	writeln!(w, "\t\t\tfor (int i = 0; i < {MID_TERMS}; i++) r[i] <= level_c[i];")?;
	writeln!(w, "\t\t\tfinal_sum <= level_f[0];")?;
	writeln!(w, "\t\t\tfinal_carry <= level_f[1];")?;
	writeln!(w, "\t\t\tproduct <= final_sum + final_carry;")?;
	writeln!(w, "\t\t\tvalid_sr <= {{valid_sr[{}:0], 1'b1}};", LATENCY - 2)?;
	writeln!(w, "\t\tend")?;
	writeln!(w, "\tend")?;
	writeln!(w)?;
	writeln!(w, "\tassign valid = valid_sr[{}];", LATENCY - 1)?;
	writeln!(w, "endmodule")?;

	Ok(())
}

fn write_level<const INPUTS: usize, const OUTPUTS: usize>(
	w: &mut impl std::io::Write,
	level: &Level<INPUTS, OUTPUTS>,
	input: &str,
) -> std::io::Result<()> {
	let name = level.name.to_ascii_lowercase();
	let output = format!("level_{name}");

	writeln!(w, "\t// {INPUTS} -> {OUTPUTS}")?;
	writeln!(w, "\twire[31:0] {output}[{OUTPUTS}];")?;

	for (group_i, &[a, b, c]) in level.groups.iter().enumerate() {
		writeln!(
			w,
			"\tcsa csa_{name}{group_i} (.a({input}[{a}]), .b({input}[{b}]), .c({input}[{c}]), .sum({output}[{}]), .carry({output}[{}]));",
			level.sum_index(group_i),
			level.carry_index(group_i),
		)?;
	}

	for (pass_i, &i) in level.passthrough.iter().enumerate() {
		writeln!(w, "\tassign {output}[{}] = {input}[{i}];", level.passthrough_index(pass_i))?;
	}

	writeln!(w)?;

	Ok(())
}

fn write_csa(w: &mut impl std::io::Write) -> std::io::Result<()> {
	writeln!(w, "module csa (")?;
	writeln!(w, "\tinput bit[31:0] a,")?;
	writeln!(w, "\tinput bit[31:0] b,")?;
	writeln!(w, "\tinput bit[31:0] c,")?;
	writeln!(w, "\toutput bit[31:0] sum,")?;
	writeln!(w, "\toutput bit[31:0] carry")?;
	writeln!(w, ");")?;
	writeln!(w, "\tassign sum = a ^ b ^ c;")?;
	writeln!(w, "\tassign carry = {{(a[30:0] & b[30:0]) | (b[30:0] & c[30:0]) | (a[30:0] & c[30:0]), 1'b0}};")?;
	writeln!(w, "endmodule")?;

	Ok(())
}

fn write_testbench(w: &mut impl std::io::Write) -> std::io::Result<()> {
	writeln!(w, "`ifdef TESTING")?;
	writeln!(w, "module test_csa_multiplier;")?;
	writeln!(w, "\tbit clk;")?;
	writeln!(w, "\tbit reset;")?;
	writeln!(w, "\tbit[15:0] a;")?;
	writeln!(w, "\tbit[15:0] b;")?;
	writeln!(w, "\twire[31:0] product;")?;
	writeln!(w, "\twire valid;")?;
	writeln!(w, "\tcsa_multiplier csa_multiplier_module (")?;
	writeln!(w, "\t\t.clk(clk), .reset(reset),")?;
	writeln!(w, "\t\t.a(a), .b(b),")?;
	writeln!(w, "\t\t.product(product), .valid(valid)")?;
	writeln!(w, "\t);")?;
	writeln!(w)?;
	writeln!(w, "\tinitial begin")?;
	writeln!(w, "\t\treset = '1;")?;
	writeln!(w, "\t\t#1 clk = '1; #1 clk = '0;")?;
	writeln!(w, "\t\tassert(valid == '0) else $fatal;")?;
	writeln!(w, "\t\treset = '0;")?;

	for cycle in 0..(SCENARIOS.len() + LATENCY - 1) {
		let (multiplier, multiplicand) = SCENARIOS.get(cycle).copied().unwrap_or_default();

		writeln!(w)?;
		writeln!(w, "\t\ta = 16'd{multiplier};")?;
		writeln!(w, "\t\tb = 16'd{multiplicand};")?;
		writeln!(w, "\t\t#1 clk = '1; #1 clk = '0;")?;

		if let Some(issued) = (cycle + 1).checked_sub(LATENCY) {
			let (multiplier, multiplicand) = SCENARIOS[issued];
			let expected = csa_multiplier::multiply(multiplicand, multiplier);
			writeln!(w, "\t\tassert(valid == '1 && product == 32'd{expected}) else $fatal;")?;
		}
		else {
			writeln!(w, "\t\tassert(valid == '0) else $fatal;")?;
		}
	}

	writeln!(w, "\tend")?;
	writeln!(w, "endmodule")?;
	writeln!(w, "`endif")?;

	Ok(())
}

fn parse_args(args: impl Iterator<Item = std::ffi::OsString>, argv0: &std::ffi::OsStr) -> bool {
	let mut testbench = false;

	for opt in args {
		match opt.to_str() {
			Some("--help") => {
				write_usage(std::io::stdout(), argv0);
				std::process::exit(0);
			},

			Some("--testbench") => testbench = true,

			_ => write_usage_and_crash(argv0),
		}
	}

	testbench
}

fn write_usage_and_crash(argv0: &std::ffi::OsStr) -> ! {
	write_usage(std::io::stderr(), argv0);
	std::process::exit(1);
}

fn write_usage(mut w: impl std::io::Write, argv0: &std::ffi::OsStr) {
	_ = writeln!(w, "Usage: {} [--testbench]", argv0.to_string_lossy());
}

#[cfg(test)]
mod tests {
	use super::generate;

	fn render(testbench: bool) -> String {
		let mut out = vec![];
		generate(&mut out, testbench).unwrap();
		String::from_utf8(out).unwrap()
	}

	#[test]
	fn wiring() {
		let sv = render(false);

		assert_eq!(sv.matches("\tcsa csa_").count(), 5 + 3 + 2 + 2 + 1 + 1);

		assert!(sv.contains("\tcsa csa_a0 (.a(pp[0]), .b(pp[1]), .c(pp[2]), .sum(level_a[0]), .carry(level_a[5]));\n"));
		assert!(sv.contains("\tcsa csa_a4 (.a(pp[12]), .b(pp[13]), .c(pp[14]), .sum(level_a[4]), .carry(level_a[9]));\n"));
		assert!(sv.contains("\tassign level_a[10] = pp[15];\n"));

		assert!(sv.contains("\twire[31:0] level_c[6];\n"));
		assert!(sv.contains("\twire[31:0] level_d[4];\n"));
		assert!(sv.contains("\tcsa csa_d0 (.a(r[0]), .b(r[1]), .c(r[2]), .sum(level_d[0]), .carry(level_d[2]));\n"));
		assert!(sv.contains("\tcsa csa_d1 (.a(r[3]), .b(r[4]), .c(r[5]), .sum(level_d[1]), .carry(level_d[3]));\n"));
		assert!(!sv.contains("\tassign level_d["));

		assert!(sv.contains("\tcsa csa_f0 (.a(level_e[0]), .b(level_e[1]), .c(level_e[2]), .sum(level_f[0]), .carry(level_f[1]));\n"));

		assert!(sv.contains("\t\t\tvalid_sr <= {valid_sr[2:0], 1'b1};\n"));
		assert!(sv.contains("\tassign valid = valid_sr[3];\n"));

		assert!(!sv.contains("`ifdef TESTING"));
	}

	#[test]
	fn testbench() {
		let sv = render(true);

		assert!(sv.contains("`ifdef TESTING\nmodule test_csa_multiplier;\n"));
		assert!(sv.ends_with("endmodule\n`endif\n"));

		let checks: Vec<_> = sv.lines().filter(|line| line.contains("product == ")).collect();
		assert_eq!(checks, [
			"\t\tassert(valid == '1 && product == 32'd0) else $fatal;",
			"\t\tassert(valid == '1 && product == 32'd54321) else $fatal;",
			"\t\tassert(valid == '1 && product == 32'd4294836225) else $fatal;",
			"\t\tassert(valid == '1 && product == 32'd65535) else $fatal;",
			"\t\tassert(valid == '1 && product == 32'd65536) else $fatal;",
			"\t\tassert(valid == '1 && product == 32'd200) else $fatal;",
		]);
	}
}
