use csa_multiplier::{Inputs, LATENCY, Pipeline};

use crate::{
	LogLevel,
	Statistics,
	array_multiplier,
	oracle::{DelayLine, Expectation},
};

/// Clocks the pipeline once per operand pair, holding reset on cycle 0 and on every cycle in `resets`,
/// and compares every valid output against the golden model.
///
/// Once the stimulus runs out, idle pairs are issued until the last real pair has been checked.
pub(crate) fn run(
	stimulus: impl IntoIterator<Item = (u16, u16)>,
	resets: &std::collections::BTreeSet<u64>,
	statistics: &mut Statistics,
	log_level: LogLevel,
) {
	let mut pipeline: Pipeline = Default::default();

	let mut delay_line: DelayLine = Default::default();

	let mut stimulus = stimulus.into_iter().fuse();

	let mut drain = LATENCY - 1;

	for cycle in 0_u64.. {
		if log_level == LogLevel::Debug {
			if cycle % 100 == 0 {
				eprintln!();
				eprintln!("===== {cycle} =====");
			}
		}
		else if log_level >= LogLevel::Trace {
			eprintln!();
			eprintln!("===== {cycle} =====");
			eprintln!("{pipeline}");
		}

		let inputs =
			if cycle == 0 || resets.contains(&cycle) {
				Inputs::RESET
			}
			else if let Some((multiplicand, multiplier)) = stimulus.next() {
				statistics.issued += 1;
				Inputs::operands(multiplicand, multiplier)
			}
			else if drain > 0 {
				drain -= 1;
				Inputs::operands(0, 0)
			}
			else {
				break;
			};

		if log_level >= LogLevel::Trace {
			eprintln!("+ {inputs:?}");
		}

		let outputs = pipeline.tick(inputs);
		statistics.cycles += 1;

		let expectation =
			if inputs.reset {
				statistics.resets += 1;
				statistics.discarded += delay_line.reset();
				None
			}
			else {
				let issued = Expectation::new(inputs.multiplicand, inputs.multiplier);
				let baseline = array_multiplier::multiply(inputs.multiplicand, inputs.multiplier);
				if issued.product != Some(baseline) {
					statistics.oracle_faults += 1;
					eprintln!("ORACLE FAULT @ {cycle}: {issued}, array multiplier gives 0x{baseline:08x}");
				}
				delay_line.issue(issued)
			};

		match (outputs.result(), expectation) {
			(Some(product), Some(expectation)) => {
				statistics.checks += 1;
				if expectation.product != Some(product) {
					statistics.mismatches += 1;
					eprintln!("MISMATCH @ {cycle}: expected {expectation}, got 0x{product:08x}");
				}
			},

			(None, None) => (),

			(Some(product), None) => {
				statistics.mismatches += 1;
				statistics.latency_violations += 1;
				eprintln!("MISMATCH @ {cycle}: valid asserted with nothing in flight, got 0x{product:08x}");
			},

			(None, Some(expectation)) => {
				statistics.mismatches += 1;
				statistics.latency_violations += 1;
				eprintln!("MISMATCH @ {cycle}: expected {expectation}, valid deasserted");
			},
		}

		if log_level >= LogLevel::Trace {
			eprintln!("->");
			eprintln!("{pipeline}");
			eprintln!("= {outputs:?}");
		}
	}
}
