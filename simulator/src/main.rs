mod array_multiplier;

mod oracle;

mod stimulus;
use stimulus::Stimulus;

mod testbench;

fn main() {
	let log_level = match std::env::var_os("SIMULATOR_LOG") {
		Some(var) if var.to_str() == Some("debug") => LogLevel::Debug,
		Some(var) if var.to_str() == Some("trace") => LogLevel::Trace,
		_ => LogLevel::Info,
	};

	let mut args = std::env::args_os();
	let argv0 = args.next().unwrap_or_else(|| env!("CARGO_BIN_NAME").into());
	let Config { random, seed, resets } = parse_args(args, &argv0);

	let mut statistics: Statistics = Default::default();

	testbench::run(
		Stimulus::new(random, seed),
		&resets,
		&mut statistics,
		log_level,
	);

	println!("{statistics}");

	if !statistics.passed() {
		std::process::exit(1);
	}
}

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
enum LogLevel {
	Info,
	Debug,
	Trace,
}

#[derive(Debug, Default)]
struct Statistics {
	cycles: u64,
	resets: u64,
	issued: u64,
	checks: u64,
	discarded: u64,
	mismatches: u64,
	latency_violations: u64,
	oracle_faults: u64,
}

impl Statistics {
	fn passed(&self) -> bool {
		self.mismatches == 0 && self.oracle_faults == 0
	}
}

impl std::fmt::Display for Statistics {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "cycles:             {}", self.cycles)?;
		writeln!(f, "resets:             {}", self.resets)?;
		writeln!(f, "issued:             {}", self.issued)?;
		writeln!(f, "checked:            {}", self.checks)?;
		writeln!(f, "discarded by reset: {}", self.discarded)?;
		writeln!(f, "mismatches:         {}", self.mismatches)?;
		writeln!(f, "latency violations: {}", self.latency_violations)?;
		writeln!(f, "oracle faults:      {}", self.oracle_faults)?;
		f.write_str(if self.passed() { "PASS" } else { "FAIL" })?;
		Ok(())
	}
}

struct Config {
	random: u64,
	seed: u64,
	resets: std::collections::BTreeSet<u64>,
}

const DEFAULT_RANDOM: u64 = 10_000;

const DEFAULT_SEED: u64 = 0x5eed;

fn parse_args(mut args: impl Iterator<Item = std::ffi::OsString>, argv0: &std::ffi::OsStr) -> Config {
	let mut random = None;
	let mut seed = None;
	let mut resets = std::collections::BTreeSet::new();

	while let Some(opt) = args.next() {
		match opt.to_str() {
			Some("--help") => {
				write_usage(std::io::stdout(), argv0);
				std::process::exit(0);
			},

			Some("--random") if random.is_none() => random = Some(parse_value(args.next().as_deref(), argv0)),

			Some("--seed") if seed.is_none() => seed = Some(parse_value(args.next().as_deref(), argv0)),

			Some("--reset") => {
				let cycle = parse_value(args.next().as_deref(), argv0);
				if cycle == 0 || !resets.insert(cycle) {
					write_usage_and_crash(argv0);
				}
			},

			_ => write_usage_and_crash(argv0),
		}
	}

	Config {
		random: random.unwrap_or(DEFAULT_RANDOM),
		seed: seed.unwrap_or(DEFAULT_SEED),
		resets,
	}
}

fn parse_value(value: Option<&std::ffi::OsStr>, argv0: &std::ffi::OsStr) -> u64 {
	let Some(value) = value.and_then(std::ffi::OsStr::to_str) else { write_usage_and_crash(argv0); };
	let Ok(value) = value.parse() else { write_usage_and_crash(argv0); };
	value
}

fn write_usage_and_crash(argv0: &std::ffi::OsStr) -> ! {
	write_usage(std::io::stderr(), argv0);
	std::process::exit(1);
}

fn write_usage(mut w: impl std::io::Write, argv0: &std::ffi::OsStr) {
	_ = writeln!(w, "Usage: {} [ --random <count> ] [ --seed <seed> ] [ --reset <cycle> ]...", argv0.to_string_lossy());
}
