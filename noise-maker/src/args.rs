use std::path::PathBuf;

use clap::Parser;
use derive_getters::Getters;

#[derive(Parser, Debug, Getters)]
#[command(name = "noise-maker")]
#[command(about = "Generate fake combined-format access logs", long_about = None)]
pub struct CliArgs {
    /// File to write to; standard output when omitted
    #[arg(long)]
    output: Option<PathBuf>,

    /// Stop after this many lines instead of running until Ctrl-C
    #[arg(long)]
    count: Option<u64>,

    /// Lines per second, 0 for as fast as possible
    #[arg(long, default_value_t = 0)]
    rate: u64,

    #[arg(long, default_value_t = 1000)]
    batch_size: usize,

    /// Fraction of lines that are deliberately unparseable
    #[arg(long, default_value_t = 0.0, value_parser = parse_ratio)]
    malformed_ratio: f64,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_ratio(s: &str) -> Result<f64, String> {
    let ratio: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(format!("{ratio} is not between 0 and 1"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asserting::prelude::*;

    #[test]
    fn defaults() {
        let args = CliArgs::parse_from(["noise-maker"]);
        assert_that!(*args.rate()).is_equal_to(0);
        assert_that!(*args.batch_size()).is_equal_to(1000);
        assert_that!(args.output().is_none()).is_true();
        assert_that!(args.count().is_none()).is_true();
    }

    #[test]
    fn ratio_must_be_a_fraction() {
        assert_that!(CliArgs::try_parse_from(["noise-maker", "--malformed-ratio", "1.5"]).is_err())
            .is_true();
        let args = CliArgs::try_parse_from(["noise-maker", "--malformed-ratio", "0.25"]).unwrap();
        assert_that!(*args.malformed_ratio()).is_equal_to(0.25);
    }
}
