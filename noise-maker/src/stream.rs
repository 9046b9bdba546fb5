use rand::Rng;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    time::{Duration, sleep},
};

use crate::generator::generate_line;

const MAX_RATE_BEFORE_DISABLING_THROTTLING: u64 = 10_000;

#[derive(Debug, Clone, Copy)]
pub struct StreamConfig {
    pub rate: u64,
    pub batch_size: usize,
    pub count: Option<u64>,
    pub malformed_ratio: f64,
}

impl StreamConfig {
    fn delay(&self) -> Option<Duration> {
        if self.rate == 0 || self.rate >= MAX_RATE_BEFORE_DISABLING_THROTTLING {
            return None;
        }
        Some(Duration::from_secs_f64(self.batch_size as f64 / self.rate as f64))
    }
}

/// Writes generated lines to `writer` in batches until `config.count` lines
/// have gone out. Without a count it only returns on a write error.
pub async fn run_log_stream<W, R>(writer: &mut W, rng: &mut R, config: StreamConfig) -> std::io::Result<u64>
where
    W: AsyncWrite + Unpin,
    R: Rng + ?Sized,
{
    let batch_size = config.batch_size.max(1) as u64;
    let delay = config.delay();
    let mut written = 0u64;

    loop {
        let lines = match config.count {
            Some(count) => batch_size.min(count - written),
            None => batch_size,
        };
        if lines == 0 {
            break;
        }
        let mut buffer = String::with_capacity(lines as usize * 256);
        for _ in 0..lines {
            buffer.push_str(&generate_line(rng, config.malformed_ratio));
            buffer.push('\n');
        }
        writer.write_all(buffer.as_bytes()).await?;
        writer.flush().await?;
        written += lines;

        if let Some(d) = delay {
            sleep(d).await;
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use asserting::prelude::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn config(count: Option<u64>, batch_size: usize) -> StreamConfig {
        StreamConfig {
            rate: 0,
            batch_size,
            count,
            malformed_ratio: 0.0,
        }
    }

    #[tokio::test]
    async fn stops_at_count_across_partial_batch() {
        let mut out = Vec::new();
        let mut rng = StdRng::seed_from_u64(1);
        let written = run_log_stream(&mut out, &mut rng, config(Some(25), 10)).await.unwrap();
        assert_that!(written).is_equal_to(25);
        let text = String::from_utf8(out).unwrap();
        assert_that!(text.lines().count()).is_equal_to(25);
    }

    #[tokio::test]
    async fn zero_count_writes_nothing() {
        let mut out = Vec::new();
        let mut rng = StdRng::seed_from_u64(1);
        let written = run_log_stream(&mut out, &mut rng, config(Some(0), 10)).await.unwrap();
        assert_that!(written).is_equal_to(0);
        assert_that!(out.len()).is_equal_to(0);
    }

    #[test]
    fn throttling() {
        let mut c = config(None, 100);
        assert_that!(c.delay().is_none()).is_true();
        c.rate = 50;
        assert_that!(c.delay()).is_equal_to(Some(Duration::from_secs(2)));
        c.rate = MAX_RATE_BEFORE_DISABLING_THROTTLING;
        assert_that!(c.delay().is_none()).is_true();
    }
}
