use chrono::Local;
use rand::{Rng, seq::IndexedRandom};

const METHODS: [(&str, u8); 4] = [("GET", 6), ("POST", 2), ("PUT", 1), ("DELETE", 1)];
const PATHS: [(&str, u8); 8] = [
    ("/", 10),
    ("/login", 10),
    ("/api", 50),
    ("/admin", 5),
    ("/splash", 20),
    ("/intranet-analytics/", 15),
    ("http://example.net/faq/", 5),
    ("/search?q=rust%20logs", 3),
];
const STATUS: [(u16, u8); 6] = [
    (200, 50),
    (201, 10),
    (400, 10),
    (401, 20),
    (404, 50),
    (500, 5),
];
const ROLES: [(&str, u8); 3] = [("-", 20), ("admin", 1), ("editor", 1)];
const REFERRERS: [(&str, u8); 4] = [
    ("-", 10),
    ("http://example.net/", 3),
    ("https://www.google.com/", 2),
    (r#"http://example.net/search?q=\"rust logs\""#, 2),
];
const USER_AGENTS: [(&str, u8); 5] = [
    (
        "Mozilla/5.0 (X11; U; Linux x86_64; fr-FR) AppleWebKit/534.7 (KHTML, like Gecko) Epiphany/2.30.6 Safari/534.7",
        10,
    ),
    (
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36",
        20,
    ),
    ("curl/8.5.0", 5),
    ("-", 2),
    ("", 1),
];

struct LineParts {
    ip: String,
    role: &'static str,
    timestamp: String,
    request: String,
    status: u16,
    size: u32,
    referrer: &'static str,
    agent: &'static str,
}

impl LineParts {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let method = METHODS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
        let path = PATHS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
        Self {
            ip: format!(
                "192.168.{}.{}",
                rng.random_range(0..256),
                rng.random_range(0..256)
            ),
            role: ROLES.choose_weighted(rng, |(_, w)| *w).unwrap().0,
            timestamp: Local::now().format("%d/%b/%Y:%H:%M:%S %z").to_string(),
            request: format!("{method} {path} HTTP/1.1"),
            status: STATUS.choose_weighted(rng, |(_, w)| *w).unwrap().0,
            size: rng.random_range(100..2000),
            referrer: REFERRERS.choose_weighted(rng, |(_, w)| *w).unwrap().0,
            agent: USER_AGENTS.choose_weighted(rng, |(_, w)| *w).unwrap().0,
        }
    }

    fn render(&self) -> String {
        let Self {
            ip,
            role,
            timestamp,
            request,
            status,
            size,
            referrer,
            agent,
        } = self;
        format!(
            "{ip} - {role} [{timestamp}] \"{request}\" {status} {size} \"{referrer}\" \"{agent}\""
        )
    }
}

pub fn generate_combined_log<R: Rng + ?Sized>(rng: &mut R) -> String {
    LineParts::random(rng).render()
}

/// A line the analyzer must reject.
pub fn generate_malformed_log<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut parts = LineParts::random(rng);
    match rng.random_range(0..4) {
        0 => {
            let path = PATHS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
            parts.request = format!("{path} HTTP/1.1");
            parts.render()
        }
        1 => {
            parts.timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%:z").to_string();
            parts.render()
        }
        2 => "connection reset by peer".to_string(),
        _ => String::new(),
    }
}

pub fn generate_line<R: Rng + ?Sized>(rng: &mut R, malformed_ratio: f64) -> String {
    if rng.random_bool(malformed_ratio) {
        generate_malformed_log(rng)
    } else {
        generate_combined_log(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asserting::prelude::*;
    use log_analyzer::parser::parse;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn combined_lines_parse() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let line = generate_combined_log(&mut rng);
            assert_that!(parse(&line).is_some()).is_true();
        }
    }

    #[test]
    fn escaped_referrer_parses() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut parts = LineParts::random(&mut rng);
        parts.referrer = REFERRERS[3].0;
        parts.agent = "curl/8.5.0";
        let entry = parse(&parts.render()).unwrap();
        assert_that!(entry.user_agent.as_str()).is_equal_to("curl/8.5.0");
    }

    #[test]
    fn malformed_lines_do_not_parse() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let line = generate_malformed_log(&mut rng);
            assert_that!(parse(&line).is_none()).is_true();
        }
    }

    #[test]
    fn ratio_extremes() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert_that!(parse(&generate_line(&mut rng, 0.0)).is_some()).is_true();
            assert_that!(parse(&generate_line(&mut rng, 1.0)).is_none()).is_true();
        }
    }
}
