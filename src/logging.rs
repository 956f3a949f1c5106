use tracing_subscriber::EnvFilter;

/// Workspace crate targets that receive log output.
const CRATE_TARGETS: &[&str] = &["rba", "rba_relief", "rba_stats"];

/// Maps the `-v` count to a level: none → warn, `-v` → info, `-vv` → debug,
/// more → trace.
fn level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Default filter directive for the workspace crates at `verbosity`.
fn default_filter(verbosity: u8) -> String {
    let level = level(verbosity);
    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize tracing on stderr, keeping stdout free for JSON results.
///
/// `RUST_LOG` overrides the CLI verbosity if set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(
            default_filter(0),
            "rba=warn,rba_relief=warn,rba_stats=warn"
        );
        assert!(default_filter(2).contains("rba_relief=debug"));
        assert!(default_filter(9).ends_with("rba_stats=trace"));
    }
}
