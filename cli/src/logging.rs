//! Tracing subscriber setup.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Level selected by the global verbosity flags.
pub fn level_for(verbose: bool, quiet: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        Level::WARN
    }
}

/// Installs a stderr subscriber so stdout stays machine-readable.
pub fn initialize_logging(verbose: bool, quiet: bool) -> Result<(), String> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level_for(verbose, quiet))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("Failed to install logger: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(false, false), Level::WARN);
        assert_eq!(level_for(true, false), Level::DEBUG);
        assert_eq!(level_for(false, true), Level::ERROR);
    }
}
