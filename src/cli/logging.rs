//! Logging utilities for CLI output

/// Log level for CLI output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Suppress all output
    Quiet,
    /// Normal output level
    Normal,
    /// Verbose output with additional details
    Verbose,
}

impl LogLevel {
    /// Level implied by the global `--verbose` / `--quiet` flags
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Matching filter for the `log` facade
    pub fn filter(self) -> log::LevelFilter {
        match self {
            Self::Quiet => log::LevelFilter::Error,
            Self::Normal => log::LevelFilter::Info,
            Self::Verbose => log::LevelFilter::Debug,
        }
    }
}

/// Log a message if the current level permits it
pub fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if level != LogLevel::Quiet && (level == required || required == LogLevel::Normal) {
        println!("{msg}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_wins_over_verbose() {
        assert_eq!(LogLevel::from_flags(true, true), LogLevel::Quiet);
        assert_eq!(LogLevel::from_flags(true, false), LogLevel::Verbose);
        assert_eq!(LogLevel::from_flags(false, false), LogLevel::Normal);
    }

    #[test]
    fn test_filters() {
        assert_eq!(LogLevel::Quiet.filter(), log::LevelFilter::Error);
        assert_eq!(LogLevel::Verbose.filter(), log::LevelFilter::Debug);
    }
}
