//! Startup configuration.

use std::path::PathBuf;

/// Environment variable consulted when no path argument is given.
pub const DATA_PATH_ENV: &str = "SALES_DASHBOARD_DATA";

/// Used when neither the argument nor the environment names a file.
pub const DEFAULT_DATA_PATH: &str = "sales_data.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Dataset opened at startup.
    pub data_path: PathBuf,
}

impl DashboardConfig {
    /// Resolve from the process arguments and environment.
    ///
    /// Priority: first positional argument, then `SALES_DASHBOARD_DATA`,
    /// then `sales_data.csv` in the working directory.
    pub fn from_env() -> Self {
        Self::resolve(std::env::args().skip(1), std::env::var(DATA_PATH_ENV).ok())
    }

    /// `args` excludes the program name.
    pub fn resolve(mut args: impl Iterator<Item = String>, env_path: Option<String>) -> Self {
        let given = |p: &String| !p.trim().is_empty();
        let data_path = args
            .next()
            .filter(given)
            .or_else(|| env_path.filter(given))
            .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());

        DashboardConfig {
            data_path: PathBuf::from(data_path),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn argument_wins_over_environment() {
        let cfg = DashboardConfig::resolve(args(&["q3.csv"]), Some("env.csv".into()));
        assert_eq!(cfg.data_path, PathBuf::from("q3.csv"));
    }

    #[test]
    fn environment_is_used_without_argument() {
        let cfg = DashboardConfig::resolve(args(&[]), Some("env.parquet".into()));
        assert_eq!(cfg.data_path, PathBuf::from("env.parquet"));
    }

    #[test]
    fn blank_argument_defers_to_environment() {
        let cfg = DashboardConfig::resolve(args(&[""]), Some("env.csv".into()));
        assert_eq!(cfg.data_path, PathBuf::from("env.csv"));
    }

    #[test]
    fn falls_back_to_default_file() {
        assert_eq!(DashboardConfig::resolve(args(&[]), None), DashboardConfig::default());
        assert_eq!(
            DashboardConfig::resolve(args(&[]), Some("  ".into())).data_path,
            PathBuf::from(DEFAULT_DATA_PATH)
        );
    }
}
