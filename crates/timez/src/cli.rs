use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use supervisor::{CommandSpec, deadline};

use crate::config::{self, TimezConfig};
use crate::error::TimezResult;

#[derive(Debug, Parser)]
#[command(
    name = "timez",
    version,
    about = "Run a command and report its wall-clock time and resource usage",
    after_help = "The report goes to stdout unless --output is given. \
                  Options must come before the command."
)]
pub struct Cli {
    /// Kill the command after this many milliseconds (0 or less: no limit)
    #[arg(
        short,
        long = "duration",
        visible_aliases = ["timeout", "fixed-interval"],
        value_name = "MS",
        env = "TIMEZ_DURATION_MS",
        allow_negative_numbers = true
    )]
    pub duration_ms: Option<i64>,

    /// Write the report to this file instead of stdout (overwritten)
    #[arg(
        short,
        long,
        visible_alias = "output-file",
        value_name = "PATH",
        env = "TIMEZ_OUTPUT"
    )]
    pub output: Option<PathBuf>,

    /// Add CPU time, faults, block I/O and context switches to the report
    #[arg(short, long, env = "TIMEZ_VERBOSE")]
    pub verbose: bool,

    /// Also report /proc/<pid>/io byte counters (with --verbose)
    #[arg(short, long, env = "TIMEZ_IO")]
    pub io: bool,

    /// Run the command words as one script through /bin/sh -c
    #[arg(short, long)]
    pub shell: bool,

    /// YAML file with default settings
    #[arg(short, long, value_name = "PATH", env = "TIMEZ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Command to run, followed by its arguments
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

/// Everything one invocation needs, after merging flags over the config file.
#[derive(Debug)]
pub struct Settings {
    pub command: CommandSpec,
    pub deadline: Option<Duration>,
    pub output: Option<PathBuf>,
    pub verbose: bool,
    pub io_counters: bool,
}

impl Cli {
    pub fn into_settings(self) -> TimezResult<Settings> {
        let file = match &self.config {
            Some(path) => config::load(path)?,
            None => TimezConfig::default(),
        };
        self.merge(file)
    }

    fn merge(self, file: TimezConfig) -> TimezResult<Settings> {
        let command = if self.shell || file.shell {
            CommandSpec::shell(&self.command.join(" "))?
        } else {
            CommandSpec::new(self.command)?
        };

        Ok(Settings {
            command,
            deadline: self
                .duration_ms
                .or(file.duration_ms)
                .and_then(deadline::from_millis),
            output: self.output.or(file.output),
            verbose: self.verbose || file.verbose,
            io_counters: self.io || file.io_counters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("timez").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_keeps_its_own_flags() {
        let cli = parse(&["-v", "ls", "-l", "-v", "/tmp"]);
        assert!(cli.verbose);
        assert_eq!(cli.command, ["ls", "-l", "-v", "/tmp"]);
    }

    #[test]
    fn duration_aliases() {
        for flag in ["-d", "--duration", "--timeout", "--fixed-interval"] {
            let cli = parse(&[flag, "250", "sleep", "1"]);
            assert_eq!(cli.duration_ms, Some(250), "flag {flag}");
        }
    }

    #[test]
    fn negative_duration_parses_and_means_no_deadline() {
        let cli = parse(&["-d", "-5", "true"]);
        assert_eq!(cli.duration_ms, Some(-5));
        let settings = cli.merge(TimezConfig::default()).unwrap();
        assert_eq!(settings.deadline, None);
    }

    #[test]
    fn output_file_alias() {
        let cli = parse(&["--output-file", "report.txt", "true"]);
        assert_eq!(cli.output, Some(PathBuf::from("report.txt")));
    }

    #[test]
    fn missing_command_is_usage_error() {
        let err = Cli::try_parse_from(["timez", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn shell_joins_words() {
        let settings = parse(&["-s", "echo", "hi", ">", "/dev/null"])
            .merge(TimezConfig::default())
            .unwrap();
        assert_eq!(settings.command.argv(), ["/bin/sh", "-c", "echo hi > /dev/null"]);
    }

    #[test]
    fn flags_override_config_file() {
        let file = TimezConfig {
            duration_ms: Some(10_000),
            output: Some(PathBuf::from("/tmp/from-config.txt")),
            verbose: true,
            io_counters: false,
            shell: false,
        };
        let settings = parse(&["-d", "200", "-o", "cli.txt", "sleep", "1"])
            .merge(file)
            .unwrap();

        assert_eq!(settings.deadline, Some(Duration::from_millis(200)));
        assert_eq!(settings.output, Some(PathBuf::from("cli.txt")));
        assert!(settings.verbose);
        assert!(!settings.io_counters);
        assert_eq!(settings.command.argv(), ["sleep", "1"]);
    }

    #[test]
    fn config_file_fills_gaps() {
        let file = TimezConfig {
            duration_ms: Some(750),
            output: None,
            verbose: false,
            io_counters: true,
            shell: true,
        };
        let settings = parse(&["exit", "3"]).merge(file).unwrap();

        assert_eq!(settings.deadline, Some(Duration::from_millis(750)));
        assert!(settings.io_counters);
        assert_eq!(settings.command.argv(), ["/bin/sh", "-c", "exit 3"]);
    }
}
