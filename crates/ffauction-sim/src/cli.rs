// Command-line arguments for the `ffauction` binary.

use std::path::PathBuf;

use thiserror::Error;

pub const USAGE: &str = "\
Usage: ffauction [CONFIG] [OPTIONS]

Simulate a fantasy football auction draft.

Arguments:
  [CONFIG]            Path to auction.toml (default: ./config/auction.toml,
                      then the platform config directory)

Options:
  --players <PATH>    Player sheet to load instead of the configured one
  --seed <N>          Override the simulation seed
  --json              Print the result as JSON instead of a report
  -h, --help          Print this help
";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("unknown option `{0}`")]
    UnknownOption(String),

    #[error("option `{0}` needs a value")]
    MissingValue(String),

    #[error("invalid value `{value}` for `{option}`")]
    InvalidValue { option: String, value: String },

    #[error("unexpected argument `{0}`")]
    Unexpected(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub players: Option<PathBuf>,
    pub seed: Option<u64>,
    pub json: bool,
    pub help: bool,
}

impl Args {
    /// Parse arguments, not including the program name.
    pub fn parse<I, S>(args: I) -> Result<Args, ArgsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out = Args::default();
        let mut iter = args.into_iter().map(Into::into);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-h" | "--help" => out.help = true,
                "--json" => out.json = true,
                "--players" => {
                    let value = iter.next().ok_or_else(|| ArgsError::MissingValue(arg.clone()))?;
                    out.players = Some(PathBuf::from(value));
                }
                "--seed" => {
                    let value = iter.next().ok_or_else(|| ArgsError::MissingValue(arg.clone()))?;
                    let seed = value.parse().map_err(|_| ArgsError::InvalidValue {
                        option: arg.clone(),
                        value,
                    })?;
                    out.seed = Some(seed);
                }
                s if s.starts_with('-') => return Err(ArgsError::UnknownOption(arg)),
                _ if out.config.is_none() => out.config = Some(PathBuf::from(arg)),
                _ => return Err(ArgsError::Unexpected(arg)),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_args() {
        assert_eq!(Args::parse(Vec::<String>::new()).unwrap(), Args::default());
    }

    #[test]
    fn all_options() {
        let args = Args::parse(["league.toml", "--json", "--seed", "42", "--players", "p.csv"]).unwrap();
        assert_eq!(
            args,
            Args {
                config: Some("league.toml".into()),
                players: Some("p.csv".into()),
                seed: Some(42),
                json: true,
                help: false,
            }
        );
    }

    #[test]
    fn bad_args() {
        assert_eq!(
            Args::parse(["--seed"]).unwrap_err(),
            ArgsError::MissingValue("--seed".into())
        );
        assert_eq!(
            Args::parse(["--seed", "abc"]).unwrap_err(),
            ArgsError::InvalidValue {
                option: "--seed".into(),
                value: "abc".into()
            }
        );
        assert_eq!(
            Args::parse(["--verbose"]).unwrap_err(),
            ArgsError::UnknownOption("--verbose".into())
        );
        assert_eq!(
            Args::parse(["a.toml", "b.toml"]).unwrap_err(),
            ArgsError::Unexpected("b.toml".into())
        );
    }
}
