// ============================================================================
// Command-line interface (clap derive)
// ============================================================================
//
//   visual-anagram run edits.json
//   visual-anagram inspect perm.npy
//   visual-anagram map perm.npy a 12 40

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use anagram_core::Side;

/// Dual-canvas visual anagram editor, headless.
#[derive(Parser, Debug)]
#[command(name = "visual-anagram", version, about)]
pub struct CliArgs {
    /// Preferences file (default: preferences.json next to the executable).
    #[arg(long, global = true, value_name = "FILE")]
    pub prefs: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Replay a JSON gesture script.
    Run {
        #[arg(value_name = "SCRIPT.json")]
        script: PathBuf,
    },
    /// Print the side length and boundary pixel count of a permutation.
    /// Without a path, inspects the permutation the last `run` loaded.
    Inspect {
        #[arg(value_name = "PERMUTATION")]
        permutation: Option<PathBuf>,
    },
    /// Map one coordinate to the other canvas.
    Map {
        #[arg(value_name = "PERMUTATION")]
        permutation: PathBuf,
        #[arg(value_enum)]
        side: SideArg,
        y: usize,
        x: usize,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideArg {
    A,
    B,
}

impl From<SideArg> for Side {
    fn from(arg: SideArg) -> Self {
        match arg {
            SideArg::A => Side::A,
            SideArg::B => Side::B,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_map_with_global_flags() {
        let args = CliArgs::try_parse_from([
            "visual-anagram",
            "map",
            "perm.npy",
            "b",
            "3",
            "7",
            "--verbose",
            "--prefs",
            "p.json",
        ])
        .unwrap();
        assert!(args.verbose);
        assert_eq!(args.prefs, Some(PathBuf::from("p.json")));
        match args.command {
            CliCommand::Map { side, y, x, .. } => {
                assert_eq!(Side::from(side), Side::B);
                assert_eq!((y, x), (3, 7));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn inspect_path_is_optional() {
        let args = CliArgs::try_parse_from(["visual-anagram", "inspect"]).unwrap();
        assert!(matches!(args.command, CliCommand::Inspect { permutation: None }));
    }

    #[test]
    fn rejects_unknown_side() {
        let parsed = CliArgs::try_parse_from(["visual-anagram", "map", "p.npy", "c", "0", "0"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }
}
