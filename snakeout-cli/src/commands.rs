use std::io::Read;
use std::path::PathBuf;

use clap::Subcommand;
use color_eyre::eyre::{Result, WrapErr};
use serde_json::Value;

use snakeout_rs::{
    fill_gaps, generate_level, score_difficulty, validate_level, DifficultyRequest, FillRequest,
    GenerateRequest, ValidateRequest,
};

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Generate a level from a request document
    Generate(RequestArgs),
    /// Check whether a level is solvable
    Validate(RequestArgs),
    /// Score the difficulty of a level
    Difficulty(RequestArgs),
    /// Add snakes to an existing level while keeping it solvable
    FillGaps(RequestArgs),
}

#[derive(clap::Args, Debug)]
pub(crate) struct RequestArgs {
    /// Request JSON file; stdin when omitted
    #[clap(short, long, value_parser)]
    input: Option<PathBuf>,

    /// Pretty-print the response
    #[clap(short, long, action)]
    pretty: bool,
}

impl RequestArgs {
    fn read(&self) -> Result<String> {
        match &self.input {
            Some(path) => std::fs::read_to_string(path)
                .wrap_err_with(|| format!("reading request from {}", path.display())),
            None => {
                let mut raw = String::new();
                std::io::stdin()
                    .read_to_string(&mut raw)
                    .wrap_err("reading request from stdin")?;
                Ok(raw)
            }
        }
    }

    fn print(&self, value: Value) -> Result<()> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        println!("{rendered}");
        Ok(())
    }
}

impl Command {
    pub(crate) fn run(self) -> Result<()> {
        match self {
            Command::Generate(args) => {
                let request: GenerateRequest = serde_json::from_str(&args.read()?)?;
                let response = generate_level(&request)?;
                args.print(serde_json::to_value(response)?)
            }
            Command::Validate(args) => {
                let request: ValidateRequest = serde_json::from_str(&args.read()?)?;
                let response = validate_level(&request)?;
                args.print(serde_json::to_value(response)?)
            }
            Command::Difficulty(args) => {
                let request: DifficultyRequest = serde_json::from_str(&args.read()?)?;
                let response = score_difficulty(&request)?;
                args.print(serde_json::to_value(response)?)
            }
            Command::FillGaps(args) => {
                let request: FillRequest = serde_json::from_str(&args.read()?)?;
                let response = fill_gaps(&request)?;
                args.print(serde_json::to_value(response)?)
            }
        }
    }
}
