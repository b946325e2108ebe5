//! Prompt extraction command

use std::fs;

use clap::ArgMatches;
use log::info;

use crate::api::PromptKit;
use crate::commands::command_traits::Command;
use crate::errors::ExtractResult;
use crate::utils::logger::Logger;

/// Placeholder shown when a file carries no recognizable metadata
const NO_METADATA_PLACEHOLDER: &str = "no generation metadata found";

/// Command that extracts generation metadata from a media file
pub struct ExtractCommand<'a> {
    #[allow(dead_code)]
    logger: &'a Logger,
    input_path: String,
    output_path: Option<String>,
}

impl<'a> ExtractCommand<'a> {
    /// Create a new extract command from CLI arguments
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> ExtractResult<Self> {
        let input_path = args
            .get_one::<String>("input")
            .ok_or_else(|| "No input file specified".to_string())?
            .clone();
        let output_path = args.get_one::<String>("output").cloned();

        Ok(ExtractCommand {
            logger,
            input_path,
            output_path,
        })
    }
}

impl Command for ExtractCommand<'_> {
    fn execute(&self) -> ExtractResult<()> {
        info!("Running extraction on {}", self.input_path);

        let kit = PromptKit::new(None)?;
        let result = kit.extract_from_file(&self.input_path)?;

        let text = match &result {
            Some(text) => text.as_str(),
            None => NO_METADATA_PLACEHOLDER,
        };

        match &self.output_path {
            Some(path) => {
                fs::write(path, text)?;
                info!("Wrote result to {}", path);
            }
            None => println!("{}", text),
        }

        Ok(())
    }
}
