//! Media inspection command

use clap::ArgMatches;
use log::info;

use crate::api::PromptKit;
use crate::commands::command_traits::Command;
use crate::errors::ExtractResult;
use crate::utils::logger::Logger;

/// Command that reports the metadata carriers present in a media file
pub struct InspectCommand<'a> {
    #[allow(dead_code)]
    logger: &'a Logger,
    input_path: String,
}

impl<'a> InspectCommand<'a> {
    /// Create a new inspect command from CLI arguments
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> ExtractResult<Self> {
        let input_path = args
            .get_one::<String>("input")
            .ok_or_else(|| "No input file specified".to_string())?
            .clone();

        Ok(InspectCommand { logger, input_path })
    }
}

impl Command for InspectCommand<'_> {
    fn execute(&self) -> ExtractResult<()> {
        info!("Running inspection on {}", self.input_path);

        let kit = PromptKit::new(None)?;
        let report = kit.inspect(&self.input_path)?;
        println!("{}", report);

        Ok(())
    }
}
