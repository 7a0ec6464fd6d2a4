use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use langsheet_cli::conf::{
    C_DIR_FORWARD_INPUT_DEFAULT, C_DIR_OUTPUT_DEFAULT, C_DIR_REVERSE_INPUT_DEFAULT,
    C_NAME_WORKBOOK_DEFAULT,
};
use langsheet_cli::{
    FixedPrompter, Prompter, SpecForwardOptions, SpecReverseOptions, StdioPrompter,
    init_logging, run_forward, run_reverse,
};
use langsheet_io_fs::ReportRun;

#[derive(Debug, Parser)]
#[command(
    name = "langsheet",
    version,
    about = "Convert localization JSON trees to spreadsheets and back"
)]
struct Cli {
    /// Debug-level logging (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Language folders of JSON files -> one CSV per namespace + one workbook
    Forward {
        /// Folder with one sub-folder per language code
        #[arg(long, default_value = C_DIR_FORWARD_INPUT_DEFAULT)]
        input: PathBuf,
        /// Results folder
        #[arg(long, default_value = C_DIR_OUTPUT_DEFAULT)]
        output: PathBuf,
        /// Workbook file name inside the results folder
        #[arg(long, default_value = C_NAME_WORKBOOK_DEFAULT)]
        workbook: String,
        /// Column label for a language, e.g. es=Español
        #[arg(long = "label", value_name = "CODE=LABEL", value_parser = parse_label)]
        labels: Vec<(String, String)>,
        /// Use folder names as labels instead of asking
        #[arg(long)]
        no_prompt: bool,
        /// Worker threads for parsing JSON files
        #[arg(long, default_value_t = 1)]
        workers: usize,
        /// Exit non-zero when any file failed
        #[arg(long)]
        strict: bool,
    },
    /// Workbooks -> one JSON file per language per worksheet
    Reverse {
        /// Folder with .xlsx files
        #[arg(long, default_value = C_DIR_REVERSE_INPUT_DEFAULT)]
        input: PathBuf,
        /// Results folder
        #[arg(long, default_value = C_DIR_OUTPUT_DEFAULT)]
        output: PathBuf,
        /// Language columns to read from every workbook
        #[arg(long)]
        languages: Option<usize>,
        /// Use the detected language count instead of asking
        #[arg(long)]
        no_prompt: bool,
        /// Exit non-zero when any file failed
        #[arg(long)]
        strict: bool,
    },
}

fn parse_label(s: &str) -> Result<(String, String), String> {
    let (code, label) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=LABEL, got {s:?}"))?;
    let (code, label) = (code.trim(), label.trim());
    if code.is_empty() || label.is_empty() {
        return Err(format!("expected CODE=LABEL, got {s:?}"));
    }
    Ok((code.to_string(), label.to_string()))
}

fn derive_prompter(if_no_prompt: bool) -> Box<dyn Prompter> {
    if if_no_prompt {
        Box::new(FixedPrompter::default())
    } else {
        Box::new(StdioPrompter::stdio())
    }
}

fn check_report(report: &ReportRun, if_strict: bool) -> Result<()> {
    if if_strict && report.has_errors() {
        bail!("{} file(s) failed", report.error_count());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Command::Forward {
            input,
            output,
            workbook,
            labels,
            no_prompt,
            workers,
            strict,
        } => {
            let options = SpecForwardOptions {
                dir_input: input,
                dir_output: output,
                name_workbook: workbook,
                dict_labels: labels.into_iter().collect::<IndexMap<_, _>>(),
                num_workers_max: Some(workers),
                ..Default::default()
            };
            let mut prompter = derive_prompter(no_prompt);
            let report = run_forward(&options, prompter.as_mut())?;
            check_report(&report, strict)
        }
        Command::Reverse {
            input,
            output,
            languages,
            no_prompt,
            strict,
        } => {
            let options = SpecReverseOptions {
                dir_input: input,
                dir_output: output,
                n_languages: languages,
            };
            let mut prompter = derive_prompter(no_prompt);
            let report = run_reverse(&options, prompter.as_mut())?;
            check_report(&report, strict)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_argument_splits_on_first_equals() {
        assert_eq!(
            parse_label("es=Español").unwrap(),
            ("es".to_string(), "Español".to_string())
        );
        assert_eq!(
            parse_label("x = a=b").unwrap(),
            ("x".to_string(), "a=b".to_string())
        );
        assert!(parse_label("es").is_err());
        assert!(parse_label("=Español").is_err());
    }

    #[test]
    fn cli_defaults_match_conf() {
        let cli = Cli::try_parse_from(["langsheet", "forward"]).unwrap();
        match cli.command {
            Command::Forward {
                input,
                workbook,
                workers,
                ..
            } => {
                assert_eq!(input, PathBuf::from(C_DIR_FORWARD_INPUT_DEFAULT));
                assert_eq!(workbook, C_NAME_WORKBOOK_DEFAULT);
                assert_eq!(workers, 1);
            }
            Command::Reverse { .. } => panic!("expected forward"),
        }
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
