//! Interactive and pre-answered run questions.

use std::io::{self, BufRead, Write};

use indexmap::IndexMap;

/// Questions a run may need answered.
pub trait Prompter {
    /// Display label for the language folder `code`. Never empty.
    fn ask_label(&mut self, code: &str) -> String;

    /// Number of language columns to read from `name_file`.
    ///
    /// `n_detected` is the count of populated header columns. `None` means
    /// "use the detected count".
    fn ask_language_count(&mut self, name_file: &str, n_detected: usize) -> Option<usize>;
}

////////////////////////////////////////////////////////////////////////////////
// #region StdioPrompter

/// Line-based prompter; questions go to `writer`, answers come from `reader`.
///
/// An empty answer or end of input accepts the default.
pub struct StdioPrompter<R, W> {
    reader: R,
    writer: W,
}

impl StdioPrompter<io::StdinLock<'static>, io::Stderr> {
    /// Prompter bound to stdin/stderr.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> StdioPrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// `None` on end of input or read failure.
    fn ask_line(&mut self, question: &str) -> Option<String> {
        // A closed terminal only loses the question text.
        let _ = write!(self.writer, "{question} ");
        let _ = self.writer.flush();

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl<R: BufRead, W: Write> Prompter for StdioPrompter<R, W> {
    fn ask_label(&mut self, code: &str) -> String {
        let question = format!("Which label do you want to use for the language {code}? [{code}]");
        match self.ask_line(&question) {
            Some(answer) if !answer.is_empty() => answer,
            _ => code.to_string(),
        }
    }

    fn ask_language_count(&mut self, name_file: &str, n_detected: usize) -> Option<usize> {
        let question =
            format!("How many languages do you have in {name_file}? [{n_detected}]");
        loop {
            let answer = self.ask_line(&question)?;
            if answer.is_empty() {
                return None;
            }
            match answer.parse::<usize>() {
                Ok(n) => return Some(n),
                Err(_) => {
                    let _ = writeln!(self.writer, "{answer:?} is not a number.");
                }
            }
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FixedPrompter

/// Prompter answering from configuration only.
#[derive(Debug, Clone, Default)]
pub struct FixedPrompter {
    /// Labels by language code; missing codes use the code itself.
    pub dict_labels: IndexMap<String, String>,
    /// Count for every file; `None` uses the detected count.
    pub n_languages: Option<usize>,
}

impl FixedPrompter {
    pub fn new(dict_labels: IndexMap<String, String>, n_languages: Option<usize>) -> Self {
        Self {
            dict_labels,
            n_languages,
        }
    }
}

impl Prompter for FixedPrompter {
    fn ask_label(&mut self, code: &str) -> String {
        self.dict_labels
            .get(code)
            .filter(|label| !label.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }

    fn ask_language_count(&mut self, _name_file: &str, _n_detected: usize) -> Option<usize> {
        self.n_languages
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
