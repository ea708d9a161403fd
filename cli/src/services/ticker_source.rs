use crate::{
    error::InputError,
    models::{collect_tickers, AnswerSets, Ticker},
    services::Prompter,
    utils::Logger,
};
use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

pub const MODE_QUESTION: &str = "Do you want to open a file or write the list of ETFs? (F/W) ";
pub const LIST_QUESTION: &str = "Insert the list of ETFs separated by commas: ";

/// Where the tickers come from: a file with one symbol per line, or a typed list
pub struct TickerSource {
    answers: AnswerSets,
    ticker_file: PathBuf,
    logger: Logger,
}

impl TickerSource {
    pub fn new(answers: AnswerSets, ticker_file: impl Into<PathBuf>) -> Self {
        Self {
            answers,
            ticker_file: ticker_file.into(),
            logger: Logger::new("TICKER_SOURCE"),
        }
    }

    pub fn ticker_file(&self) -> &Path {
        &self.ticker_file
    }

    /// Ask for the input mode once and collect the tickers.
    ///
    /// An unknown mode or a missing file is reported on the console and ends
    /// the run; there is no second attempt.
    pub fn obtain_tickers<P: Prompter>(&self, prompter: &mut P) -> Result<Vec<Ticker>, InputError> {
        let mode = prompter.ask(MODE_QUESTION)?.ok_or(InputError::Closed)?;
        let mode = mode.trim();

        let result = if self.answers.is_open_file(mode) {
            self.read_ticker_file()
        } else if self.answers.is_write(mode) {
            let list = prompter.ask(LIST_QUESTION)?.ok_or(InputError::Closed)?;
            Ok(collect_tickers(list.split(',')))
        } else {
            Err(InputError::InvalidSelection {
                answer: mode.to_string(),
            })
        };

        match result {
            Ok(tickers) => {
                self.logger.info_with_data("Collected tickers", &tickers);
                Ok(tickers)
            }
            Err(err @ (InputError::FileNotFound { .. } | InputError::InvalidSelection { .. })) => {
                self.logger.debug(&format!("Ticker input rejected: {:?}", err));
                prompter.say(&err.to_string())?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    fn read_ticker_file(&self) -> Result<Vec<Ticker>, InputError> {
        let content = fs::read_to_string(&self.ticker_file).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => InputError::FileNotFound {
                path: self.ticker_file.clone(),
            },
            _ => InputError::Io(e),
        })?;

        self.logger.debug(&format!(
            "Read ticker file {}",
            self.ticker_file.display()
        ));
        Ok(collect_tickers(content.lines()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ConsolePrompter;
    use std::io::{Cursor, Write};

    fn run(input: &str, ticker_file: &Path) -> (Result<Vec<Ticker>, InputError>, String) {
        let source = TickerSource::new(AnswerSets::default(), ticker_file);
        let mut prompter = ConsolePrompter::new(Cursor::new(input.to_string()), Vec::new());
        let result = source.obtain_tickers(&mut prompter);
        let output = String::from_utf8(prompter.into_output()).unwrap();
        (result, output)
    }

    fn symbols(tickers: &[Ticker]) -> Vec<&str> {
        tickers.iter().map(Ticker::as_str).collect()
    }

    #[test]
    fn test_write_mode_normalizes_list() {
        let missing = Path::new("unused.txt");
        for line in [
            "EWZ,IWM,QQQ,SPY,XLF",
            "  EWZ , IWM , QQQ, SPY , XLF  ",
            "ewz,IWM,qqq,SPY,xlf",
            "EWZ,EWZ,IWM,IWM,QQQ,SPY,SPY,XLF",
        ] {
            let (result, output) = run(&format!("W\n{}\n", line), missing);
            assert_eq!(symbols(&result.unwrap()), vec!["EWZ", "IWM", "QQQ", "SPY", "XLF"]);
            assert_eq!(output, format!("{}{}", MODE_QUESTION, LIST_QUESTION));
        }
    }

    #[test]
    fn test_file_mode_reads_one_ticker_per_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SPY  ").unwrap();
        writeln!(file, "qqq").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "EWZ\t").unwrap();
        writeln!(file, "SPY").unwrap();

        let (result, _) = run("F\n", file.path());
        assert_eq!(symbols(&result.unwrap()), vec!["EWZ", "QQQ", "SPY"]);
    }

    #[test]
    fn test_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("etfs.txt");

        let (result, output) = run("F\n", &missing);
        assert!(matches!(result, Err(InputError::FileNotFound { .. })));
        assert_eq!(output, format!("{}Error: File not found!\n", MODE_QUESTION));
    }

    #[test]
    fn test_invalid_selection_aborts_without_retry() {
        let (result, output) = run("X\nW\nSPY\n", Path::new("unused.txt"));
        assert!(matches!(result, Err(InputError::InvalidSelection { .. })));
        assert_eq!(output, format!("{}Invalid input format!\n", MODE_QUESTION));
    }

    #[test]
    fn test_closed_input() {
        let (result, _) = run("", Path::new("unused.txt"));
        assert!(matches!(result, Err(InputError::Closed)));
    }
}
