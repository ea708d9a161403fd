use crate::{
    error::InputError,
    models::{AnswerSets, Period},
    services::Prompter,
    utils::{parse_input_date, Logger},
};
use chrono::NaiveDate;
use thiserror::Error;

pub const YTD_QUESTION: &str = "Performance YTD: (Y/N) ";
pub const START_QUESTION: &str = "Start date (dd/mm/yyyy): ";
pub const END_QUESTION: &str = "End date (dd/mm/yyyy): ";

/// Rejected answers that send the operator back to the YTD question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PeriodInputError {
    #[error("Invalid date format. It should be dd/mm/yyyy.")]
    InvalidDateFormat,

    #[error("End date must be later than the start date.")]
    EndNotAfterStart,

    #[error("Invalid input format!")]
    UnrecognizedAnswer,

    #[error("Year to date is empty on January 1st. Please choose an explicit range.")]
    EmptyYearToDate,
}

/// Asks for the analysis window until a valid one is given
pub struct PeriodSelector {
    answers: AnswerSets,
    today: NaiveDate,
    logger: Logger,
}

impl PeriodSelector {
    pub fn new(answers: AnswerSets) -> Self {
        Self {
            answers,
            today: chrono::Local::now().date_naive(),
            logger: Logger::new("PERIOD_SELECTOR"),
        }
    }

    /// Pin "today" instead of reading the clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Loop on the YTD question until a valid period comes back.
    ///
    /// Only a closed input (or an I/O failure) ends the loop without a period.
    pub fn obtain_period<P: Prompter>(&self, prompter: &mut P) -> Result<Period, InputError> {
        loop {
            match self.ask_once(prompter)? {
                Ok(period) => {
                    self.logger.info(&format!("Analysis period: {}", period));
                    return Ok(period);
                }
                Err(rejection) => {
                    self.logger.debug(&format!("Period rejected: {:?}", rejection));
                    prompter.say(&rejection.to_string())?;
                }
            }
        }
    }

    fn ask_once<P: Prompter>(
        &self,
        prompter: &mut P,
    ) -> Result<Result<Period, PeriodInputError>, InputError> {
        let answer = prompter.ask(YTD_QUESTION)?.ok_or(InputError::Closed)?;
        let answer = answer.trim().to_lowercase();

        if self.answers.is_positive(&answer) {
            return Ok(Period::year_to_date(self.today).ok_or(PeriodInputError::EmptyYearToDate));
        }
        if !self.answers.is_negative(&answer) {
            return Ok(Err(PeriodInputError::UnrecognizedAnswer));
        }

        let start = prompter.ask(START_QUESTION)?.ok_or(InputError::Closed)?;
        let Some(start) = parse_input_date(&start) else {
            return Ok(Err(PeriodInputError::InvalidDateFormat));
        };
        let end = prompter.ask(END_QUESTION)?.ok_or(InputError::Closed)?;
        let Some(end) = parse_input_date(&end) else {
            return Ok(Err(PeriodInputError::InvalidDateFormat));
        };

        Ok(Period::new(start, end).ok_or(PeriodInputError::EndNotAfterStart))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ConsolePrompter;
    use std::io::Cursor;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn run(input: &str, today: NaiveDate) -> (Result<Period, InputError>, String) {
        let selector = PeriodSelector::new(AnswerSets::default()).with_today(today);
        let mut prompter = ConsolePrompter::new(Cursor::new(input.to_string()), Vec::new());
        let result = selector.obtain_period(&mut prompter);
        (result, String::from_utf8(prompter.into_output()).unwrap())
    }

    #[test]
    fn test_year_to_date() {
        let (result, _) = run("Y\n", date(2024, 8, 20));
        let period = result.unwrap();
        assert_eq!(period.start(), date(2024, 1, 1));
        assert_eq!(period.end(), date(2024, 8, 20));
    }

    #[test]
    fn test_explicit_range() {
        let (result, output) = run("n\n01/02/2024\n29/02/2024\n", date(2024, 8, 20));
        let period = result.unwrap();
        assert_eq!(period.start(), date(2024, 2, 1));
        assert_eq!(period.end(), date(2024, 2, 29));
        assert_eq!(output, format!("{}{}{}", YTD_QUESTION, START_QUESTION, END_QUESTION));
    }

    #[test]
    fn test_unordered_range_reprompts() {
        let input = "N\n10/03/2024\n10/03/2024\nN\n10/03/2024\n01/03/2024\nN\n01/03/2024\n10/03/2024\n";
        let (result, output) = run(input, date(2024, 8, 20));
        let period = result.unwrap();
        assert_eq!(period.start(), date(2024, 3, 1));
        assert_eq!(output.matches("End date must be later than the start date.").count(), 2);
    }

    #[test]
    fn test_invalid_date_reprompts() {
        let (result, output) = run("no\n2024-03-01\nyes\n", date(2024, 8, 20));
        assert_eq!(result.unwrap().start(), date(2024, 1, 1));
        assert!(output.contains("Invalid date format. It should be dd/mm/yyyy."));
        // The end date is not asked once the start date is rejected
        assert!(!output.contains(END_QUESTION));
    }

    #[test]
    fn test_unrecognized_answer_reprompts() {
        let (result, output) = run("maybe\ny\n", date(2024, 8, 20));
        assert!(result.is_ok());
        assert_eq!(output.matches(YTD_QUESTION).count(), 2);
        assert!(output.contains("Invalid input format!"));
    }

    #[test]
    fn test_closed_input_stops_loop() {
        let (result, _) = run("N\nbad\n", date(2024, 8, 20));
        assert!(matches!(result, Err(InputError::Closed)));
    }

    #[test]
    fn test_january_first_ytd_is_rejected() {
        let (result, output) = run("y\nn\n02/01/2023\n05/01/2023\n", date(2024, 1, 1));
        assert_eq!(result.unwrap().end(), date(2023, 1, 5));
        assert!(output.contains("Year to date is empty"));
    }
}
