//! Console operator: asks each question until the answer is valid.

use anyhow::{Result, bail};
use chrono::{Month, Weekday};
use std::io::{BufRead, Write};
use tracing::debug;

use crate::filter::{City, TimeMode, parse_day, parse_month};
use crate::session::{Operator, Question};

const CITY_PROMPT: &str = "Would you like to see data for Chicago, New York, or Washington?";
const TIME_PROMPT: &str = "Would you like to filter the data by month, day, both, or not at all? Type \"none\" for no time filter.";
const MONTH_PROMPT: &str = "Which month? January, February, March, April, May, or June? Please type out the full month name.";
const DAY_PROMPT: &str = "Which day? Please type a day Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday.";

pub struct ConsoleOperator<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleOperator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `prompt` and returns the trimmed, lower-cased answer.
    fn ask(&mut self, prompt: &str) -> Result<String> {
        writeln!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("operator input closed");
        }
        let answer = line.trim().to_lowercase();
        debug!(answer = %answer, "Operator answered");
        Ok(answer)
    }

    /// Re-asks `prompt` until `parse` accepts the answer.
    fn ask_until<T>(
        &mut self,
        prompt: &str,
        complaint: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T> {
        loop {
            let answer = self.ask(prompt)?;
            match parse(&answer) {
                Some(value) => return Ok(value),
                None => writeln!(self.output, "{complaint}")?,
            }
        }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Operator for ConsoleOperator<R, W> {
    fn choose_city(&mut self) -> Result<City> {
        writeln!(self.output, "Hello! Let's explore some US bikeshare data!")?;
        let city = self.ask_until(CITY_PROMPT, "Please enter a valid city name.", |a| {
            a.parse::<City>().ok()
        })?;
        writeln!(
            self.output,
            "Looks like you want to hear about {}! If this is not true, restart the program now!",
            title_case(city.name())
        )?;
        Ok(city)
    }

    fn choose_time_mode(&mut self) -> Result<TimeMode> {
        let mode = self.ask_until(TIME_PROMPT, "Please enter a valid filter.", |a| {
            a.parse::<TimeMode>().ok()
        })?;
        match mode {
            TimeMode::Month => writeln!(self.output, "We will make sure to filter by month!")?,
            TimeMode::Day => writeln!(self.output, "We will make sure to filter by day!")?,
            TimeMode::All | TimeMode::None => {}
        }
        Ok(mode)
    }

    fn choose_month(&mut self) -> Result<Month> {
        let month = self.ask_until(MONTH_PROMPT, "Please enter a valid month.", parse_month)?;
        writeln!(self.output, "Just one moment... loading the data")?;
        Ok(month)
    }

    fn choose_day(&mut self) -> Result<Weekday> {
        let day = self.ask_until(DAY_PROMPT, "Please enter a valid day.", parse_day)?;
        writeln!(self.output, "Just one moment... loading the data")?;
        Ok(day)
    }

    fn confirm(&mut self, question: Question) -> Result<bool> {
        match question {
            Question::ShowRawData => self.ask_until(
                "Would you like to see 5 rows of raw data? Enter yes or no.",
                "Please enter a valid response.",
                yes_no,
            ),
            Question::ShowMoreRawData => self.ask_until(
                "Would you like to see 5 more rows of raw data? Enter yes or no.",
                "Please enter a valid response.",
                yes_no,
            ),
            // anything but "yes" ends the session
            Question::Restart => {
                let answer = self.ask("\nWould you like to restart? Enter yes to restart.")?;
                Ok(answer == "yes")
            }
        }
    }
}

fn yes_no(answer: &str) -> Option<bool> {
    match answer {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
