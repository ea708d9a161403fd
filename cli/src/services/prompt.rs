use std::io::{self, BufRead, Write};

/// Console the pipeline talks to: asks questions and prints diagnostics
pub trait Prompter {
    /// Show `question` and read one line. `Ok(None)` means the input is closed.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>>;

    /// Print one line of output
    fn say(&mut self, message: &str) -> io::Result<()>;
}

/// Line-oriented prompter over any reader/writer pair
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter bound to the process stdin/stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        self.output.write_all(question.as_bytes())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim_end_matches(['\n', '\r']).to_string();
        Ok(Some(answer))
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)?;
        self.output.flush()
    }
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        (**self).ask(question)
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        (**self).say(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_ask_strips_line_endings() {
        let mut prompter = ConsolePrompter::new(Cursor::new("W\r\n ewz , spy \n"), Vec::new());
        assert_eq!(prompter.ask("mode? ").unwrap().as_deref(), Some("W"));
        assert_eq!(prompter.ask("list? ").unwrap().as_deref(), Some(" ewz , spy "));
        assert_eq!(prompter.ask("again? ").unwrap(), None);

        let output = String::from_utf8(prompter.into_output()).unwrap();
        assert_eq!(output, "mode? list? again? ");
    }

    #[test]
    fn test_say_writes_a_line() {
        let mut prompter = ConsolePrompter::new(Cursor::new(""), Vec::new());
        prompter.say("hello").unwrap();
        assert_eq!(prompter.output(), b"hello\n");
    }
}
