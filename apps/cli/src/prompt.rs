//! # Interactive Prompts
//!
//! Line-based questions on stdin/stdout: the login retry loop and the
//! underpayment confirmation at checkout.

use std::io::{self, BufRead, Write};

use tracing::warn;

use cirrus_core::{Money, PaymentConfirmation};

/// Asks questions on one reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Prints `question` and reads one trimmed line; `None` at end of input.
    pub fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prints one line of feedback.
    pub fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }

    /// Yes/no question; anything but `y`/`yes` (or end of input) is no.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{} [y/N] ", question))?;
        Ok(matches!(
            answer.map(|a| a.to_lowercase()).as_deref(),
            Some("y") | Some("yes")
        ))
    }
}

/// Prompter over the process's stdin and stdout.
pub fn terminal() -> Prompter<io::StdinLock<'static>, io::Stdout> {
    Prompter::new(io::stdin().lock(), io::stdout())
}

/// Asks the buyer on the terminal whether to accept an underpayment.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirmation;

impl PaymentConfirmation for TerminalConfirmation {
    fn confirm_underpayment(&self, paid: Money, total: Money) -> bool {
        let question = format!(
            "Amount paid ({}) is less than the total ({}). Proceed anyway?",
            paid, total
        );
        terminal().confirm(&question).unwrap_or_else(|e| {
            warn!(error = %e, "Could not read confirmation; declining");
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_ask_trims_and_reports_eof() {
        let mut p = prompter("  secret123 \n");
        assert_eq!(p.ask("Password: ").unwrap(), Some("secret123".to_string()));
        assert_eq!(p.ask("Password: ").unwrap(), None);
        assert_eq!(String::from_utf8(p.output).unwrap(), "Password: Password: ");
    }

    #[test]
    fn test_confirm() {
        assert!(prompter("y\n").confirm("Proceed?").unwrap());
        assert!(prompter("YES\n").confirm("Proceed?").unwrap());
        assert!(!prompter("n\n").confirm("Proceed?").unwrap());
        assert!(!prompter("\n").confirm("Proceed?").unwrap());
        assert!(!prompter("").confirm("Proceed?").unwrap());
    }
}
