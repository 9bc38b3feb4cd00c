//! Questions the pipeline cannot answer on its own.

use std::io::{self, BufRead, Write};
use std::path::Path;

/// Decides what to do when probing comes up short.
pub trait Resolver {
    /// Supply a duration in seconds for `audio`, or `None` to give up.
    fn resolve_missing_duration(&mut self, audio: &Path) -> Option<f64>;

    /// `audio` has no cover. Return `true` to encode without one.
    fn confirm_missing_image(&mut self, audio: &Path) -> bool;
}

/// Asks on a terminal (or any reader/writer pair).
pub struct TerminalResolver<R, W> {
    input: R,
    output: W,
    assume_yes: bool,
}

impl TerminalResolver<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalResolver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            assume_yes: false,
        }
    }

    /// Skip yes/no questions and answer yes.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    /// Print `prompt` and read one trimmed line. `None` on EOF or a broken
    /// terminal.
    fn ask(&mut self, prompt: &str) -> Option<String> {
        write!(self.output, "{}", prompt).ok()?;
        self.output.flush().ok()?;

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl<R: BufRead, W: Write> Resolver for TerminalResolver<R, W> {
    fn resolve_missing_duration(&mut self, audio: &Path) -> Option<f64> {
        tracing::warn!("Could not read the length of {}", audio.display());
        loop {
            let answer = self.ask("Length (in seconds): ")?;
            match answer.parse::<f64>() {
                Ok(secs) if secs.is_finite() && secs > 0.0 => return Some(secs),
                _ => continue,
            }
        }
    }

    fn confirm_missing_image(&mut self, audio: &Path) -> bool {
        if self.assume_yes {
            tracing::warn!("No cover for {}, encoding audio only", audio.display());
            return true;
        }
        loop {
            match self.ask("No embedded image found. Continue anyway? [y/n] ") {
                None => return false,
                Some(answer) => match answer.to_lowercase().as_str() {
                    "y" | "yes" => return true,
                    "n" | "no" => return false,
                    _ => continue,
                },
            }
        }
    }
}

/// Never asks. Missing durations are fatal; missing covers follow
/// `assume_yes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractiveResolver {
    pub assume_yes: bool,
}

impl Resolver for NonInteractiveResolver {
    fn resolve_missing_duration(&mut self, _audio: &Path) -> Option<f64> {
        None
    }

    fn confirm_missing_image(&mut self, audio: &Path) -> bool {
        if self.assume_yes {
            tracing::warn!("No cover for {}, encoding audio only", audio.display());
        }
        self.assume_yes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn resolver(input: &str) -> TerminalResolver<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalResolver::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_duration_retries_until_number() {
        let mut r = resolver("abc\n-3\n\n245\n");
        assert_eq!(r.resolve_missing_duration(Path::new("a.flac")), Some(245.0));

        let prompts = String::from_utf8(r.output).unwrap();
        assert_eq!(prompts.matches("Length (in seconds): ").count(), 4);
    }

    #[test]
    fn test_duration_eof_gives_up() {
        let mut r = resolver("nope\n");
        assert_eq!(r.resolve_missing_duration(Path::new("a.flac")), None);
    }

    #[test]
    fn test_confirm_image() {
        assert!(resolver("y\n").confirm_missing_image(Path::new("a.flac")));
        assert!(resolver("maybe\nYES\n").confirm_missing_image(Path::new("a.flac")));
        assert!(!resolver("n\n").confirm_missing_image(Path::new("a.flac")));
        assert!(!resolver("").confirm_missing_image(Path::new("a.flac")));
        assert!(resolver("").assume_yes(true).confirm_missing_image(Path::new("a.flac")));
    }

    #[test]
    fn test_non_interactive() {
        let mut r = NonInteractiveResolver::default();
        assert_eq!(r.resolve_missing_duration(Path::new("a.flac")), None);
        assert!(!r.confirm_missing_image(Path::new("a.flac")));

        let mut r = NonInteractiveResolver { assume_yes: true };
        assert!(r.confirm_missing_image(Path::new("a.flac")));
    }
}
