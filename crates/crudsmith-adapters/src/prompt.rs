//! Line-oriented prompter for pipes, scripts and tests.

use std::io::{self, BufRead, Stderr, StdinLock, Write};

use tracing::trace;

use crudsmith_core::{
    application::{
        ApplicationError,
        ports::{Prompter, resolve_choice},
    },
    error::{CrudsmithError, CrudsmithResult},
};

/// Reads one answer per line from `reader`, writes prompts to `writer`.
///
/// Choices accept a 1-based index, the item text or its first word;
/// multi-choices take a comma-separated list. Blank lines select defaults.
#[derive(Debug)]
pub struct LinePrompter<R, W> {
    reader: R,
    writer: W,
}

impl LinePrompter<StdinLock<'static>, Stderr> {
    /// Prompter over the process stdin, prompting on stderr.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Consume the prompter, returning the writer (for inspecting output).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn write(&mut self, text: &str) -> CrudsmithResult<()> {
        self.writer
            .write_all(text.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(prompt_failed)
    }

    fn read_answer(&mut self) -> CrudsmithResult<String> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line).map_err(prompt_failed)?;
        if read == 0 {
            return Err(ApplicationError::InputClosed.into());
        }
        let answer = line.trim_end_matches(['\n', '\r']).to_owned();
        trace!(answer = %answer, "line read");
        Ok(answer)
    }

    fn list(&mut self, items: &[String], marked: &[bool]) -> CrudsmithResult<()> {
        for (i, item) in items.iter().enumerate() {
            let mark = if marked.get(i).copied().unwrap_or(false) { "*" } else { " " };
            self.write(&format!("  {mark}{:>2}) {item}\n", i + 1))?;
        }
        Ok(())
    }
}

fn prompt_failed(e: io::Error) -> CrudsmithError {
    ApplicationError::PromptFailed {
        reason: e.to_string(),
    }
    .into()
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> CrudsmithResult<String> {
        match default {
            Some(d) if !d.is_empty() => self.write(&format!("{prompt} [{d}]: "))?,
            _ => self.write(&format!("{prompt}: "))?,
        }
        let answer = self.read_answer()?;
        match default {
            Some(d) if answer.trim().is_empty() => Ok(d.to_owned()),
            _ => Ok(answer),
        }
    }

    fn select(&mut self, prompt: &str, items: &[String], default: usize) -> CrudsmithResult<usize> {
        let marked: Vec<bool> = (0..items.len()).map(|i| i == default).collect();
        self.write(&format!("{prompt}\n"))?;
        self.list(items, &marked)?;
        loop {
            self.write("> ")?;
            let answer = self.read_answer()?;
            if answer.trim().is_empty() {
                return Ok(default);
            }
            match resolve_choice(items, &answer) {
                Some(index) => return Ok(index),
                None => self.write(&format!("'{}' is not one of the choices\n", answer.trim()))?,
            }
        }
    }

    fn multi_select(
        &mut self,
        prompt: &str,
        items: &[String],
        defaults: &[bool],
    ) -> CrudsmithResult<Vec<usize>> {
        self.write(&format!("{prompt} (comma separated)\n"))?;
        self.list(items, defaults)?;
        'ask: loop {
            self.write("> ")?;
            let answer = self.read_answer()?;
            if answer.trim().is_empty() {
                return Ok(defaults
                    .iter()
                    .enumerate()
                    .filter_map(|(i, on)| on.then_some(i))
                    .collect());
            }

            let mut picked = Vec::new();
            for part in answer.split(',').filter(|p| !p.trim().is_empty()) {
                match resolve_choice(items, part) {
                    Some(index) => picked.push(index),
                    None => {
                        self.write(&format!("'{}' is not one of the choices\n", part.trim()))?;
                        continue 'ask;
                    }
                }
            }
            picked.sort_unstable();
            picked.dedup();
            return Ok(picked);
        }
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> CrudsmithResult<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            self.write(&format!("{prompt} [{hint}] "))?;
            let answer = self.read_answer()?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.write("Please answer y or n\n")?,
            }
        }
    }

    fn note(&mut self, message: &str) -> CrudsmithResult<()> {
        self.write(&format!("{message}\n"))
    }

    fn error(&mut self, message: &str) -> CrudsmithResult<()> {
        self.write(&format!("error: {message}\n"))
    }
}
