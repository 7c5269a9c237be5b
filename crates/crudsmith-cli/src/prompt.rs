//! Prompter selection for the console session.
//!
//! A terminal gets the `dialoguer` widgets (with the `interactive` feature);
//! anything else, such as a pipe or a script, gets the line prompter.

use std::io::IsTerminal as _;

use crudsmith_adapters::LinePrompter;
use crudsmith_core::application::Prompter;

/// Pick the prompter for the current stdin.
pub fn for_stdin() -> Box<dyn Prompter> {
    #[cfg(feature = "interactive")]
    {
        if std::io::stdin().is_terminal() && std::io::stderr().is_terminal() {
            return Box::new(dialog::DialoguerPrompter::new());
        }
    }
    tracing::debug!(
        tty = std::io::stdin().is_terminal(),
        "using line prompter"
    );
    Box::new(LinePrompter::stdio())
}

#[cfg(feature = "interactive")]
mod dialog {
    use std::io;

    use console::{Term, style};
    use dialoguer::{Confirm, Input, MultiSelect, Select, theme::ColorfulTheme};

    use crudsmith_core::application::{ApplicationError, Prompter};
    use crudsmith_core::error::{CrudsmithError, CrudsmithResult};

    /// Terminal widgets drawn on stderr.
    pub struct DialoguerPrompter {
        theme: ColorfulTheme,
        term: Term,
    }

    impl DialoguerPrompter {
        pub fn new() -> Self {
            Self {
                theme: ColorfulTheme::default(),
                term: Term::stderr(),
            }
        }
    }

    fn map_err(err: dialoguer::Error) -> CrudsmithError {
        match err {
            dialoguer::Error::IO(e) => io_err(e),
            #[allow(unreachable_patterns)]
            other => ApplicationError::PromptFailed {
                reason: other.to_string(),
            }
            .into(),
        }
    }

    fn io_err(e: io::Error) -> CrudsmithError {
        match e.kind() {
            io::ErrorKind::UnexpectedEof | io::ErrorKind::Interrupted => {
                ApplicationError::InputClosed.into()
            }
            _ => ApplicationError::PromptFailed {
                reason: e.to_string(),
            }
            .into(),
        }
    }

    impl Prompter for DialoguerPrompter {
        fn input(&mut self, prompt: &str, default: Option<&str>) -> CrudsmithResult<String> {
            let mut input = Input::<String>::with_theme(&self.theme)
                .with_prompt(prompt)
                .allow_empty(true);
            if let Some(d) = default {
                input = input.default(d.to_owned()).show_default(!d.is_empty());
            }
            input.interact_text_on(&self.term).map_err(map_err)
        }

        fn select(
            &mut self,
            prompt: &str,
            items: &[String],
            default: usize,
        ) -> CrudsmithResult<usize> {
            Select::with_theme(&self.theme)
                .with_prompt(prompt)
                .items(items)
                .default(default)
                .interact_on(&self.term)
                .map_err(map_err)
        }

        fn multi_select(
            &mut self,
            prompt: &str,
            items: &[String],
            defaults: &[bool],
        ) -> CrudsmithResult<Vec<usize>> {
            MultiSelect::with_theme(&self.theme)
                .with_prompt(prompt)
                .items(items)
                .defaults(defaults)
                .interact_on(&self.term)
                .map_err(map_err)
        }

        fn confirm(&mut self, prompt: &str, default: bool) -> CrudsmithResult<bool> {
            Confirm::with_theme(&self.theme)
                .with_prompt(prompt)
                .default(default)
                .interact_on(&self.term)
                .map_err(map_err)
        }

        fn note(&mut self, message: &str) -> CrudsmithResult<()> {
            self.term
                .write_line(&style(message).dim().to_string())
                .map_err(io_err)
        }

        fn error(&mut self, message: &str) -> CrudsmithResult<()> {
            self.term
                .write_line(&style(message).red().to_string())
                .map_err(io_err)
        }
    }
}
