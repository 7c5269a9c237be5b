//! In-crate test doubles for the application ports.

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::application::ApplicationError;
use crate::application::ports::{Filesystem, Prompter, resolve_choice};
use crate::error::CrudsmithResult;

/// Answers prompts from a fixed script and records what was shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub notes: Vec<String>,
    pub errors: Vec<String>,
    pub prompts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    fn next(&mut self, prompt: &str) -> CrudsmithResult<String> {
        self.prompts.push(prompt.to_owned());
        self.answers
            .pop_front()
            .ok_or_else(|| ApplicationError::InputClosed.into())
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> CrudsmithResult<String> {
        let answer = self.next(prompt)?;
        match (answer.trim().is_empty(), default) {
            (true, Some(default)) => Ok(default.to_owned()),
            _ => Ok(answer),
        }
    }

    fn select(&mut self, prompt: &str, items: &[String], default: usize) -> CrudsmithResult<usize> {
        let answer = self.next(prompt)?;
        if answer.trim().is_empty() {
            return Ok(default);
        }
        resolve_choice(items, &answer).ok_or_else(|| {
            ApplicationError::PromptFailed {
                reason: format!("scripted answer '{answer}' is not a choice"),
            }
            .into()
        })
    }

    fn multi_select(
        &mut self,
        prompt: &str,
        items: &[String],
        defaults: &[bool],
    ) -> CrudsmithResult<Vec<usize>> {
        let answer = self.next(prompt)?;
        if answer.trim().is_empty() {
            return Ok(defaults
                .iter()
                .enumerate()
                .filter_map(|(i, on)| on.then_some(i))
                .collect());
        }
        let mut picked = answer
            .split(',')
            .map(|a| {
                resolve_choice(items, a).ok_or_else(|| ApplicationError::PromptFailed {
                    reason: format!("scripted answer '{a}' is not a choice"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        picked.sort_unstable();
        picked.dedup();
        Ok(picked)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> CrudsmithResult<bool> {
        let answer = self.next(prompt)?;
        Ok(match answer.trim() {
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => default,
        })
    }

    fn note(&mut self, message: &str) -> CrudsmithResult<()> {
        self.notes.push(message.to_owned());
        Ok(())
    }

    fn error(&mut self, message: &str) -> CrudsmithResult<()> {
        self.errors.push(message.to_owned());
        Ok(())
    }
}

/// Map-backed filesystem. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MapFilesystem {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
}

impl MapFilesystem {
    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), content.to_owned());
        }
        self
    }

    pub fn read(&self, path: &Path) -> Option<String> {
        self.files.lock().ok()?.get(path).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.files.lock().map(|f| f.is_empty()).unwrap_or(true)
    }
}

impl Filesystem for MapFilesystem {
    fn create_dir_all(&self, _path: &Path) -> CrudsmithResult<()> {
        Ok(())
    }

    fn read_file(&self, path: &Path) -> CrudsmithResult<String> {
        self.read(path).ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_owned(),
                reason: "no such file".into(),
            }
            .into()
        })
    }

    fn write_file(&self, path: &Path, content: &str) -> CrudsmithResult<()> {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.to_owned(), content.to_owned());
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.read(path).is_some()
    }
}
