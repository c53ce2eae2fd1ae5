use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Modal "save as" prompt.
pub trait SaveDialog {
    /// Asks where to save a download. `None` means the user cancelled.
    fn prompt_save_path(&self, suggested: &Path) -> Option<PathBuf>;
}

/// Save dialog that replays queued answers; with nothing queued it cancels.
#[derive(Debug, Default)]
pub struct ScriptedDialog {
    answers: RefCell<VecDeque<Option<PathBuf>>>,
    prompts: RefCell<Vec<PathBuf>>,
}

impl ScriptedDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the answer for the next prompt.
    pub fn answer(&self, path: Option<PathBuf>) {
        self.answers.borrow_mut().push_back(path);
    }

    /// Suggested paths seen so far.
    pub fn prompts(&self) -> Vec<PathBuf> {
        self.prompts.borrow().clone()
    }
}

impl SaveDialog for ScriptedDialog {
    fn prompt_save_path(&self, suggested: &Path) -> Option<PathBuf> {
        self.prompts.borrow_mut().push(suggested.to_path_buf());
        self.answers.borrow_mut().pop_front().flatten()
    }
}

impl<T: SaveDialog + ?Sized> SaveDialog for std::rc::Rc<T> {
    fn prompt_save_path(&self, suggested: &Path) -> Option<PathBuf> {
        (**self).prompt_save_path(suggested)
    }
}
