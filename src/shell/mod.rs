//! The interactive loop: line editing, parsing, dispatch and printing.

mod complete;

use anyhow::anyhow;
use cmd_lang::{parse, Catalog};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tracing::debug;

use crate::api::ApiClient;
use crate::dispatch::Dispatcher;
use crate::output;
use crate::prompt::TermPrompter;
use crate::registry::{Ctx, Registry, Session};
use crate::resources::account;
use complete::ShellHelper;

const PROMPT: &str = "(h) ";

pub struct Shell<'a> {
    api: &'a dyn ApiClient,
    dispatcher: Dispatcher,
    session: Session,
    prompter: TermPrompter,
    catalog: Catalog,
    editor: Editor<ShellHelper, DefaultHistory>,
}

impl<'a> Shell<'a> {
    /// Greets, preloads the instance caches and wires up line editing.
    /// Failing to reach the account is fatal: nothing below works
    /// without the endpoint.
    pub fn new(api: &'a dyn ApiClient, registry: Registry) -> anyhow::Result<Shell<'a>> {
        let catalog = registry.catalog();
        let account =
            account::fetch(api).map_err(|err| anyhow!("could not fetch the account: {err}"))?;
        output::welcome(&account);

        let mut dispatcher = Dispatcher::new(registry);
        for (kind, result) in dispatcher.preload(api) {
            match result {
                Ok(()) => output::info(&format!("{} loaded.", kind.display_name())),
                Err(err) => output::warn(&format!(
                    "could not load {}: {err}",
                    kind.display_name()
                )),
            }
        }

        let mut editor: Editor<ShellHelper, DefaultHistory> =
            Editor::new().map_err(|err| anyhow!("could not init line editing: {err}"))?;
        let mut helper = ShellHelper::new(catalog.clone());
        helper.set_ids(dispatcher.cache().id_view());
        editor.set_helper(Some(helper));

        Ok(Shell {
            api,
            dispatcher,
            session: Session { account },
            prompter: TermPrompter,
            catalog,
            editor,
        })
    }

    /// Reads and runs commands until end of input.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let line = match self.editor.readline(PROMPT) {
                Ok(line) => line,
                Err(ReadlineError::Eof) => {
                    output::goodbye();
                    return Ok(());
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(err) => return Err(anyhow!("readline error: {err}")),
            };
            let line = line.trim();
            if line.is_empty() {
                println!("Type 'help' for the command list.");
                continue;
            }
            self.editor
                .add_history_entry(line)
                .map_err(|err| anyhow!("could not record history: {err}"))?;
            self.handle_line(line);
            // Mutations may have changed the id sets the completer offers.
            if let Some(helper) = self.editor.helper_mut() {
                helper.set_ids(self.dispatcher.cache().id_view());
            }
        }
    }

    fn handle_line(&mut self, line: &str) {
        if line.eq_ignore_ascii_case("help") {
            output::print_catalog(self.dispatcher.registry());
            return;
        }
        let command = match parse(line, &self.catalog) {
            Ok(command) => command,
            Err(err) => {
                output::print_syntax_error(line, &err);
                return;
            }
        };
        debug!(%command, "dispatching");
        let mut ctx = Ctx {
            api: self.api,
            io: &mut self.prompter,
            session: &mut self.session,
        };
        match self.dispatcher.execute(&mut ctx, &command) {
            Ok(outcome) => output::print_outcome(&outcome),
            Err(fault) => output::print_fault(&fault),
        }
    }
}
