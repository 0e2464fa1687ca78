use std::{
    collections::HashMap,
    fmt,
    io::{self, Lines, StdinLock},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::info as output_info;
use crate::cli::registry::CommandRegistry;

/// Set to read commands from stdin instead of the interactive editor.
pub const SCRIPT_ENV: &str = "EXPENSE_LEDGER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    tracing::debug!(status = %context.status(), "shell started");

    let mut source = match mode {
        CliMode::Interactive => {
            output_info("Expense ledger shell. Type `help` for commands.");
            LineSource::editor(&context.registry)?
        }
        CliMode::Script => LineSource::Script(io::stdin().lines()),
    };

    while context.running {
        match source.next_line(&context.prompt())? {
            NextLine::Line(line) => run_line(&mut context, &line)?,
            NextLine::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
            }
            NextLine::End => {
                if mode == CliMode::Interactive {
                    output_info("Exiting shell.");
                }
                break;
            }
        }
    }
    Ok(())
}

/// Where command lines come from: the line editor or piped stdin.
enum LineSource {
    Editor(Box<Editor<CommandHelper, DefaultHistory>>),
    Script(Lines<StdinLock<'static>>),
}

enum NextLine {
    Line(String),
    Interrupted,
    End,
}

impl LineSource {
    fn editor(registry: &CommandRegistry) -> Result<Self, CliError> {
        let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(CommandHelper::new(registry)));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(LineSource::Editor(Box::new(editor)))
    }

    fn next_line(&mut self, prompt: &str) -> Result<NextLine, CliError> {
        match self {
            LineSource::Editor(editor) => match editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        editor.add_history_entry(line.trim()).ok();
                    }
                    Ok(NextLine::Line(line))
                }
                Err(ReadlineError::Interrupted) => Ok(NextLine::Interrupted),
                Err(ReadlineError::Eof) => Ok(NextLine::End),
                Err(err) => Err(err.into()),
            },
            LineSource::Script(lines) => match lines.next() {
                Some(line) => Ok(NextLine::Line(line?)),
                None => Ok(NextLine::End),
            },
        }
    }
}

/// Executes one line; blank lines and `#` comments are ignored. Command
/// failures are reported and never end the session.
fn run_line(context: &mut ShellContext, line: &str) -> Result<(), CliError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(());
    }
    match execute(context, line) {
        Ok(LoopControl::Continue) => Ok(()),
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(())
        }
        Err(err) => context.report_error(err),
    }
}

pub(crate) fn execute(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&err.message);
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.dispatch(&raw.to_lowercase(), raw, &args)
}

/// Completes command names, then each command's declared argument words.
/// `help` completes command names in its first argument.
struct CommandHelper {
    commands: Vec<&'static str>,
    arguments: HashMap<&'static str, &'static [&'static [&'static str]]>,
}

impl CommandHelper {
    fn new(registry: &CommandRegistry) -> Self {
        let mut commands: Vec<&'static str> = registry.names().collect();
        commands.sort_unstable();
        commands.dedup();
        let arguments = commands
            .iter()
            .filter_map(|name| registry.get(name).map(|entry| (*name, entry.arguments)))
            .collect();
        Self {
            commands,
            arguments,
        }
    }

    fn candidates(&self, words: &[&str]) -> Vec<&'static str> {
        match words {
            [] => self.commands.clone(),
            [command, previous @ ..] => {
                let command = command.to_ascii_lowercase();
                if command == "help" && previous.is_empty() {
                    return self.commands.clone();
                }
                self.arguments
                    .get(command.as_str())
                    .and_then(|positions| positions.get(previous.len()))
                    .map(|words| words.to_vec())
                    .unwrap_or_default()
            }
        }
    }
}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let before: Vec<&str> = prefix[..start].split_whitespace().collect();
        let needle = prefix[start..].to_ascii_lowercase();

        let candidates = self
            .candidates(&before)
            .into_iter()
            .filter(|word| word.to_ascii_lowercase().starts_with(&needle))
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}
impl Highlighter for CommandHelper {}
impl Validator for CommandHelper {}
impl Helper for CommandHelper {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    fn helper() -> CommandHelper {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        CommandHelper::new(&registry)
    }

    fn complete(line: &str) -> Vec<String> {
        let history = DefaultHistory::new();
        let ctx = ReadlineContext::new(&history);
        let (_, candidates) = helper().complete(line, line.len(), &ctx).expect("complete");
        candidates.into_iter().map(|pair| pair.replacement).collect()
    }

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line("add 2024-01-01 \"Eating out\" 12 Debit 'Team lunch'")
            .expect("valid line");
        assert_eq!(
            tokens,
            vec!["add", "2024-01-01", "Eating out", "12", "Debit", "Team lunch"]
        );
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(parse_command_line("add \"open").is_err());
    }

    #[test]
    fn completes_command_names() {
        assert_eq!(complete("ve"), vec!["version"]);
        assert_eq!(complete("help de"), vec!["delete"]);
    }

    #[test]
    fn completes_chart_views_and_config_keys() {
        assert_eq!(complete("chart "), vec!["category", "daily"]);
        assert_eq!(complete("plot d"), vec!["daily"]);
        assert_eq!(complete("config set ch"), vec!["chart-width"]);
        assert_eq!(complete("add 2024-01-01 Food 5 c"), vec!["Credit"]);
        assert!(complete("view 2024").is_empty());
    }

    #[test]
    fn script_lines_skip_comments_and_stop_on_exit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut context = crate::cli::core::script_context(dir.path());
        let lines = [
            "# seed data",
            "",
            "add 2024-01-01 Food 5 Debit Snack",
            "exit",
            "add 2024-01-02 Food 6 Debit Late",
        ];
        for line in lines {
            if !context.running {
                break;
            }
            run_line(&mut context, line).expect("line runs");
        }
        assert!(!context.running);
        assert_eq!(context.store.count().unwrap(), 1);
    }
}
