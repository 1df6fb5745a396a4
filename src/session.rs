//! Interactive session.
//!
//! Reads one command per line and drives the dashboard and the chat
//! client. Year selections run as pending futures next to the input
//! reader, so a slow lookup can be overtaken by a newer selection; only
//! the most recent one is ever shown.

use crate::analysis::SelectionTicket;
use crate::chat::{ChatClient, Conversation};
use crate::dashboard::{Dashboard, SelectionOutcome, SelectionResult, SelectionRows};
use crate::models::{SummarySort, TitleSort};
use crate::progress::spinner;
use crate::report;
use anyhow::{Context, Result};
use clap::ValueEnum;
use futures::future::LocalBoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(u32),
    Reload,
    Sort { key: SummarySort, descending: bool },
    Titles(TitleSort),
    Chat(String),
    History,
    Clear,
    Show,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  <year> | select <year>            show job titles for a year
  reload                            re-read the source
  sort <year|jobs|salary> [desc]    order the year table
  titles <title|count>              order the job title table
  chat <message>                    ask the chat bot
  history                           show the conversation
  clear                             clear the conversation
  show                              redraw the tables and chart
  help                              this text
  quit                              leave";

fn parse_year(text: &str) -> Result<u32, String> {
    match text.trim().parse::<u32>() {
        Ok(year) if year > 0 => Ok(year),
        _ => Err(format!("Not a valid year: {}", text.trim())),
    }
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    if verb.chars().all(|c| c.is_ascii_digit()) {
        return parse_year(verb).map(|year| Some(Command::Select(year)));
    }

    let command = match verb.to_lowercase().as_str() {
        "select" | "year" => Command::Select(parse_year(rest)?),
        "reload" | "refresh" => Command::Reload,
        "sort" => {
            let mut parts = rest.split_whitespace();
            let key = parts.next().ok_or("Usage: sort <year|jobs|salary> [asc|desc]")?;
            let key = SummarySort::from_str(key, true)
                .map_err(|_| format!("Unknown sort column: {}", key))?;
            let descending = match parts.next().map(str::to_lowercase).as_deref() {
                None | Some("asc") => false,
                Some("desc") => true,
                Some(other) => return Err(format!("Unknown sort direction: {}", other)),
            };
            Command::Sort { key, descending }
        }
        "titles" => {
            let key = TitleSort::from_str(rest, true)
                .map_err(|_| "Usage: titles <title|count>".to_string())?;
            Command::Titles(key)
        }
        "chat" | "ask" => {
            if rest.is_empty() {
                return Err("Usage: chat <message>".to_string());
            }
            Command::Chat(rest.to_string())
        }
        "history" => Command::History,
        "clear" => Command::Clear,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("Unknown command: {} (try 'help')", other)),
    };

    Ok(Some(command))
}

type PendingSelections = FuturesUnordered<LocalBoxFuture<'static, SelectionRows>>;

/// State of one interactive session.
pub struct Session {
    dashboard: Dashboard,
    chat: ChatClient,
    conversation: Conversation,
    chart_width: usize,
    show_progress: bool,
}

impl Session {
    pub fn new(
        dashboard: Dashboard,
        chat: ChatClient,
        chart_width: usize,
        show_progress: bool,
    ) -> Self {
        Self {
            dashboard,
            chat,
            conversation: Conversation::new(),
            chart_width,
            show_progress,
        }
    }

    /// Run commands from `input` until `quit` or end of input.
    ///
    /// Selections still pending at the end are awaited so the last one
    /// initiated is applied.
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut pending: PendingSelections = FuturesUnordered::new();

        println!("{}\n", HELP);
        self.print_overview();
        prompt();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read input")? else {
                        break;
                    };
                    match parse_command(&line) {
                        Ok(Some(Command::Quit)) => break,
                        Ok(Some(command)) => self.handle(command, &mut pending).await,
                        Ok(None) => {}
                        Err(message) => println!("{}", message),
                    }
                    prompt();
                }
                Some((ticket, rows)) = pending.next(), if !pending.is_empty() => {
                    self.apply_selection(ticket, rows);
                    prompt();
                }
            }
        }

        while let Some((ticket, rows)) = pending.next().await {
            self.apply_selection(ticket, rows);
        }

        Ok(())
    }

    async fn handle(&mut self, command: Command, pending: &mut PendingSelections) {
        match command {
            Command::Select(year) => {
                let ticket = self.dashboard.begin_selection(year);
                debug!("Queued selection for {}", year);
                pending.push(self.dashboard.selection_rows(ticket).boxed_local());
            }
            Command::Reload => {
                let pb = spinner("Reloading records...", self.show_progress);
                let result = self.dashboard.load().await.map(|_| ());
                pb.finish_and_clear();
                match result {
                    Ok(()) => self.print_overview(),
                    Err(e) => println!("⚠️  Reload failed: {}. Showing previous data.", e),
                }
            }
            Command::Sort { key, descending } => {
                self.dashboard.set_summary_sort(key, descending);
                print!("{}", report::generate_summary_section(self.dashboard.summaries()));
            }
            Command::Titles(key) => {
                self.dashboard.set_title_sort(Some(key));
                self.print_titles();
            }
            Command::Chat(text) => {
                let pb = spinner("Bot is typing...", self.show_progress);
                let reply = self.chat.converse(&mut self.conversation, &text).await;
                pb.finish_and_clear();
                if let Some(message) = reply {
                    println!("{}", message);
                }
            }
            Command::History => {
                if self.conversation.messages().is_empty() {
                    println!("(no messages)");
                }
                for message in self.conversation.messages() {
                    println!("{}", message);
                }
            }
            Command::Clear => {
                self.conversation.clear();
                println!("Chat cleared.");
            }
            Command::Show => {
                self.print_overview();
                self.print_titles();
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }
    }

    fn apply_selection(&mut self, ticket: SelectionTicket, rows: SelectionResult) {
        match self.dashboard.finish_selection(ticket, rows) {
            Ok(SelectionOutcome::Applied) => self.print_titles(),
            Ok(SelectionOutcome::Superseded) => {}
            Err(e) => {
                warn!("Selection for {} failed: {}", ticket.year(), e);
                println!("⚠️  Could not load job titles for {}: {}", ticket.year(), e);
            }
        }
    }

    fn print_overview(&self) {
        print!(
            "{}{}",
            report::generate_summary_section(self.dashboard.summaries()),
            report::generate_chart_section(self.dashboard.chart(), self.chart_width)
        );
    }

    fn print_titles(&self) {
        if let Some(selection) = self.dashboard.shown_selection() {
            print!("{}", report::generate_titles_section(selection));
        }
    }

    #[cfg(test)]
    fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    #[cfg(test)]
    fn conversation(&self) -> &Conversation {
        &self.conversation
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
