//! Terminal output for the console: tables sized to the terminal, `--json` mode and
//! toast printing.

pub mod browse;
pub mod rows;
pub mod table;

use std::io::IsTerminal;

use serde::Serialize;

use crate::error::ClientResult;
use crate::listing::Page;
use crate::notify::{ToastKind, Toasts};

pub use rows::{human_size, page_table, rows_table, TableRow};
pub use table::{terminal_width, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

/// Writes command results to stdout and notifications to stderr.
#[derive(Debug, Clone)]
pub struct Printer {
    mode: OutputMode,
    color: bool,
    width: usize,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        let stdout_tty = std::io::stdout().is_terminal();
        Self {
            mode: if json { OutputMode::Json } else { OutputMode::Table },
            color: stdout_tty,
            width: if stdout_tty { terminal_width() } else { 120 },
        }
    }

    pub fn mode(&self) -> OutputMode { self.mode }

    pub fn is_json(&self) -> bool { self.mode == OutputMode::Json }

    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> ClientResult<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn table(&self, table: &Table) {
        for line in table.render(self.width, self.color) {
            println!("{line}");
        }
    }

    pub fn page<T: TableRow + Serialize>(&self, page: &Page<T>) -> ClientResult<()> {
        match self.mode {
            OutputMode::Json => self.json(page),
            OutputMode::Table if page.is_empty() => {
                println!("Nenhum registro encontrado.");
                Ok(())
            }
            OutputMode::Table => {
                self.table(&page_table(page));
                Ok(())
            }
        }
    }

    pub fn items<T: TableRow + Serialize>(&self, items: &[T]) -> ClientResult<()> {
        match self.mode {
            OutputMode::Json => self.json(items),
            OutputMode::Table => {
                self.table(&rows_table(items));
                Ok(())
            }
        }
    }

    pub fn record<T: TableRow + Serialize>(&self, item: &T) -> ClientResult<()> {
        self.items(std::slice::from_ref(item))
    }

    /// Key/value listing in table mode, the serialized value in JSON mode.
    pub fn fields<T: Serialize>(&self, value: &T, fields: &[(&str, String)]) -> ClientResult<()> {
        if self.is_json() {
            return self.json(value);
        }
        let mut t = Table::new(["Campo", "Valor"]);
        for (k, v) in fields {
            t.push(vec![k.to_string(), v.clone()]);
        }
        self.table(&t);
        Ok(())
    }

    /// Plain status line; wrapped as `{"mensagem": ..}` in JSON mode.
    pub fn message(&self, text: &str) -> ClientResult<()> {
        if self.is_json() {
            return self.json(&serde_json::json!({ "mensagem": text }));
        }
        println!("{text}");
        Ok(())
    }

    /// Print and remove every pending toast.
    pub fn flush_toasts(&self, toasts: &Toasts) {
        for t in toasts.drain() {
            let tag = match t.kind {
                ToastKind::Success => "ok",
                ToastKind::Error => "erro",
                ToastKind::Info => "info",
            };
            if self.color {
                let code = match t.kind {
                    ToastKind::Success => "32",
                    ToastKind::Error => "31",
                    ToastKind::Info => "36",
                };
                eprintln!("\x1b[{code}m[{tag}]\x1b[0m {}", t.message);
            } else {
                eprintln!("[{tag}] {}", t.message);
            }
        }
    }
}
