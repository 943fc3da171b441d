//! Commands of the interactive list browser (`browse <entidade>`).

use crate::error::{ClientError, ClientResult};
use crate::listing::{ListController, ListFilter, ListSource};

pub const HELP: &str = "comandos: n|next, p|prev, page <n>, sort <campo>, filter <termos>, clear, r|refresh, help, q|quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Previous,
    /// 1-based, as typed.
    Page(u32),
    Sort(String),
    Filter(String),
    Clear,
    Refresh,
    Help,
    Quit,
}

impl BrowseCommand {
    pub fn parse(line: &str) -> ClientResult<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };
        let cmd = match word.to_ascii_lowercase().as_str() {
            "n" | "next" => BrowseCommand::Next,
            "p" | "prev" | "previous" => BrowseCommand::Previous,
            "page" | "pagina" => {
                let n: u32 = rest.parse().map_err(|_| ClientError::validation("page", "informe o número da página"))?;
                if n == 0 {
                    return Err(ClientError::validation("page", "páginas começam em 1"));
                }
                BrowseCommand::Page(n)
            }
            "sort" | "ordenar" if !rest.is_empty() => BrowseCommand::Sort(rest.to_string()),
            "filter" | "filtro" | "f" => BrowseCommand::Filter(rest.to_string()),
            "clear" | "limpar" => BrowseCommand::Clear,
            "" | "r" | "refresh" => BrowseCommand::Refresh,
            "help" | "h" | "?" => BrowseCommand::Help,
            "q" | "quit" | "exit" => BrowseCommand::Quit,
            other => return Err(ClientError::validation("comando", format!("comando desconhecido: {other}"))),
        };
        Ok(cmd)
    }
}

/// Run one command against the controller. Returns `false` when the loop should stop.
pub async fn apply<S: ListSource>(list: &mut ListController<S>, cmd: &BrowseCommand) -> ClientResult<bool> {
    match cmd {
        BrowseCommand::Next => list.next_page().await?,
        BrowseCommand::Previous => list.previous_page().await?,
        BrowseCommand::Page(n) => list.set_page(n - 1).await?,
        BrowseCommand::Sort(field) => list.sort_by(field).await?,
        BrowseCommand::Filter(raw) => list.apply_filter(S::Filter::parse(raw)?).await?,
        BrowseCommand::Clear => list.clear_filter().await?,
        BrowseCommand::Refresh => list.execute_query().await?,
        BrowseCommand::Help => {}
        BrowseCommand::Quit => return Ok(false),
    }
    Ok(true)
}
