use crate::api::{Carro, ItemDto, Marca, Proprietario, Role, Usuario};
use crate::folders::FileKind;
use crate::listing::masks::{format_cpf, format_telefone};
use crate::listing::Page;

use super::table::Table;

/// A record that knows how to show itself as one table row.
pub trait TableRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl TableRow for Carro {
    const HEADERS: &'static [&'static str] = &["ID", "Modelo", "Cor", "Ano", "Marca", "Proprietários"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.modelo.clone(),
            self.cor.clone(),
            self.ano.to_string(),
            self.marca_nome().to_string(),
            self.proprietarios_nomes(),
        ]
    }
}

impl TableRow for Proprietario {
    const HEADERS: &'static [&'static str] = &["ID", "Nome", "CPF", "Telefone"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.nome.clone(), format_cpf(&self.cpf), format_telefone(&self.telefone)]
    }
}

impl TableRow for Marca {
    const HEADERS: &'static [&'static str] = &["ID", "Nome"];

    fn cells(&self) -> Vec<String> { vec![self.id.to_string(), self.nome.clone()] }
}

impl TableRow for Usuario {
    const HEADERS: &'static [&'static str] = &["ID", "Usuário", "Perfis"];

    fn cells(&self) -> Vec<String> { vec![self.id.to_string(), self.username.clone(), self.role_names().join(", ")] }
}

impl TableRow for Role {
    const HEADERS: &'static [&'static str] = &["ID", "Nome"];

    fn cells(&self) -> Vec<String> { vec![self.id.to_string(), self.nome.clone()] }
}

impl TableRow for ItemDto {
    const HEADERS: &'static [&'static str] = &["Nome", "Tipo", "Tamanho"];

    fn cells(&self) -> Vec<String> {
        if self.is_diretorio {
            let itens = self.contagem.map(|n| format!("{n} itens")).unwrap_or_default();
            vec![format!("{}/", self.nome), "pasta".to_string(), itens]
        } else {
            let tamanho = self.tamanho.map(human_size).unwrap_or_default();
            vec![self.nome.clone(), FileKind::of(&self.nome).label().to_string(), tamanho]
        }
    }
}

/// Byte count in B/KB/MB/GB with one decimal.
pub fn human_size(bytes: f64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut v = bytes.max(0.0);
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{v:.0} {}", UNITS[unit])
    } else {
        format!("{v:.1} {}", UNITS[unit])
    }
}

pub fn rows_table<T: TableRow>(items: &[T]) -> Table {
    let mut t = Table::new(T::HEADERS.iter().copied());
    for item in items {
        t.push(item.cells());
    }
    t
}

/// Rows of one page, with the position and total as footer.
pub fn page_table<T: TableRow>(page: &Page<T>) -> Table {
    rows_table(&page.content).with_footer(format!("página {} · {} registro(s)", page.position_label(), page.total_elements))
}
