//! Navigation state of the public document browser.

use serde::Serialize;

use crate::api::ItemDto;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Word,
    Excel,
    Powerpoint,
    Image,
    Archive,
    Video,
    Audio,
    Text,
    Other,
}

impl FileKind {
    pub fn of(name: &str) -> Self {
        let ext = match name.rsplit_once('.') {
            Some((_, e)) => e.to_ascii_lowercase(),
            None => return FileKind::Other,
        };
        match ext.as_str() {
            "pdf" => FileKind::Pdf,
            "doc" | "docx" => FileKind::Word,
            "xls" | "xlsx" => FileKind::Excel,
            "ppt" | "pptx" => FileKind::Powerpoint,
            "jpg" | "jpeg" | "png" | "gif" | "bmp" => FileKind::Image,
            "zip" | "rar" | "7z" => FileKind::Archive,
            "mp4" | "mov" | "avi" => FileKind::Video,
            "mp3" | "wav" => FileKind::Audio,
            "txt" => FileKind::Text,
            _ => FileKind::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Word => "word",
            FileKind::Excel => "excel",
            FileKind::Powerpoint => "powerpoint",
            FileKind::Image => "image",
            FileKind::Archive => "archive",
            FileKind::Video => "video",
            FileKind::Audio => "audio",
            FileKind::Text => "text",
            FileKind::Other => "file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entered {
    /// Moved into a directory; reload the listing for the new path.
    Directory(String),
    /// A file was selected; its full path is ready for view/download.
    File(String),
}

/// Current path (`caminho`) as a stack of segments. The root is the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderBrowser {
    segments: Vec<String>,
    selected: Option<String>,
}

impl FolderBrowser {
    pub fn new() -> Self { Self::default() }

    pub fn caminho(&self) -> String { self.segments.join("/") }

    /// Breadcrumb entries as (label, path to navigate to).
    pub fn breadcrumbs(&self) -> Vec<(String, String)> {
        (0..self.segments.len()).map(|i| (self.segments[i].clone(), self.segments[..=i].join("/"))).collect()
    }

    pub fn selected(&self) -> Option<&str> { self.selected.as_deref() }

    pub fn is_root(&self) -> bool { self.segments.is_empty() }

    pub fn file_path(&self, name: &str) -> String {
        if self.segments.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.caminho(), name)
        }
    }

    pub fn enter(&mut self, item: &ItemDto) -> Entered {
        if item.is_diretorio {
            self.segments.push(item.nome.clone());
            self.selected = None;
            Entered::Directory(self.caminho())
        } else {
            let path = self.file_path(&item.nome);
            self.selected = Some(path.clone());
            Entered::File(path)
        }
    }

    /// Parent directory; stays at the root.
    pub fn up(&mut self) -> String {
        self.segments.pop();
        self.selected = None;
        self.caminho()
    }

    pub fn root(&mut self) {
        self.segments.clear();
        self.selected = None;
    }

    pub fn goto(&mut self, caminho: &str) {
        self.segments = caminho.split('/').filter(|s| !s.is_empty()).map(str::to_string).collect();
        self.selected = None;
    }
}
