/// Text listing of a catalogue

use std::fmt;

use crate::filesystem::{DirectoryNode, FileNode, Node};

/// Column width used when expanding tabs
pub const TAB_STOP: usize = 16;

/// Time stamp layout used when listing filetypes
pub const TIME_STAMP_FORMAT: &str = "%H:%M:%S, %a %d %b %Y";

/// Displays every file below a directory, one per line
///
/// Files are shown as `$.PATH.NAME  LOAD  EXEC  LENGTH` in hex. With
/// filetypes enabled, files carrying a filetype and a valid time stamp are
/// shown as `$.PATH.NAME  TYPE  TIME STAMP  LENGTH` instead. Empty
/// directories are shown as `PATH (empty)`.
#[derive(Debug, Clone, Copy)]
pub struct Listing<'a> {
    root: &'a DirectoryNode,
    path: &'a str,
    filetypes: bool,
}

impl<'a> Listing<'a> {
    /// List a directory, naming it `$`
    pub fn new(root: &'a DirectoryNode) -> Self {
        Self {
            root,
            path: "$",
            filetypes: false,
        }
    }

    /// Name the listed directory differently in the output
    pub fn with_path(mut self, path: &'a str) -> Self {
        self.path = path;
        self
    }

    /// Show filetypes and time stamps instead of addresses where possible
    pub fn with_filetypes(mut self, filetypes: bool) -> Self {
        self.filetypes = filetypes;
        self
    }

    fn write_directory(&self, f: &mut fmt::Formatter<'_>, dir: &DirectoryNode, path: &str) -> fmt::Result {
        if dir.is_empty() {
            writeln!(f, "{} (empty)", path)?;
        }

        for node in &dir.children {
            match node {
                Node::File(file) => writeln!(f, "{}", expand_tabs(&self.file_line(file, path), TAB_STOP))?,
                Node::Directory(sub) => {
                    let sub_path = format!("{}.{}", path, sub.name);
                    self.write_directory(f, sub, &sub_path)?;
                }
            }
        }
        Ok(())
    }

    fn file_line(&self, file: &FileNode, path: &str) -> String {
        if self.filetypes {
            if let (Some(filetype), Some(stamp)) = (file.filetype(), file.time_stamp()) {
                return format!(
                    "{}.{}\t{}\t{}\t{:X}",
                    path,
                    file.name,
                    filetype.to_uppercase(),
                    stamp.format(TIME_STAMP_FORMAT),
                    file.length
                );
            }
        }
        format!(
            "{}.{}\t{:X}\t{:X}\t{:X}",
            path, file.name, file.load_address, file.execution_address, file.length
        )
    }
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_directory(f, self.root, self.path)
    }
}

/// Replace tabs with spaces up to the next multiple of `stop` columns
pub fn expand_tabs(line: &str, stop: usize) -> String {
    let mut out = String::with_capacity(line.len() + stop);
    let mut column = 0;

    for c in line.chars() {
        if c == '\t' {
            let pad = stop - column % stop;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }

    out
}
