use std::fs;
use std::path::{Path, PathBuf};

use analyser_core::SelectedFile;
use engine_logging::engine_warn;

pub const HELP_TEXT: &str = "Commands: select <path> | clear | submit | cancel | status | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(PathBuf),
    Clear,
    Submit,
    Cancel,
    Status,
    Help,
    Quit,
}

/// Parses one line of interactive input. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let command = match word.to_ascii_lowercase().as_str() {
        "select" | "open" if !rest.is_empty() => Command::Select(PathBuf::from(rest)),
        "select" | "open" => return Err("select needs a path".to_string()),
        "clear" => Command::Clear,
        "submit" | "analyse" | "analyze" => Command::Submit,
        "cancel" => Command::Cancel,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command {other:?}")),
    };
    Ok(Some(command))
}

/// Describes `path` as a selection. Unreadable paths count as a cancelled pick.
pub fn selected_file_from_path(path: &Path) -> Option<SelectedFile> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(err) => {
            engine_warn!("Cannot select {:?}: {}", path, err);
            return None;
        }
    };
    if !meta.is_file() {
        engine_warn!("Cannot select {:?}: not a file", path);
        return None;
    }
    if !has_pdf_extension(path) {
        engine_warn!("{:?} does not look like a PDF; the service may reject it", path);
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Some(SelectedFile {
        name,
        path: path.to_path_buf(),
        size: meta.len(),
    })
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn parses_select_with_spaces_in_path() {
        assert_eq!(
            parse_command("select  my bills/budget 2024.pdf "),
            Ok(Some(Command::Select(PathBuf::from("my bills/budget 2024.pdf"))))
        );
    }

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(parse_command("SUBMIT"), Ok(Some(Command::Submit)));
        assert_eq!(parse_command("Quit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn select_without_path_is_an_error() {
        assert!(parse_command("select").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn selection_reads_size_from_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Bill.PDF");
        fs::write(&path, vec![0u8; 1234]).unwrap();

        let selected = selected_file_from_path(&path).unwrap();
        assert_eq!(selected.name, "Bill.PDF");
        assert_eq!(selected.size, 1234);
        assert!(has_pdf_extension(&path));
    }

    #[test]
    fn missing_or_directory_selection_is_none() {
        let temp = TempDir::new().unwrap();
        assert_eq!(selected_file_from_path(&temp.path().join("gone.pdf")), None);
        assert_eq!(selected_file_from_path(temp.path()), None);
    }
}
