use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Csv,
    Excel,
    Unsupported,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => FileFormat::Csv,
            Some(ext) if EXCEL_EXTENSIONS.iter().any(|x| ext.eq_ignore_ascii_case(x)) => {
                FileFormat::Excel
            }
            _ => FileFormat::Unsupported,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub format: FileFormat,
}

impl InputFile {
    pub fn new(path: PathBuf) -> Self {
        let format = FileFormat::from_path(&path);
        Self { path, format }
    }

    /// File name without extension, used to name the output parts.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string())
    }

    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Lists the regular files directly under `input_dir`, classified by extension.
pub fn collect_input_files(input_dir: &Path) -> Result<Vec<InputFile>> {
    if !input_dir.is_dir() {
        anyhow::bail!("Input directory {:?} does not exist", input_dir);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input_dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to list directory {:?}", input_dir))?;
        if entry.file_type().is_file() {
            files.push(InputFile::new(entry.into_path()));
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn classifies_by_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a.csv")), FileFormat::Csv);
        assert_eq!(FileFormat::from_path(Path::new("a.CSV")), FileFormat::Csv);
        assert_eq!(FileFormat::from_path(Path::new("a.xlsx")), FileFormat::Excel);
        assert_eq!(FileFormat::from_path(Path::new("a.Xls")), FileFormat::Excel);
        assert_eq!(FileFormat::from_path(Path::new("a.txt")), FileFormat::Unsupported);
        assert_eq!(FileFormat::from_path(Path::new("README")), FileFormat::Unsupported);
    }

    #[test]
    fn lists_only_top_level_files() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir_all(dir.path().join("folder.csv")).unwrap();
        File::create(dir.path().join("a.csv")).unwrap();
        File::create(dir.path().join("b.xlsx")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        File::create(nested.join("deep.csv")).unwrap();

        let files = collect_input_files(dir.path()).unwrap();
        let found: HashSet<(String, FileFormat)> = files
            .iter()
            .map(|f| (f.display_name(), f.format))
            .collect();
        let expected: HashSet<(String, FileFormat)> = [
            ("a.csv".to_string(), FileFormat::Csv),
            ("b.xlsx".to_string(), FileFormat::Excel),
            ("notes.txt".to_string(), FileFormat::Unsupported),
        ]
        .into_iter()
        .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn empty_directory_is_not_an_error() {
        let dir = tempdir().unwrap();
        assert!(collect_input_files(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let err = collect_input_files(&dir.path().join("missing")).unwrap_err();
        assert!(format!("{err}").contains("does not exist"));
    }

    #[test]
    fn stem_drops_extension() {
        let file = InputFile::new(PathBuf::from("dir/sales.2024.csv"));
        assert_eq!(file.stem(), "sales.2024");
        assert_eq!(file.display_name(), "sales.2024.csv");
    }
}
