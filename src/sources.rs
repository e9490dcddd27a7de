use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use walkdir::WalkDir;

const HDL_EXTENSIONS: &[&str] = &["v", "sv"];

/// Collects the design sources named on the command line.
///
/// Explicit files keep their order; files found under `dir` follow, sorted.
pub fn collect_sources(inputs: &[PathBuf], dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();

    for input in inputs {
        if !input.is_file() {
            bail!("design source does not exist: {}", input.display());
        }
        sources.push(input.clone());
    }

    if let Some(dir) = dir {
        if !dir.is_dir() {
            bail!("sources directory does not exist: {}", dir.display());
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let extension = path.extension().and_then(|ext| ext.to_str());
            if extension.is_none_or(|ext| {
                !HDL_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            }) {
                continue;
            }
            if !sources.iter().any(|source| source == path) {
                found.push(path.to_path_buf());
            }
        }
        found.sort();
        sources.extend(found);
    }

    if sources.is_empty() {
        bail!("no design sources given (use --input or --sources)");
    }

    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn walks_directory_for_hdl_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("rtl/sub")).unwrap();
        fs::write(tmp.path().join("rtl/top.v"), "module top; endmodule\n").unwrap();
        fs::write(tmp.path().join("rtl/sub/alu.SV"), "module alu; endmodule\n").unwrap();
        fs::write(tmp.path().join("rtl/notes.txt"), "ignored\n").unwrap();

        let sources = collect_sources(&[], Some(tmp.path().join("rtl").as_path())).unwrap();
        let names: Vec<String> = sources
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["alu.SV", "top.v"]);
    }

    #[test]
    fn explicit_inputs_come_first_and_are_not_repeated() {
        let tmp = TempDir::new().unwrap();
        let top = tmp.path().join("top.v");
        fs::write(&top, "module top; endmodule\n").unwrap();
        fs::write(tmp.path().join("a.v"), "module a; endmodule\n").unwrap();

        let sources = collect_sources(&[top.clone()], Some(tmp.path())).unwrap();
        assert_eq!(sources, [top, tmp.path().join("a.v")]);
    }

    #[test]
    fn missing_sources_are_errors() {
        let tmp = TempDir::new().unwrap();
        assert!(collect_sources(&[], None).is_err());
        assert!(collect_sources(&[tmp.path().join("nope.v")], None).is_err());
        assert!(collect_sources(&[], Some(tmp.path().join("nope").as_path())).is_err());
    }
}
