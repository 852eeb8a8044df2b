use std::path::{Path, PathBuf};

/// One C source file tracked through the inference pipeline, together with
/// the constraint file the generator writes and the annotated artifact the
/// solver produces. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    c_file: PathBuf,
    cstr_file: PathBuf,
    cnip_file: PathBuf,
}

impl CompilationUnit {
    /// Derive the intermediate and output paths from the source path by
    /// extension rewriting. With an output directory, the derived files are
    /// redirected there; the source path is left untouched.
    pub fn from_source(source: &Path, output_dir: Option<&Path>) -> Self {
        let cstr_file = redirect(source.with_extension("cstr"), output_dir);
        let cnip_file = redirect(source.with_extension("cnip"), output_dir);
        Self {
            c_file: source.to_path_buf(),
            cstr_file,
            cnip_file,
        }
    }

    pub fn c_file(&self) -> &Path {
        &self.c_file
    }

    pub fn cstr_file(&self) -> &Path {
        &self.cstr_file
    }

    pub fn cnip_file(&self) -> &Path {
        &self.cnip_file
    }
}

fn redirect(path: PathBuf, output_dir: Option<&Path>) -> PathBuf {
    match (output_dir, path.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_derive_by_extension_rewrite() {
        let unit = CompilationUnit::from_source(Path::new("src/a.c"), None);
        assert_eq!(unit.c_file(), Path::new("src/a.c"));
        assert_eq!(unit.cstr_file(), Path::new("src/a.cstr"));
        assert_eq!(unit.cnip_file(), Path::new("src/a.cnip"));
    }

    #[test]
    fn output_dir_redirects_derived_files_only() {
        let unit = CompilationUnit::from_source(Path::new("src/a.c"), Some(Path::new("build")));
        assert_eq!(unit.c_file(), Path::new("src/a.c"));
        assert_eq!(unit.cstr_file(), Path::new("build/a.cstr"));
        assert_eq!(unit.cnip_file(), Path::new("build/a.cnip"));
    }

    #[test]
    fn extensionless_source_still_derives() {
        let unit = CompilationUnit::from_source(Path::new("input"), None);
        assert_eq!(unit.cstr_file(), Path::new("input.cstr"));
        assert_eq!(unit.cnip_file(), Path::new("input.cnip"));
    }
}
