// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::cli::read_lines;
use crate::errors::{AuxError, AuxResult};
use crate::pipeline::{Emitter, Transform};
use crate::target::Target;

/// Environment variable naming the default dork file
pub const DORKS_ENV: &str = "GH_DORKS";

/// Renders every dork template against each target
pub struct Dorks {
    templates: Vec<String>,
}

impl Dorks {
    pub fn new(templates: Vec<String>) -> Self {
        Self { templates }
    }

    /// Templates from `path`, or from the file named by `GH_DORKS`
    pub fn load(path: Option<&Path>) -> AuxResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => std::env::var_os(DORKS_ENV).map(PathBuf::from).ok_or_else(|| {
                AuxError::Configuration(format!("No dork file: pass -d or set {}", DORKS_ENV))
            })?,
        };

        let templates = read_lines(&path)
            .map_err(|e| AuxError::Configuration(format!("{}: {}", path.display(), e)))?;
        Ok(Self::new(templates))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn render(&self, raw: &str) -> AuxResult<Vec<String>> {
        let target = Target::parse(raw)?;
        Ok(self.templates.iter().map(|t| target.render(t)).collect())
    }
}

#[async_trait]
impl Transform for Dorks {
    type Output = String;

    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        out.emit_all(self.render(&line)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_render_dorks() {
        let dorks = Dorks::new(vec![
            "\"{{.Domain}}\" password".into(),
            "org:{{.Org}} filename:.env".into(),
        ]);
        assert_eq!(
            dorks.render("https://api.example.com/x").unwrap(),
            vec!["\"api.example.com\" password", "org:api.example filename:.env"]
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{{{.Host}}}} secret\n\n{{{{.Raw}}}}").unwrap();

        let dorks = Dorks::load(Some(file.path())).unwrap();
        assert_eq!(dorks.len(), 2);
        assert_eq!(dorks.render("example.com").unwrap()[0], "example.com secret");
    }
}
