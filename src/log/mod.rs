use fs_err as fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::gateway::{ExchangeSink, Operation};

pub struct SavedPaths {
    pub prompt: PathBuf,
    pub response: PathBuf,
}

fn run_dir(root: &Path, run: Uuid) -> PathBuf {
    root.join(run.to_string())
}

/// Writes the prompt and response of one stage. Repeated stages (e.g. a
/// regenerated description) get a numeric suffix instead of overwriting.
pub fn save_stage(root: &Path, run: Uuid, stage: &str, prompt: &str, response: &str) -> anyhow::Result<SavedPaths> {
    let dir = run_dir(root, run);
    fs::create_dir_all(&dir)?;

    let mut name = stage.to_string();
    let mut n = 1;
    while dir.join(format!("{name}.prompt.md")).exists() {
        n += 1;
        name = format!("{stage}-{n}");
    }

    let prompt_path = dir.join(format!("{name}.prompt.md"));
    let response_path = dir.join(format!("{name}.response.md"));
    fs::write(&prompt_path, prompt)?;
    fs::write(&response_path, response)?;

    Ok(SavedPaths { prompt: prompt_path, response: response_path })
}

/// Keeps every generation exchange of one run on disk.
pub struct ArtifactLog {
    root: PathBuf,
    run: Uuid,
}

impl ArtifactLog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), run: Uuid::new_v4() }
    }

    pub fn dir(&self) -> PathBuf {
        run_dir(&self.root, self.run)
    }
}

impl ExchangeSink for ArtifactLog {
    fn record(&self, op: Operation, prompt: &str, response: &str) {
        match save_stage(&self.root, self.run, op.stage(), prompt, response) {
            Ok(saved) => {
                tracing::debug!(
                    stage = %op,
                    prompt = %saved.prompt.display(),
                    response = %saved.response.display(),
                    "artifacts saved"
                );
            }
            Err(e) => tracing::warn!(stage = %op, error = %e, "could not save artifacts"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_written_under_the_run_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let log = ArtifactLog::new(tmp.path());
        log.record(Operation::ProductAnalysis, "P", "R");

        let dir = log.dir();
        assert_eq!(fs::read_to_string(dir.join("product-analysis.prompt.md")).unwrap(), "P");
        assert_eq!(fs::read_to_string(dir.join("product-analysis.response.md")).unwrap(), "R");
    }

    #[test]
    fn repeated_stage_does_not_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let run = Uuid::new_v4();
        save_stage(tmp.path(), run, "product-description", "p1", "r1").unwrap();
        let second = save_stage(tmp.path(), run, "product-description", "p2", "r2").unwrap();
        assert!(second.response.ends_with("product-description-2.response.md"));
        let first = run_dir(tmp.path(), run).join("product-description.response.md");
        assert_eq!(fs::read_to_string(first).unwrap(), "r1");
    }
}
