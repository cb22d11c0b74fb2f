use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "brandvoice",
    version,
    about = "Turn a Shopify store's brand voice into SEO-ready product copy"
)]
pub struct Args {
    /// TOML file overriding the built-in defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub analysis_model: Option<String>,

    #[arg(long)]
    pub synthesis_model: Option<String>,

    #[arg(long)]
    pub generation_model: Option<String>,

    #[arg(long)]
    pub chat_model: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Directory the exported product copy is written to.
    #[arg(long)]
    pub export_dir: Option<String>,

    /// Keep every prompt and response of the run on disk.
    #[arg(long, default_value_t = false)]
    pub save_artifacts: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Print how the workflow works and exit.
    #[arg(long, default_value_t = false)]
    pub guide: bool,
}

impl Args {
    /// Command-line flags win over the config file.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(m) = &self.analysis_model {
            cfg.models.analysis = m.clone();
        }
        if let Some(m) = &self.synthesis_model {
            cfg.models.synthesis = m.clone();
        }
        if let Some(m) = &self.generation_model {
            cfg.models.generation = m.clone();
        }
        if let Some(m) = &self.chat_model {
            cfg.models.chat = m.clone();
        }
        if let Some(t) = self.timeout_secs {
            cfg.timeout_secs = t;
        }
        if let Some(dir) = &self.export_dir {
            cfg.export_dir = dir.clone();
        }
        if self.save_artifacts {
            cfg.save_artifacts = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "brandvoice",
            "--chat-model",
            "gemini-2.0-flash",
            "--timeout-secs",
            "12",
            "--save-artifacts",
        ]);
        let mut cfg = Config::default();
        args.apply(&mut cfg);
        assert_eq!(cfg.models.chat, "gemini-2.0-flash");
        assert_eq!(cfg.models.analysis, Config::default().models.analysis);
        assert_eq!(cfg.timeout_secs, 12);
        assert!(cfg.save_artifacts);
    }
}
