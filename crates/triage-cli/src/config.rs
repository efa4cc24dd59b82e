//! Runtime settings
//!
//! Every setting resolves as: command-line flag, then environment variable,
//! then built-in default. Empty environment values count as unset.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::env::VarError;
use std::path::PathBuf;
use std::time::Duration;

use triage_route::{ModelNames, ModelStore, TopicClassifier};
use triage_text::{LexiconFileV1, StopwordList, TextPipeline};

pub const TRIAGE_LEXICON_ENV: &str = "TRIAGE_LEXICON";
pub const TRIAGE_STOPWORDS_ENV: &str = "TRIAGE_STOPWORDS";
pub const TRIAGE_MODEL_DIR_ENV: &str = "TRIAGE_MODEL_DIR";
pub const TRIAGE_MODEL_URL_ENV: &str = "TRIAGE_MODEL_URL";
pub const TRIAGE_INFERENCE_TIMEOUT_SECS_ENV: &str = "TRIAGE_INFERENCE_TIMEOUT_SECS";

pub const DEFAULT_MODEL_DIR: &str = "models";
pub const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 120;

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Lexicon JSON (default: built-in; env TRIAGE_LEXICON)
    #[arg(long, global = true)]
    pub lexicon: Option<PathBuf>,

    /// General stopword list, one word per line (default: built-in; env TRIAGE_STOPWORDS)
    #[arg(long, global = true)]
    pub stopwords: Option<PathBuf>,

    /// Directory holding `<model>.json` artifacts (default: `models`; env TRIAGE_MODEL_DIR)
    #[arg(long, global = true)]
    pub model_dir: Option<PathBuf>,

    /// Model server base URL; takes priority over --model-dir (env TRIAGE_MODEL_URL)
    #[arg(long, global = true)]
    pub model_url: Option<String>,

    /// Per-call inference timeout in seconds, 0 disables (default: 120; env TRIAGE_INFERENCE_TIMEOUT_SECS)
    #[arg(long, global = true)]
    pub inference_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub lexicon: Option<PathBuf>,
    pub stopwords: Option<PathBuf>,
    pub model_dir: PathBuf,
    pub model_url: Option<String>,
    pub inference_timeout: Option<Duration>,
}

impl Settings {
    pub fn resolve(args: &ConfigArgs) -> Result<Self> {
        Self::resolve_with(args, |key| std::env::var(key))
    }

    /// Resolve against an arbitrary environment lookup.
    pub fn resolve_with<F>(args: &ConfigArgs, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let lexicon = match &args.lexicon {
            Some(p) => Some(p.clone()),
            None => env_value(&env, TRIAGE_LEXICON_ENV)?.map(PathBuf::from),
        };
        let stopwords = match &args.stopwords {
            Some(p) => Some(p.clone()),
            None => env_value(&env, TRIAGE_STOPWORDS_ENV)?.map(PathBuf::from),
        };
        let model_dir = match &args.model_dir {
            Some(p) => p.clone(),
            None => env_value(&env, TRIAGE_MODEL_DIR_ENV)?
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR)),
        };
        let model_url = match &args.model_url {
            Some(u) => Some(u.clone()),
            None => env_value(&env, TRIAGE_MODEL_URL_ENV)?,
        };
        let inference_timeout = inference_timeout(args.inference_timeout_secs, &env)?;

        Ok(Self {
            lexicon,
            stopwords,
            model_dir,
            model_url,
            inference_timeout,
        })
    }

    pub fn pipeline(&self) -> Result<TextPipeline> {
        let lexicon = match &self.lexicon {
            Some(path) => LexiconFileV1::load(path)
                .with_context(|| format!("failed to load lexicon {}", path.display()))?,
            None => LexiconFileV1::builtin().context("built-in lexicon is invalid")?,
        };
        let stopwords = match &self.stopwords {
            Some(path) => StopwordList::load(path)
                .with_context(|| format!("failed to load stopwords {}", path.display()))?,
            None => StopwordList::builtin(),
        };
        let pipeline = TextPipeline::new(&lexicon, &stopwords).context("invalid lexicon")?;
        tracing::debug!(
            lexicon = ?self.lexicon,
            stopwords = stopwords.len(),
            "text pipeline ready"
        );
        Ok(pipeline)
    }

    pub fn model_store(&self) -> Result<ModelStore> {
        match &self.model_url {
            #[cfg(feature = "http")]
            Some(url) => Ok(ModelStore::Http {
                base_url: url.clone(),
                timeout: self.inference_timeout,
            }),
            #[cfg(not(feature = "http"))]
            Some(url) => Err(anyhow!(
                "model url {url} given but this build has no http support (enable feature `http`)"
            )),
            None => Ok(ModelStore::Directory(self.model_dir.clone())),
        }
    }

    pub fn classifier(&self) -> Result<TopicClassifier> {
        let store = self.model_store()?;
        let classifier = TopicClassifier::load(&store, &ModelNames::default())
            .with_context(|| format!("failed to load topic models from {}", store.location()))?;
        Ok(classifier.with_timeout(self.inference_timeout))
    }
}

fn env_value<F>(env: &F, key: &str) -> Result<Option<String>>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    match env(key) {
        Ok(v) => {
            let v = v.trim();
            Ok(if v.is_empty() { None } else { Some(v.to_string()) })
        }
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(anyhow!("failed to read {key}: {e}")),
    }
}

fn inference_timeout<F>(flag: Option<u64>, env: &F) -> Result<Option<Duration>>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let secs = match flag {
        Some(v) => v,
        None => match env_value(env, TRIAGE_INFERENCE_TIMEOUT_SECS_ENV)? {
            Some(v) => v.parse::<u64>().map_err(|_| {
                anyhow!(
                    "invalid {TRIAGE_INFERENCE_TIMEOUT_SECS_ENV}={v:?} (expected integer seconds; 0 disables)"
                )
            })?,
            None => DEFAULT_INFERENCE_TIMEOUT_SECS,
        },
    };

    Ok(if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    })
}
