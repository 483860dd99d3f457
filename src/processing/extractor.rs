//! Skill extraction strategies and the fallback pipeline

use crate::error::{Result, SkillFitError};
use crate::processing::lexicon::Lexicon;
use crate::processing::normalizer::SkillNormalizer;
use crate::processing::skill::SkillSet;
use aho_corasick::{AhoCorasick, MatchKind};
use anyhow::Context;
use std::io::{Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const DEFAULT_RECOGNIZER_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// One way of turning text into a skill set
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Cheap capability check evaluated before every attempt
    fn is_available(&self) -> bool {
        true
    }

    fn extract(&self, text: &str) -> Result<SkillSet>;
}

/// Deterministic scanner over the lexicon's surface forms
pub struct LexiconExtractor {
    normalizer: Arc<SkillNormalizer>,
    lexicon: Arc<Lexicon>,
    matcher: AhoCorasick,
    patterns: Vec<String>,
}

impl LexiconExtractor {
    pub fn new(normalizer: Arc<SkillNormalizer>, lexicon: Arc<Lexicon>) -> Result<Self> {
        let mut patterns: Vec<String> = lexicon
            .skills()
            .chain(normalizer.aliases())
            .map(|s| s.to_string())
            .collect();
        patterns.sort();
        patterns.dedup();

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&patterns)
            .map_err(|e| SkillFitError::Extraction(format!("Failed to build lexicon matcher: {}", e)))?;

        Ok(Self {
            normalizer,
            lexicon,
            matcher,
            patterns,
        })
    }

    /// Scan `text` for known skills. Never fails; empty text gives an empty set.
    pub fn scan(&self, text: &str) -> SkillSet {
        let haystack = Self::scan_text(text);
        if haystack.is_empty() {
            return SkillSet::new();
        }

        self.matcher
            .find_iter(&haystack)
            .filter(|mat| Self::on_word_boundary(&haystack, mat.start(), mat.end()))
            .filter_map(|mat| self.normalizer.normalize(&self.patterns[mat.pattern().as_usize()]))
            .filter(|skill| self.lexicon.contains(skill.as_str()))
            .collect()
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Lowercase, turn word joiners into spaces and collapse whitespace so
    /// "Machine-Learning" and "machine\nlearning" both hit "machine learning".
    fn scan_text(text: &str) -> String {
        let lowered: String = text
            .to_lowercase()
            .chars()
            .map(|c| match c {
                '-' | '_' | '/' | '\\' | '\u{2013}' | '\u{2014}' => ' ',
                _ => c,
            })
            .collect();
        lowered.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn on_word_boundary(haystack: &str, start: usize, end: usize) -> bool {
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        let last = haystack[start..end].chars().next_back();

        let clear_before = before.map_or(true, |c| !c.is_alphanumeric());
        let clear_after = match after {
            None => true,
            Some(c) if c.is_alphanumeric() => false,
            // "c" must not match inside "c++" or "c#"
            Some('+') | Some('#') => !last.map_or(false, |l| l.is_alphanumeric()),
            Some(_) => true,
        };

        clear_before && clear_after
    }
}

impl ExtractionStrategy for LexiconExtractor {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn extract(&self, text: &str) -> Result<SkillSet> {
        Ok(self.scan(text))
    }
}

/// External named-entity recognizer
pub trait EntityRecognizer: Send + Sync {
    fn name(&self) -> &str;

    fn is_available(&self) -> bool {
        true
    }

    fn extract_entities(&self, text: &str) -> anyhow::Result<Vec<String>>;
}

/// Extraction strategy backed by an entity recognizer
pub struct NerExtractor {
    recognizer: Box<dyn EntityRecognizer>,
    normalizer: Arc<SkillNormalizer>,
}

impl NerExtractor {
    pub fn new(recognizer: Box<dyn EntityRecognizer>, normalizer: Arc<SkillNormalizer>) -> Self {
        Self {
            recognizer,
            normalizer,
        }
    }
}

impl ExtractionStrategy for NerExtractor {
    fn name(&self) -> &str {
        self.recognizer.name()
    }

    fn is_available(&self) -> bool {
        self.recognizer.is_available()
    }

    fn extract(&self, text: &str) -> Result<SkillSet> {
        let entities = self
            .recognizer
            .extract_entities(text)
            .with_context(|| format!("entity recognizer '{}' failed", self.recognizer.name()))?;
        Ok(self.normalizer.skill_set(entities))
    }
}

/// Recognizer that runs an external program: text on stdin, JSON array of
/// entity strings on stdout.
///
/// Input is written and both output pipes are drained on their own threads,
/// so a program that echoes while it reads cannot stall on a full pipe. A run
/// that outlives the timeout is killed and reported as a failure.
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandRecognizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: DEFAULT_RECOGNIZER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build from a `[program, args...]` command line
    pub fn from_command_line(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

impl EntityRecognizer for CommandRecognizer {
    fn name(&self) -> &str {
        &self.program
    }

    fn extract_entities(&self, text: &str) -> anyhow::Result<Vec<String>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn '{}'", self.program))?;

        let stdin = child.stdin.take();
        let input = text.as_bytes().to_vec();
        thread::spawn(move || {
            if let Some(mut stdin) = stdin {
                // The program may exit without consuming all of it
                if let Err(e) = stdin.write_all(&input) {
                    log::debug!("Recognizer stopped reading input: {}", e);
                }
            }
        });

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait().context("failed to poll recognizer")? {
                break status;
            }
            if Instant::now() >= deadline {
                if let Err(e) = child.kill() {
                    log::debug!("Failed to kill recognizer '{}': {}", self.program, e);
                }
                // Reap it; the reader threads finish once the pipes close
                let _ = child.wait();
                anyhow::bail!(
                    "recognizer '{}' timed out after {:?}",
                    self.program,
                    self.timeout
                );
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = join_reader(stdout)?;
        let stderr = join_reader(stderr)?;

        if !status.success() {
            anyhow::bail!(
                "recognizer exited with {}: {}",
                status,
                String::from_utf8_lossy(&stderr).trim()
            );
        }

        let entities: Vec<String> = serde_json::from_slice(&stdout)
            .context("recognizer output is not a JSON array of strings")?;
        Ok(entities)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn join_reader(reader: JoinHandle<std::io::Result<Vec<u8>>>) -> anyhow::Result<Vec<u8>> {
    reader
        .join()
        .map_err(|_| anyhow::anyhow!("recognizer output reader panicked"))?
        .context("failed to read recognizer output")
}

/// Ordered extraction strategies with the lexicon scanner as the final word.
///
/// Strategies are tried in order; unavailable ones are skipped and failing
/// ones (errors or panics) are logged, then the next one runs.
pub struct SkillExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    baseline: LexiconExtractor,
}

impl SkillExtractor {
    pub fn new(baseline: LexiconExtractor) -> Self {
        Self {
            strategies: Vec::new(),
            baseline,
        }
    }

    pub fn with_strategy(mut self, strategy: Box<dyn ExtractionStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn extract(&self, text: &str) -> SkillSet {
        if text.trim().is_empty() {
            return SkillSet::new();
        }

        for strategy in &self.strategies {
            if !strategy.is_available() {
                log::debug!("Extraction strategy '{}' unavailable, skipping", strategy.name());
                continue;
            }

            match panic::catch_unwind(AssertUnwindSafe(|| strategy.extract(text))) {
                Ok(Ok(skills)) => {
                    log::debug!("Strategy '{}' extracted {} skills", strategy.name(), skills.len());
                    return skills;
                }
                Ok(Err(e)) => {
                    log::warn!("Strategy '{}' failed, falling back: {}", strategy.name(), e);
                }
                Err(_) => {
                    log::warn!("Strategy '{}' panicked, falling back", strategy.name());
                }
            }
        }

        self.baseline.scan(text)
    }

    /// Strategy names in resolution order, baseline last
    pub fn strategy_names(&self) -> Vec<String> {
        self.strategies
            .iter()
            .map(|s| s.name().to_string())
            .chain(std::iter::once(self.baseline.name().to_string()))
            .collect()
    }

    pub fn baseline(&self) -> &LexiconExtractor {
        &self.baseline
    }
}
