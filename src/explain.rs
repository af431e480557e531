use std::{
    sync::{
        Arc,
        mpsc::{self, RecvTimeoutError},
    },
    thread,
    time::{Duration, Instant},
};

use serde_json::json;
use thiserror::Error;

use crate::interpreter::lexer::{KEYWORDS, NATURAL_KEYWORDS};

/// Base URL of the generative-language REST API.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Model asked for explanations unless configured otherwise.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
/// The explanation reported when no explainer is configured at all.
pub const UNCONFIGURED: &str = "Explanation unavailable: no explainer is configured.";

const SYSTEM_INSTRUCTION: &str = "You explain how a small teaching language is processed: the \
                                  lexer, then the parser, then the semantic analyser. Explain \
                                  what the program does in plain words, point out errors or \
                                  ambiguities and suggest fixes. Use short bullet points and \
                                  stay under 200 words.";

/// Everything that can go wrong while asking for an explanation.
#[derive(Debug, Error)]
pub enum ExplainError {
    /// No API key was supplied.
    #[error("the API key is not configured")]
    MissingApiKey,
    /// The request failed or the service answered with an error status.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered without any text.
    #[error("the response contained no text")]
    EmptyResponse,
    /// No answer arrived in time.
    #[error("no answer within {:.1} seconds", .0.as_secs_f64())]
    TimedOut(Duration),
    /// The worker thread died before answering.
    #[error("the explanation worker stopped unexpectedly")]
    WorkerLost,
}

/// The text reported in place of an explanation that could not be produced.
///
/// # Example
/// ```
/// use plainscript::explain::{ExplainError, placeholder};
///
/// assert_eq!(placeholder(&ExplainError::MissingApiKey),
///            "Explanation unavailable: the API key is not configured.");
/// ```
#[must_use]
pub fn placeholder(error: &ExplainError) -> String {
    format!("Explanation unavailable: {error}.")
}

/// A source of natural-language explanations for programs.
///
/// Implementations may block for as long as they like; callers bound the
/// wait with [`spawn`] and [`PendingExplanation::wait`].
pub trait Explainer: Send + Sync {
    /// Explains `source`.
    ///
    /// # Errors
    /// Whatever prevented the explanation from being produced.
    fn explain(&self, source: &str) -> Result<String, ExplainError>;
}

/// An explanation being produced on a background thread.
pub struct PendingExplanation {
    receiver: mpsc::Receiver<Result<String, ExplainError>>,
    started:  Instant,
}

/// Starts explaining `source` on a detached background thread.
///
/// The timeout passed to [`PendingExplanation::wait`] is measured from this
/// call, so work done in the meantime counts against it.
pub fn spawn(explainer: Arc<dyn Explainer>, source: &str) -> PendingExplanation {
    let (sender, receiver) = mpsc::channel();
    let source = source.to_string();

    let spawned = thread::Builder::new().name("explainer".to_string())
                                        .spawn(move || {
                                            // The receiver is gone if the caller stopped waiting.
                                            let _ = sender.send(explainer.explain(&source));
                                        });
    if let Err(error) = spawned {
        log::warn!("could not start the explanation worker: {error}");
    }

    PendingExplanation { receiver,
                         started: Instant::now() }
}

impl PendingExplanation {
    /// Waits until the explanation is ready or `timeout` has passed since
    /// [`spawn`].
    ///
    /// A timed out worker is abandoned, not cancelled; its answer is dropped.
    ///
    /// # Errors
    /// The explainer's own error, [`ExplainError::TimedOut`], or
    /// [`ExplainError::WorkerLost`] if the worker never answered.
    pub fn wait(self, timeout: Duration) -> Result<String, ExplainError> {
        let remaining = timeout.saturating_sub(self.started.elapsed());

        let result = match self.receiver.recv_timeout(remaining) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(ExplainError::TimedOut(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(ExplainError::WorkerLost),
        };

        log::debug!("explanation settled after {:?}", self.started.elapsed());
        result
    }
}

/// Asks a generative-language REST endpoint for explanations.
#[derive(Debug, Clone)]
pub struct HttpExplainer {
    client:   reqwest::blocking::Client,
    endpoint: String,
    model:    String,
    api_key:  Option<String>,
}

impl HttpExplainer {
    /// Creates an explainer whose requests give up after `timeout`.
    ///
    /// A missing `api_key` is not an error here: every call to
    /// [`Explainer::explain`] then fails with [`ExplainError::MissingApiKey`]
    /// without touching the network.
    ///
    /// # Errors
    /// The HTTP client could not be built.
    pub fn new(endpoint: impl Into<String>,
               model: impl Into<String>,
               api_key: Option<String>,
               timeout: Duration)
               -> Result<Self, ExplainError> {
        let client = reqwest::blocking::Client::builder().timeout(timeout)
                                                         .build()?;

        Ok(Self { client,
                  endpoint: endpoint.into(),
                  model: model.into(),
                  api_key })
    }
}

impl Explainer for HttpExplainer {
    fn explain(&self, source: &str) -> Result<String, ExplainError> {
        let api_key = self.api_key
                          .as_deref()
                          .ok_or(ExplainError::MissingApiKey)?;
        let url = format!("{}/models/{}:generateContent",
                          self.endpoint.trim_end_matches('/'),
                          self.model);
        let body = json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "parts": [{ "text": build_prompt(source) }] }],
            "generationConfig": { "temperature": 0.5 },
        });

        log::debug!("requesting an explanation from {url}");
        let response: serde_json::Value = self.client
                                              .post(&url)
                                              .header("x-goog-api-key", api_key)
                                              .json(&body)
                                              .send()?
                                              .error_for_status()?
                                              .json()?;

        response.pointer("/candidates/0/content/parts/0/text")
                .and_then(serde_json::Value::as_str)
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
                .ok_or(ExplainError::EmptyResponse)
    }
}

/// Builds the request text: a grammar summary followed by the program.
#[must_use]
pub fn build_prompt(source: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("Analyse the user's program using the grammar below. For each line:\n");
    prompt.push_str("1. Lexical: list the tokens.\n");
    prompt.push_str("2. Parsing: name the grammar rules that matched.\n");
    prompt.push_str("3. Semantics: note what the line means and any problem with it.\n");
    prompt.push_str("If anything is wrong, end with a \"Possible Errors\" section naming each as a \
                     syntax error or a semantic error.\n\n");

    prompt.push_str("Grammar:\n");
    prompt.push_str("- program: statements, optionally wrapped in `begin ... end`\n");
    prompt.push_str("- statements end with `;`; blocks are `begin ... end`\n");
    prompt.push_str("- let NAME = EXPR; NAME = EXPR; print(ITEM, ...);\n");
    prompt.push_str("- if COND BLOCK [elseif COND BLOCK]* [else BLOCK]\n");
    prompt.push_str("- for [let] NAME = EXPR to EXPR [step EXPR] BLOCK; while COND BLOCK\n");
    prompt.push_str("- function NAME(PARAMS) BLOCK; return [EXPR]; break; continue;\n");
    prompt.push_str("- set NAME to EXPR; add EXPR to NAME; sub EXPR from NAME; mult NAME by \
                     EXPR; div NAME by EXPR;\n");
    prompt.push_str("- if NAME is OP EXPR then STATEMENTS\n");
    prompt.push_str("- operators: + - * / < > <= >= == != and or not\n");
    prompt.push_str(&format!("- keywords: {}\n", KEYWORDS.join(", ")));
    prompt.push_str(&format!("- natural-language keywords: {}\n\n", NATURAL_KEYWORDS.join(", ")));

    prompt.push_str("User program:\n```\n");
    prompt.push_str(source);
    prompt.push_str("\n```\n");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Slow;

    impl Explainer for Slow {
        fn explain(&self, _source: &str) -> Result<String, ExplainError> {
            thread::sleep(Duration::from_secs(5));
            Ok("too late".to_string())
        }
    }

    struct Echo;

    impl Explainer for Echo {
        fn explain(&self, source: &str) -> Result<String, ExplainError> {
            Ok(format!("explained: {source}"))
        }
    }

    #[test]
    fn slow_explainers_time_out() {
        let pending = spawn(Arc::new(Slow), "print(1);");
        let result = pending.wait(Duration::from_millis(50));
        assert!(matches!(result, Err(ExplainError::TimedOut(_))));
    }

    #[test]
    fn answers_are_passed_through() {
        let pending = spawn(Arc::new(Echo), "print(1);");
        let result = pending.wait(Duration::from_secs(5));
        assert_eq!(result.unwrap(), "explained: print(1);");
    }

    #[test]
    fn missing_key_fails_without_a_request() {
        let explainer = HttpExplainer::new("http://127.0.0.1:9", DEFAULT_MODEL, None,
                                           Duration::from_secs(1)).unwrap();
        assert!(matches!(explainer.explain("print(1);"), Err(ExplainError::MissingApiKey)));
    }

    #[test]
    fn prompt_embeds_program_and_keywords() {
        let prompt = build_prompt("let x = 1;");
        assert!(prompt.contains("let x = 1;"));
        assert!(prompt.contains("elseif"));
        assert!(prompt.contains("mult"));
    }
}
