//! ONNX-based extractive question answering
//!
//! Runs a SQuAD2-style model (`deepset/roberta-base-squad2` by default) with
//! ONNX Runtime. Long documents are split into overlapping windows; every
//! window is scored and the best spans across all of them are returned.

use async_trait::async_trait;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokenizers::{Encoding, Tokenizer, TruncationDirection, TruncationParams, TruncationStrategy};

use crate::config::QaConfig;
use crate::error::{Error, Result};
use crate::types::CandidateAnswer;

use super::service::{AnswerParams, AnswerService};
use super::span::{SpanRanker, WindowLogits};

/// Local question-answering model
pub struct OnnxQaModel {
    /// ONNX Runtime session
    session: Arc<Mutex<Session>>,
    /// HuggingFace tokenizer, truncating the context into windows
    tokenizer: Arc<Tokenizer>,
    /// Model id
    model: String,
    /// Feed token_type_ids to the graph
    use_token_type_ids: bool,
}

impl OnnxQaModel {
    /// Load the model, downloading it into the cache directory on first use
    pub async fn new(config: &QaConfig) -> Result<Self> {
        tracing::info!("Initializing ONNX question answering model: {}", config.model);

        let model_dir = model_dir(&config.cache_dir, &config.model);
        std::fs::create_dir_all(&model_dir).map_err(|e| {
            Error::Config(format!("Failed to create cache directory: {}", e))
        })?;

        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            download(&hub_url(&config.model, "onnx/model.onnx"), &model_path).await?;
        }
        if !tokenizer_path.exists() {
            download(&hub_url(&config.model, "tokenizer.json"), &tokenizer_path).await?;
        }

        let session = Session::builder()
            .map_err(|e| Error::model(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| Error::model(format!("Failed to set optimization level: {}", e)))?
            .with_intra_threads(4)
            .map_err(|e| Error::model(format!("Failed to set threads: {}", e)))?
            .commit_from_file(&model_path)
            .map_err(|e| Error::model(format!("Failed to load model: {}", e)))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| Error::model(format!("Failed to load tokenizer: {}", e)))?;

        // Only the context is truncated; every overflow becomes another window
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_seq_len,
                stride: config.doc_stride,
                strategy: TruncationStrategy::OnlySecond,
                direction: TruncationDirection::Right,
            }))
            .map_err(|e| Error::model(format!("Failed to configure truncation: {}", e)))?;
        tokenizer.with_padding(None);

        tracing::info!("ONNX question answering model initialized");

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model: config.model.clone(),
            use_token_type_ids: config.use_token_type_ids,
        })
    }
}

#[async_trait]
impl AnswerService for OnnxQaModel {
    async fn answer(
        &self,
        question: &str,
        context: &str,
        params: &AnswerParams,
    ) -> Result<Vec<CandidateAnswer>> {
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let question = question.to_string();
        let context = context.to_string();
        let params = *params;
        let use_token_type_ids = self.use_token_type_ids;

        tokio::task::spawn_blocking(move || {
            run_inference(
                &session,
                &tokenizer,
                &question,
                &context,
                &params,
                use_token_type_ids,
            )
        })
        .await
        .map_err(|e| Error::model(format!("Inference task failed: {}", e)))?
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "onnx"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Tokenize, run every window, rank spans
fn run_inference(
    session: &Mutex<Session>,
    tokenizer: &Tokenizer,
    question: &str,
    context: &str,
    params: &AnswerParams,
    use_token_type_ids: bool,
) -> Result<Vec<CandidateAnswer>> {
    let encoding = tokenizer
        .encode((question, context), true)
        .map_err(|e| Error::model(format!("Tokenization failed: {}", e)))?;

    let windows: Vec<&Encoding> = std::iter::once(&encoding)
        .chain(encoding.get_overflowing().iter())
        .collect();
    tracing::debug!("Question split into {} windows", windows.len());

    let mut ranker = SpanRanker::new(*params);

    for window in windows {
        let (start_logits, end_logits) = run_window(session, window, use_token_type_ids)?;

        let context_mask: Vec<bool> = window
            .get_sequence_ids()
            .iter()
            .map(|id| *id == Some(1))
            .collect();

        ranker.add_window(&WindowLogits {
            start_logits: &start_logits,
            end_logits: &end_logits,
            context_mask: &context_mask,
            offsets: window.get_offsets(),
        });
    }

    Ok(ranker.finish(context))
}

/// Run one window through the model, returning (start_logits, end_logits)
fn run_window(
    session: &Mutex<Session>,
    window: &Encoding,
    use_token_type_ids: bool,
) -> Result<(Vec<f32>, Vec<f32>)> {
    let seq_len = window.get_ids().len();
    let input_ids: Vec<i64> = window.get_ids().iter().map(|&id| id as i64).collect();
    let attention_mask: Vec<i64> = window
        .get_attention_mask()
        .iter()
        .map(|&m| m as i64)
        .collect();

    let input_ids_tensor = Tensor::from_array((vec![1, seq_len], input_ids.into_boxed_slice()))
        .map_err(|e| Error::model(format!("Input tensor creation failed: {}", e)))?;
    let attention_mask_tensor =
        Tensor::from_array((vec![1, seq_len], attention_mask.into_boxed_slice()))
            .map_err(|e| Error::model(format!("Attention mask tensor creation failed: {}", e)))?;

    let mut inputs = vec![
        ("input_ids", input_ids_tensor.into_dyn()),
        ("attention_mask", attention_mask_tensor.into_dyn()),
    ];

    if use_token_type_ids {
        let token_type_ids: Vec<i64> = window.get_type_ids().iter().map(|&t| t as i64).collect();
        let token_type_ids_tensor =
            Tensor::from_array((vec![1, seq_len], token_type_ids.into_boxed_slice()))
                .map_err(|e| Error::model(format!("Token type tensor creation failed: {}", e)))?;
        inputs.push(("token_type_ids", token_type_ids_tensor.into_dyn()));
    }

    let mut session = session.lock();
    let outputs = session
        .run(inputs)
        .map_err(|e| Error::model(format!("Inference failed: {}", e)))?;

    let output_iter: Vec<_> = outputs.iter().collect();
    let start = output_iter
        .iter()
        .find(|(name, _)| *name == "start_logits")
        .or_else(|| output_iter.first())
        .map(|(_, v)| v)
        .ok_or_else(|| Error::model("No start_logits output"))?;
    let end = output_iter
        .iter()
        .find(|(name, _)| *name == "end_logits")
        .or_else(|| output_iter.get(1))
        .map(|(_, v)| v)
        .ok_or_else(|| Error::model("No end_logits output"))?;

    let (_, start_data) = start
        .try_extract_tensor::<f32>()
        .map_err(|e| Error::model(format!("Failed to extract start logits: {}", e)))?;
    let (_, end_data) = end
        .try_extract_tensor::<f32>()
        .map_err(|e| Error::model(format!("Failed to extract end logits: {}", e)))?;

    Ok((start_data.to_vec(), end_data.to_vec()))
}

/// Cache directory for one model id
fn model_dir(cache_dir: &Path, model: &str) -> PathBuf {
    cache_dir.join(model.replace('/', "--"))
}

fn hub_url(model: &str, file: &str) -> String {
    format!("https://huggingface.co/{}/resolve/main/{}", model, file)
}

/// Download a model file from the hub
async fn download(url: &str, path: &Path) -> Result<()> {
    tracing::info!("Downloading {}", url);

    let response = reqwest::get(url)
        .await
        .map_err(|e| Error::model(format!("Failed to download {}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(Error::model(format!(
            "Download of {} failed: HTTP {}",
            url,
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::model(format!("Failed to read {}: {}", url, e)))?;

    std::fs::write(path, &bytes)
        .map_err(|e| Error::model(format!("Failed to save {}: {}", path.display(), e)))?;

    tracing::info!("Saved {} ({} bytes)", path.display(), bytes.len());

    Ok(())
}
