//! picprompt: turn images into creative text-generation prompts.
//!
//! Uploads each image to the configured S3 bucket, detects up to 7 labels
//! with AWS Rekognition, feeds them with a prompt template into the OpenAI
//! completions API, prints the result, and deletes the temporary blob.
//!
//! Usage:
//!   picprompt photo.jpg
//!   picprompt --temperature 0.9 --prompt-text "Ten surreal prompts:" a.png b.png
//!   picprompt --bucket my-bucket --top-p 0.5 cat.jpg

use std::path::PathBuf;
use std::sync::Arc;

use picprompt_core::{defaults, GenerationParams, ImageOutcome, ImageUpload, Stage};
use picprompt_inference::{OpenAiGenerator, RekognitionDetector};
use picprompt_pipeline::PromptPipeline;
use picprompt_storage::{S3BlobStore, S3Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
struct Args {
    images: Vec<PathBuf>,
    temperature: f32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
    prompt_text: String,
    bucket: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            images: vec![],
            temperature: defaults::DEFAULT_TEMPERATURE,
            top_p: defaults::DEFAULT_TOP_P,
            frequency_penalty: defaults::DEFAULT_FREQUENCY_PENALTY,
            presence_penalty: defaults::DEFAULT_PRESENCE_PENALTY,
            prompt_text: defaults::DEFAULT_PROMPT_TEMPLATE.to_string(),
            bucket: None,
        }
    }
}

fn parse_float(flag: &str, value: Option<&String>) -> Result<f32, String> {
    value
        .ok_or_else(|| format!("{} expects a value", flag))?
        .parse::<f32>()
        .map_err(|_| format!("{} expects a number between 0.0 and 1.0", flag))
}

fn parse_value(flag: &str, value: Option<&String>) -> Result<String, String> {
    value
        .cloned()
        .ok_or_else(|| format!("{} expects a value", flag))
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut result = Args::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--temperature" | "-t" => {
                i += 1;
                result.temperature = parse_float("--temperature", args.get(i))?;
            }
            "--top-p" => {
                i += 1;
                result.top_p = parse_float("--top-p", args.get(i))?;
            }
            "--frequency-penalty" => {
                i += 1;
                result.frequency_penalty = parse_float("--frequency-penalty", args.get(i))?;
            }
            "--presence-penalty" => {
                i += 1;
                result.presence_penalty = parse_float("--presence-penalty", args.get(i))?;
            }
            "--prompt-text" | "-p" => {
                i += 1;
                result.prompt_text = parse_value("--prompt-text", args.get(i))?;
            }
            "--bucket" | "-b" => {
                i += 1;
                result.bucket = Some(parse_value("--bucket", args.get(i))?);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => {
                return Err(format!("Unknown option: {}", flag));
            }
            image => {
                result.images.push(PathBuf::from(image));
            }
        }
        i += 1;
    }

    Ok(result)
}

/// Read each image once into memory. An unreadable path becomes that
/// image's failed outcome; it never aborts the rest of the batch.
async fn read_uploads(paths: &[PathBuf]) -> (Vec<ImageUpload>, Vec<ImageOutcome>) {
    let mut uploads = Vec::with_capacity(paths.len());
    let mut failures = Vec::new();
    for path in paths {
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| path.display().to_string());
        match tokio::fs::read(path).await {
            Ok(bytes) => uploads.push(ImageUpload::new(filename, bytes)),
            Err(e) => failures.push(ImageOutcome::failure(
                filename,
                None,
                Stage::Uploading,
                e.into(),
            )),
        }
    }
    (uploads, failures)
}

fn print_help() {
    println!(
        r#"
picprompt - image prompt generator

Usage: picprompt [OPTIONS] <IMAGE>...

Arguments:
  <IMAGE>...                     PNG or JPEG files to process

Options:
  -t, --temperature <F>          Sampling temperature, 0.0-1.0 (default: 0.7)
      --top-p <F>                Nucleus-sampling cutoff, 0.0-1.0 (default: 1.0)
      --frequency-penalty <F>    Frequency penalty, 0.0-1.0 (default: 0.0)
      --presence-penalty <F>     Presence penalty, 0.0-1.0 (default: 0.0)
  -p, --prompt-text <TEXT>       Instruction text prefixed to the label list
                                 (max 350 characters)
  -b, --bucket <NAME>            S3 bucket for temporary blobs
                                 (default: picpromptbucket, or PICPROMPT_BUCKET)
  -h, --help                     Print help

Environment:
  OPENAI_API_KEY                 Required. Text-generation API key.
  OPENAI_BASE_URL                Override the OpenAI endpoint.
  OPENAI_GEN_MODEL               Override the completion model.
  PICPROMPT_BUCKET               Default blob bucket.
  PICPROMPT_S3_ENDPOINT          Custom S3 endpoint (e.g. MinIO).
  AWS_*                          Standard AWS credential chain for S3 and
                                 Rekognition.
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "picprompt=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli_args: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&cli_args) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(2);
        }
    };

    if args.images.is_empty() {
        print_help();
        std::process::exit(2);
    }

    // Parameters are validated before any remote call is made.
    let params = GenerationParams::new(
        args.temperature,
        args.top_p,
        args.frequency_penalty,
        args.presence_penalty,
        args.prompt_text.clone(),
    )?;

    let (uploads, read_failures) = read_uploads(&args.images).await;

    // Wire the three remote collaborators. Configuration is read once
    // here at startup and passed down; there are no ambient globals.
    let mut s3_config = S3Config::from_env();
    if let Some(bucket) = args.bucket {
        s3_config.bucket = bucket;
    }
    let store = Arc::new(S3BlobStore::new(s3_config)?);
    let detector = Arc::new(RekognitionDetector::from_env().await);
    let generator = Arc::new(OpenAiGenerator::from_env()?);

    let pipeline = PromptPipeline::new(store, detector, generator);
    let mut outcomes = pipeline.process_batch(uploads, &params).await;
    outcomes.extend(read_failures);

    let mut any_succeeded = false;
    for outcome in &outcomes {
        println!("\n=== {} ===", outcome.filename);
        match &outcome.result {
            Ok(text) => {
                any_succeeded = true;
                println!("{}", text);
            }
            Err(e) => {
                let stage = outcome
                    .failed_stage
                    .map(|s| s.as_str())
                    .unwrap_or("processing");
                eprintln!("failed while {}: {}", stage, e);
            }
        }
    }

    if !any_succeeded {
        anyhow::bail!("no image produced prompts");
    }
    Ok(())
}
