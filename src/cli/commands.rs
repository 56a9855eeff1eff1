//! Handlers for each CLI subcommand.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::{GenerateArgs, ScriptArgs, VoicesArgs};
use crate::audio::FfmpegCodec;
use crate::cache::FingerprintCache;
use crate::config::PodcastConfig;
use crate::error::{PodcastError, Result};
use crate::podcast::{PipelineStage, PodcastAssembler, PodcastRequest, ProgressSink};
use crate::segment::{parse_script_lines, split_paragraphs, write_segments};
use crate::voice::MAX_SELECTED_VOICES;

/// `podforge generate`
pub async fn handle_generate(config_path: Option<&Path>, args: GenerateArgs) -> Result<()> {
    if args.voices.len() > MAX_SELECTED_VOICES {
        return Err(PodcastError::InvalidInput(format!(
            "at most {MAX_SELECTED_VOICES} voices can be selected, got {}",
            args.voices.len()
        )));
    }

    let mut config = PodcastConfig::load(config_path)?;
    if let Some(model) = args.model {
        config.model_id = Some(model);
    }
    if let Some(dir) = args.cache_dir {
        config.cache_dir = dir;
    }
    if let Some(ms) = args.gap_ms {
        config.gap = Duration::from_millis(ms);
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency.max(1);
    }

    for label in &args.voices {
        if !config.catalog().contains(label) {
            eprintln!("warning: unknown voice '{label}' ignored (see `podforge voices`)");
        }
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    let progress: ProgressSink = Arc::new(|stage: &PipelineStage| match stage {
        PipelineStage::Loading => eprintln!("Loading segments..."),
        PipelineStage::Synthesizing { index, total } => {
            eprintln!("  [{}/{}] synthesizing", index + 1, total)
        }
        PipelineStage::Assembling => eprintln!("Assembling podcast..."),
        _ => {}
    });

    let assembler = PodcastAssembler::from_config(&config)
        .await?
        .with_progress(progress);
    let request = PodcastRequest::new(args.source)
        .with_labels(args.voices)
        .with_gap(config.gap)
        .with_output(config.output.clone());

    let artifact = assembler
        .generate_podcast_with_cancel(&request, &cancel)
        .await?;

    eprintln!(
        "Done: {} segments, {:.1}s",
        artifact.segments,
        artifact.duration.as_secs_f64()
    );
    println!("{}", artifact.path.display());
    Ok(())
}

/// `podforge voices`
pub fn handle_voices(config_path: Option<&Path>, args: VoicesArgs) -> Result<()> {
    let config = PodcastConfig::load(config_path)?;
    let catalog = config.catalog();
    for entry in catalog.entries() {
        if args.gender.is_some() && entry.gender != args.gender {
            continue;
        }
        println!("{}\t{}", entry.label, entry.voice_id);
    }
    Ok(())
}

/// `podforge script`
pub fn handle_script(args: ScriptArgs) -> Result<()> {
    let text = match std::fs::read_to_string(&args.input) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(PodcastError::NotFound(args.input));
        }
        Err(err) => return Err(err.into()),
    };

    let segments = if args.paragraphs {
        split_paragraphs(&text)
    } else {
        parse_script_lines(text.lines())
    };
    if segments.is_empty() {
        return Err(PodcastError::EmptyInput(format!(
            "{} contains no script text",
            args.input.display()
        )));
    }

    write_segments(&args.output, &segments)?;
    eprintln!("Wrote {} segments", segments.len());
    println!("{}", args.output.display());
    Ok(())
}

/// `podforge cache clear`
pub fn handle_cache_clear(config_path: Option<&Path>, cache_dir: Option<&Path>) -> Result<()> {
    let config = PodcastConfig::load(config_path)?;
    let dir = cache_dir.unwrap_or(config.cache_dir.as_path());
    let cache = FingerprintCache::new(dir, Arc::new(FfmpegCodec::new(&config.ffmpeg_path)));
    let removed = cache.clear()?;
    println!("Removed {removed} cached clips from {}", dir.display());
    Ok(())
}
