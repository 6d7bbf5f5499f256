// Interactive listening loop: transcript source -> session -> sink,
// with spoken feedback. An empty line confirms the current draft; EOF
// or Ctrl+C ends the loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::ai::{AiClient, TaskEnhancer};
use crate::capture::{StdinSource, TranscriptSource};
use crate::config::Config;
use crate::session::{ListeningSession, SessionError};
use crate::sink::{self, SinkError, TaskSink};
use crate::speech::{prompts, Speaker};
use crate::task::NewTask;

/// How long a confirmation waits for an in-flight remote analysis.
const CONFIRM_GRACE: Duration = Duration::from_secs(3);

pub fn run_listen(config: Config) -> Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_ctrlc = shutdown.clone();
    ctrlc::set_handler(move || {
        tracing::info!("Shutdown signal received");
        shutdown_ctrlc.store(true, Ordering::Relaxed);
    })?;

    let speaker = Speaker::from_config(&config.speech, &config.assistant.locale);
    let sink = sink::build_sink(&config)?;
    let enhancer = build_enhancer(&config);
    let mut source = StdinSource::new();

    speaker.say(prompts::WELCOME);
    println!("(escribe el recordatorio; línea vacía para confirmar, Ctrl+C para salir)");

    run_loop(
        &mut source,
        sink.as_ref(),
        &speaker,
        enhancer,
        config.assistant.user_id,
        &shutdown,
    )
}

fn build_enhancer(config: &Config) -> Option<Arc<dyn TaskEnhancer>> {
    if !config.ai.enabled {
        return None;
    }
    match AiClient::from_config(&config.ai) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            // Missing key or bad config is not fatal; the local parser
            // still works.
            tracing::warn!("AI analysis unavailable: {:#}", e);
            None
        }
    }
}

pub(crate) fn run_loop(
    source: &mut dyn TranscriptSource,
    sink: &dyn TaskSink,
    speaker: &Speaker,
    enhancer: Option<Arc<dyn TaskEnhancer>>,
    user_id: u32,
    shutdown: &AtomicBool,
) -> Result<()> {
    let mut session = ListeningSession::start(enhancer.clone())?;

    while !shutdown.load(Ordering::Relaxed) {
        let Some(update) = source.next_transcript()? else {
            break;
        };

        if update.trim().is_empty() {
            confirm(&mut session, sink, speaker, user_id);
            session = ListeningSession::start(enhancer.clone())?;
            continue;
        }

        match session.update_transcript(&update) {
            Some(draft) => println!(
                "-> {} | {} {} | {}",
                draft.title,
                draft.date,
                if draft.time.is_empty() { "--:--" } else { draft.time.as_str() },
                draft.category.as_str()
            ),
            None => tracing::debug!("No reminder intent in: {}", update),
        }
    }

    session.cancel();
    tracing::info!("Listening stopped");
    Ok(())
}

fn confirm(
    session: &mut ListeningSession,
    sink: &dyn TaskSink,
    speaker: &Speaker,
    user_id: u32,
) {
    let draft = match session.finish(CONFIRM_GRACE) {
        Ok(draft) => draft,
        Err(SessionError::Incomplete) => {
            speaker.say(prompts::RETRY);
            return;
        }
    };

    let task = NewTask::from_draft(draft.clone(), user_id);
    match sink.create_task(&task) {
        Ok(created) => {
            tracing::info!(id = created.id, "Reminder stored via {} sink", sink.name());
            speaker.say(&prompts::created(&draft));
        }
        Err(SinkError::Validation(message)) => {
            tracing::warn!("Task rejected by sink: {}", message);
            speaker.say(prompts::INVALID);
        }
        Err(e) => {
            tracing::error!("Failed to create task: {:#}", e);
            speaker.say(prompts::ERROR);
        }
    }
}
