//! Assistant orchestrator — bridges the UI and the AI gateway.
//!
//! [`run_assistant`] runs inside the tokio runtime.  It listens for
//! [`AssistantCommand`]s from the UI, spawns one task per request so
//! independent features can be in flight concurrently, and emits
//! [`AssistantEvent`]s back over an mpsc channel the UI drains each frame.
//!
//! Every streaming request is guaranteed to end with exactly one
//! `StreamDone` or `StreamFailed` event, so the conversation's in-flight
//! flag is always released.  One-shot failures are carried as values in
//! their events; no gateway error ever crosses into rendering code as a
//! panic.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::ai::{fetch_forecast, AiError, AiGateway, Forecast};
use crate::data::Metric;
use crate::i18n::Language;

use super::conversation::StreamTicket;

// ---------------------------------------------------------------------------
// Command / event types
// ---------------------------------------------------------------------------

/// The four chat surfaces, each owning its own conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSurface {
    Analyst,
    Rights,
    Pension,
    Worksite,
}

impl ChatSurface {
    pub const ALL: [ChatSurface; 4] = [
        ChatSurface::Analyst,
        ChatSurface::Rights,
        ChatSurface::Pension,
        ChatSurface::Worksite,
    ];
}

/// One-shot request kinds sharing the same completion flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneShotKind {
    Explanation,
    Insight,
    Story,
    Letter,
}

/// Commands sent from the UI to the orchestrator.  Prompts are built on
/// the UI side (it owns the data bundle and language); the orchestrator
/// only moves them to the gateway.
#[derive(Debug)]
pub enum AssistantCommand {
    /// Open a streamed completion for a chat surface.
    Ask {
        surface: ChatSurface,
        ticket: StreamTicket,
        prompt: String,
    },
    /// One-shot completion (explanation, insight, story, letter).
    OneShot {
        kind: OneShotKind,
        generation: u64,
        prompt: String,
    },
    /// Forecast every metric of a series for the next year.
    Forecast {
        generation: u64,
        language: Language,
        series: Vec<(Metric, Vec<(u16, f64)>)>,
    },
    /// Synthesize speech for the playback engine.
    Synthesize { seq: u64, text: String },
    /// Transcribe a WAV voice recording into a chat input.
    Transcribe {
        surface: ChatSurface,
        generation: u64,
        wav: Vec<u8>,
        language: Language,
    },
    /// Resolve home coordinates to one of the given districts.
    ResolveHomeDistrict {
        prompt: String,
        districts: Vec<String>,
    },
}

/// Events delivered from the orchestrator to the UI.
#[derive(Debug)]
pub enum AssistantEvent {
    /// One streamed fragment, in arrival order.
    Fragment {
        surface: ChatSurface,
        ticket: StreamTicket,
        text: String,
    },
    /// Clean stream exhaustion.
    StreamDone {
        surface: ChatSurface,
        ticket: StreamTicket,
    },
    /// Stream failure (including failure to open).
    StreamFailed {
        surface: ChatSurface,
        ticket: StreamTicket,
        error: AiError,
    },
    /// Result of a one-shot completion.
    OneShotReady {
        kind: OneShotKind,
        generation: u64,
        result: Result<String, AiError>,
    },
    /// One metric's forecast; `None` when the model output did not parse.
    ForecastReady {
        generation: u64,
        metric: Metric,
        forecast: Option<Forecast>,
    },
    /// Synthesized PCM for the playback engine; `None` on failure.
    SynthesisReady { seq: u64, pcm: Option<Vec<u8>> },
    /// Voice-input transcript; `None` on failure.
    TranscriptReady {
        surface: ChatSurface,
        generation: u64,
        text: Option<String>,
    },
    /// Validated home district, when resolution succeeded.
    HomeDistrict { name: Option<String> },
}

// ---------------------------------------------------------------------------
// Orchestrator loop
// ---------------------------------------------------------------------------

/// Consume commands until the UI drops its sender.
pub async fn run_assistant(
    gateway: Arc<dyn AiGateway>,
    mut command_rx: mpsc::Receiver<AssistantCommand>,
    event_tx: mpsc::Sender<AssistantEvent>,
) {
    while let Some(command) = command_rx.recv().await {
        let gateway = Arc::clone(&gateway);
        let tx = event_tx.clone();

        match command {
            AssistantCommand::Ask {
                surface,
                ticket,
                prompt,
            } => {
                tokio::spawn(stream_answer(gateway, tx, surface, ticket, prompt));
            }

            AssistantCommand::OneShot {
                kind,
                generation,
                prompt,
            } => {
                tokio::spawn(async move {
                    let result = gateway.complete(&prompt).await;
                    if let Err(e) = &result {
                        log::warn!("{kind:?} request failed: {e}");
                    }
                    let _ = tx
                        .send(AssistantEvent::OneShotReady {
                            kind,
                            generation,
                            result,
                        })
                        .await;
                });
            }

            AssistantCommand::Forecast {
                generation,
                language,
                series,
            } => {
                for (metric, history) in series {
                    let gateway = Arc::clone(&gateway);
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let forecast =
                            fetch_forecast(gateway.as_ref(), language, metric, &history).await;
                        let _ = tx
                            .send(AssistantEvent::ForecastReady {
                                generation,
                                metric,
                                forecast,
                            })
                            .await;
                    });
                }
            }

            AssistantCommand::Synthesize { seq, text } => {
                tokio::spawn(async move {
                    let pcm = match gateway.synthesize_speech(&text).await {
                        Ok(pcm) => Some(pcm),
                        Err(e) => {
                            log::warn!("speech synthesis failed: {e}");
                            None
                        }
                    };
                    let _ = tx.send(AssistantEvent::SynthesisReady { seq, pcm }).await;
                });
            }

            AssistantCommand::Transcribe {
                surface,
                generation,
                wav,
                language,
            } => {
                tokio::spawn(async move {
                    let text = match gateway.transcribe(&wav, language).await {
                        Ok(text) => Some(text),
                        Err(e) => {
                            log::warn!("voice transcription failed: {e}");
                            None
                        }
                    };
                    let _ = tx
                        .send(AssistantEvent::TranscriptReady {
                            surface,
                            generation,
                            text,
                        })
                        .await;
                });
            }

            AssistantCommand::ResolveHomeDistrict { prompt, districts } => {
                tokio::spawn(async move {
                    let name = match gateway.complete(&prompt).await {
                        Ok(answer) => {
                            let answer = answer.trim().to_string();
                            // Only accept an exact member of the list.
                            districts.into_iter().find(|d| *d == answer)
                        }
                        Err(e) => {
                            log::warn!("home-district resolution failed: {e}");
                            None
                        }
                    };
                    let _ = tx.send(AssistantEvent::HomeDistrict { name }).await;
                });
            }
        }
    }
}

/// Drive one streamed completion to its terminal event.
async fn stream_answer(
    gateway: Arc<dyn AiGateway>,
    tx: mpsc::Sender<AssistantEvent>,
    surface: ChatSurface,
    ticket: StreamTicket,
    prompt: String,
) {
    let mut stream = match gateway.complete_streaming(&prompt).await {
        Ok(stream) => stream,
        Err(error) => {
            let _ = tx
                .send(AssistantEvent::StreamFailed {
                    surface,
                    ticket,
                    error,
                })
                .await;
            return;
        }
    };

    loop {
        match stream.next().await {
            Some(Ok(text)) => {
                let delivered = tx
                    .send(AssistantEvent::Fragment {
                        surface,
                        ticket,
                        text,
                    })
                    .await;
                if delivered.is_err() {
                    // UI gone; dropping the stream cancels the transport.
                    return;
                }
            }
            Some(Err(error)) => {
                let _ = tx
                    .send(AssistantEvent::StreamFailed {
                        surface,
                        ticket,
                        error,
                    })
                    .await;
                return;
            }
            None => {
                let _ = tx.send(AssistantEvent::StreamDone { surface, ticket }).await;
                return;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::TextStream;
    use async_trait::async_trait;

    // -----------------------------------------------------------------------
    // ScriptedGateway
    // -----------------------------------------------------------------------

    /// Gateway double driven by canned responses.
    struct ScriptedGateway {
        stream_items: Vec<Result<String, ()>>,
        completion: Result<String, ()>,
        pcm: Result<Vec<u8>, ()>,
    }

    impl ScriptedGateway {
        fn streaming(items: Vec<Result<String, ()>>) -> Self {
            Self {
                stream_items: items,
                completion: Err(()),
                pcm: Err(()),
            }
        }

        fn completing(text: &str) -> Self {
            Self {
                stream_items: Vec::new(),
                completion: Ok(text.to_string()),
                pcm: Err(()),
            }
        }

        fn synthesizing(pcm: Vec<u8>) -> Self {
            Self {
                stream_items: Vec::new(),
                completion: Err(()),
                pcm: Ok(pcm),
            }
        }
    }

    fn err() -> AiError {
        AiError::Request("scripted failure".into())
    }

    #[async_trait]
    impl AiGateway for ScriptedGateway {
        async fn complete(&self, _prompt: &str) -> Result<String, AiError> {
            self.completion.clone().map_err(|_| err())
        }

        async fn complete_streaming(&self, _prompt: &str) -> Result<TextStream, AiError> {
            Ok(TextStream::from_items(
                self.stream_items
                    .iter()
                    .map(|item| item.clone().map_err(|_| err()))
                    .collect(),
            ))
        }

        async fn complete_structured(
            &self,
            _prompt: &str,
            _schema: &serde_json::Value,
        ) -> Result<serde_json::Value, AiError> {
            Err(err())
        }

        async fn synthesize_speech(&self, _text: &str) -> Result<Vec<u8>, AiError> {
            self.pcm.clone().map_err(|_| err())
        }

        async fn transcribe(
            &self,
            _wav: &[u8],
            _language: Language,
        ) -> Result<String, AiError> {
            self.completion.clone().map_err(|_| err())
        }
    }

    fn harness(
        gateway: ScriptedGateway,
    ) -> (
        mpsc::Sender<AssistantCommand>,
        mpsc::Receiver<AssistantEvent>,
    ) {
        let (command_tx, command_rx) = mpsc::channel(8);
        let (event_tx, event_rx) = mpsc::channel(32);
        tokio::spawn(run_assistant(Arc::new(gateway), command_rx, event_tx));
        (command_tx, event_rx)
    }

    const TICKET: StreamTicket = StreamTicket { generation: 7 };

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn streamed_ask_yields_fragments_then_done() {
        let gateway =
            ScriptedGateway::streaming(vec![Ok("Hel".to_string()), Ok("lo".to_string())]);
        let (command_tx, mut event_rx) = harness(gateway);

        command_tx
            .send(AssistantCommand::Ask {
                surface: ChatSurface::Analyst,
                ticket: TICKET,
                prompt: "q".into(),
            })
            .await
            .unwrap();

        match event_rx.recv().await.unwrap() {
            AssistantEvent::Fragment { text, ticket, .. } => {
                assert_eq!(text, "Hel");
                assert_eq!(ticket, TICKET);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        match event_rx.recv().await.unwrap() {
            AssistantEvent::Fragment { text, .. } => assert_eq!(text, "lo"),
            other => panic!("unexpected event: {other:?}"),
        }
        match event_rx.recv().await.unwrap() {
            AssistantEvent::StreamDone { surface, ticket } => {
                assert_eq!(surface, ChatSurface::Analyst);
                assert_eq!(ticket, TICKET);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn mid_stream_error_ends_with_stream_failed() {
        let gateway = ScriptedGateway::streaming(vec![Ok("partial".to_string()), Err(())]);
        let (command_tx, mut event_rx) = harness(gateway);

        command_tx
            .send(AssistantCommand::Ask {
                surface: ChatSurface::Rights,
                ticket: TICKET,
                prompt: "q".into(),
            })
            .await
            .unwrap();

        assert!(matches!(
            event_rx.recv().await.unwrap(),
            AssistantEvent::Fragment { .. }
        ));
        assert!(matches!(
            event_rx.recv().await.unwrap(),
            AssistantEvent::StreamFailed {
                surface: ChatSurface::Rights,
                ..
            }
        ));
        // Terminal: nothing else follows for this request.
        assert!(event_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn one_shot_carries_result_and_generation() {
        let gateway = ScriptedGateway::completing("a letter");
        let (command_tx, mut event_rx) = harness(gateway);

        command_tx
            .send(AssistantCommand::OneShot {
                kind: OneShotKind::Letter,
                generation: 3,
                prompt: "p".into(),
            })
            .await
            .unwrap();

        match event_rx.recv().await.unwrap() {
            AssistantEvent::OneShotReady {
                kind,
                generation,
                result,
            } => {
                assert_eq!(kind, OneShotKind::Letter);
                assert_eq!(generation, 3);
                assert_eq!(result.unwrap(), "a letter");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn synthesis_failure_becomes_none_not_error() {
        let gateway = ScriptedGateway::streaming(Vec::new()); // pcm: Err
        let (command_tx, mut event_rx) = harness(gateway);

        command_tx
            .send(AssistantCommand::Synthesize {
                seq: 9,
                text: "hello".into(),
            })
            .await
            .unwrap();

        match event_rx.recv().await.unwrap() {
            AssistantEvent::SynthesisReady { seq, pcm } => {
                assert_eq!(seq, 9);
                assert!(pcm.is_none());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn synthesis_success_carries_pcm() {
        let gateway = ScriptedGateway::synthesizing(vec![1, 2, 3, 4]);
        let (command_tx, mut event_rx) = harness(gateway);

        command_tx
            .send(AssistantCommand::Synthesize {
                seq: 1,
                text: "hello".into(),
            })
            .await
            .unwrap();

        match event_rx.recv().await.unwrap() {
            AssistantEvent::SynthesisReady { pcm, .. } => {
                assert_eq!(pcm.unwrap(), vec![1, 2, 3, 4]);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn home_district_must_match_candidate_list() {
        let gateway = ScriptedGateway::completing("Lucknow");
        let (command_tx, mut event_rx) = harness(gateway);

        command_tx
            .send(AssistantCommand::ResolveHomeDistrict {
                prompt: "p".into(),
                districts: vec!["Agra".into(), "Lucknow".into()],
            })
            .await
            .unwrap();

        match event_rx.recv().await.unwrap() {
            AssistantEvent::HomeDistrict { name } => assert_eq!(name.unwrap(), "Lucknow"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn hallucinated_district_is_rejected() {
        let gateway = ScriptedGateway::completing("Mumbai");
        let (command_tx, mut event_rx) = harness(gateway);

        command_tx
            .send(AssistantCommand::ResolveHomeDistrict {
                prompt: "p".into(),
                districts: vec!["Agra".into(), "Lucknow".into()],
            })
            .await
            .unwrap();

        match event_rx.recv().await.unwrap() {
            AssistantEvent::HomeDistrict { name } => assert!(name.is_none()),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
