//! Dashboard composition — the egui/eframe application.
//!
//! # Architecture
//!
//! [`DashboardApp`] is the top-level [`eframe::App`].  It owns the UI
//! state and two channel endpoints:
//!
//! * `command_tx` — sends [`AssistantCommand`] to the orchestrator.
//! * `event_rx`  — receives [`AssistantEvent`] from the orchestrator,
//!   drained non-blocking each frame.
//!
//! All per-context state (conversations, explanation, insight, story,
//! letter, forecast, audio) is tied to a generation counter.  Changing
//! the district or the language bumps the generation, resets the chat
//! surfaces, stops audio, and causes any event still in flight for the
//! old context to be discarded on arrival.

use std::time::Instant;

use eframe::egui;
use tokio::sync::mpsc;

use crate::ai::{ForecastRow, GrievanceDetails, PromptBuilder};
use crate::assistant::{
    AssistantCommand, AssistantEvent, ChatSurface, Conversation, MsgSender, OneShotKind,
};
use crate::audio::{pcm16_to_clip, AudioPlaybackEngine, PlaybackState, RodioOutput};
use crate::config::{AppConfig, AppPaths};
use crate::data::{DistrictDataService, Metric, PerformanceBundle};
use crate::i18n::Language;
use crate::location::{ConfigLocationProvider, LocationProvider};
use crate::speech::{encode_wav_pcm16, VoiceRecorder, UPLOAD_SAMPLE_RATE};

// ---------------------------------------------------------------------------
// Small helpers
// ---------------------------------------------------------------------------

/// A one-shot assistant surface: request pending, then a final text.
#[derive(Default)]
struct OneShotSurface {
    text: Option<String>,
    pending: bool,
}

impl OneShotSurface {
    fn clear(&mut self) {
        self.text = None;
        self.pending = false;
    }
}

fn surface_index(surface: ChatSurface) -> usize {
    match surface {
        ChatSurface::Analyst => 0,
        ChatSurface::Rights => 1,
        ChatSurface::Pension => 2,
        ChatSurface::Worksite => 3,
    }
}

// ---------------------------------------------------------------------------
// DashboardApp
// ---------------------------------------------------------------------------

/// eframe application — the district dashboard.
pub struct DashboardApp {
    // ── Services ─────────────────────────────────────────────────────────
    service: DistrictDataService,
    config: AppConfig,

    // ── Context ──────────────────────────────────────────────────────────
    language: Language,
    districts: Vec<String>,
    selected_district: String,
    /// Bumped on every district/language switch; one-shot and forecast
    /// events from older generations are discarded.
    generation: u64,

    // ── Data ─────────────────────────────────────────────────────────────
    bundle: Option<PerformanceBundle>,

    // ── Chat surfaces ────────────────────────────────────────────────────
    conversations: [Conversation; 4],
    inputs: [String; 4],
    active_tab: ChatSurface,

    // ── One-shot surfaces ────────────────────────────────────────────────
    explanation: OneShotSurface,
    insight: OneShotSurface,
    story: OneShotSurface,
    letter: OneShotSurface,
    letter_form: GrievanceDetails,

    // ── Forecast ─────────────────────────────────────────────────────────
    forecast: Option<ForecastRow>,
    forecast_outstanding: usize,

    // ── Audio / voice ────────────────────────────────────────────────────
    playback: Option<AudioPlaybackEngine<RodioOutput>>,
    voice: Option<VoiceRecorder>,

    // ── Notices ──────────────────────────────────────────────────────────
    notice: Option<(String, Instant)>,

    // ── Channels ─────────────────────────────────────────────────────────
    command_tx: mpsc::Sender<AssistantCommand>,
    event_rx: mpsc::Receiver<AssistantEvent>,
}

impl DashboardApp {
    /// Create the app and load the initially selected district.
    pub fn new(
        command_tx: mpsc::Sender<AssistantCommand>,
        event_rx: mpsc::Receiver<AssistantEvent>,
        config: AppConfig,
        playback: Option<AudioPlaybackEngine<RodioOutput>>,
        voice: Option<VoiceRecorder>,
    ) -> Self {
        let service = DistrictDataService::new();
        let districts = service.list_districts();
        let selected_district = districts.first().cloned().unwrap_or_default();
        let language = config.ui.language;

        let mut app = Self {
            service,
            config,
            language,
            districts,
            selected_district,
            generation: 0,
            bundle: None,
            conversations: Default::default(),
            inputs: Default::default(),
            active_tab: ChatSurface::Analyst,
            explanation: OneShotSurface::default(),
            insight: OneShotSurface::default(),
            story: OneShotSurface::default(),
            letter: OneShotSurface::default(),
            letter_form: GrievanceDetails::default(),
            forecast: None,
            forecast_outstanding: 0,
            playback,
            voice,
            notice: None,
            command_tx,
            event_rx,
        };
        app.reload_bundle();
        app.request_home_district();
        app
    }

    fn prompts(&self) -> PromptBuilder {
        PromptBuilder::new(self.language)
    }

    fn strings(&self) -> &'static crate::i18n::UiStrings {
        self.language.strings()
    }

    fn send(&mut self, command: AssistantCommand) -> bool {
        match self.command_tx.try_send(command) {
            Ok(()) => true,
            Err(e) => {
                log::error!("assistant channel unavailable: {e}");
                false
            }
        }
    }

    // ── Context switching ────────────────────────────────────────────────

    fn reload_bundle(&mut self) {
        self.bundle = match self.service.get_performance(&self.selected_district) {
            Ok(bundle) => Some(bundle),
            Err(e) => {
                // Typed "no data" condition; the UI renders a static
                // message instead of a broken dashboard.
                log::warn!("{e}");
                None
            }
        };
    }

    /// District or language changed: invalidate everything contextual.
    fn switch_context(&mut self) {
        self.generation += 1;
        for conversation in &mut self.conversations {
            conversation.reset();
        }
        self.inputs = Default::default();
        self.explanation.clear();
        self.insight.clear();
        self.story.clear();
        self.letter.clear();
        self.forecast = None;
        self.forecast_outstanding = 0;
        if let Some(engine) = &mut self.playback {
            engine.stop();
        }
        self.reload_bundle();
    }

    /// Ask the gateway to map configured home coordinates to a district.
    fn request_home_district(&mut self) {
        let provider = ConfigLocationProvider::from_config(&self.config.location);
        let Some(coords) = provider.coordinates() else {
            return;
        };
        let prompt = self.prompts().district_from_coords(
            coords.latitude,
            coords.longitude,
            &self.districts,
        );
        let districts = self.districts.clone();
        self.send(AssistantCommand::ResolveHomeDistrict { prompt, districts });
    }

    // ── Event polling ────────────────────────────────────────────────────

    /// Localized text for a failed stream.
    fn stream_error_text(&self, error: &crate::ai::AiError) -> &'static str {
        match error {
            crate::ai::AiError::Disabled => self.strings().ai_disabled,
            _ => self.strings().stream_error,
        }
    }

    /// Drain all pending orchestrator events (non-blocking).
    fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                AssistantEvent::Fragment {
                    surface,
                    ticket,
                    text,
                } => {
                    self.conversations[surface_index(surface)].apply_fragment(ticket, &text);
                }

                AssistantEvent::StreamDone { surface, ticket } => {
                    self.conversations[surface_index(surface)].finish(ticket);
                }

                AssistantEvent::StreamFailed {
                    surface,
                    ticket,
                    error,
                } => {
                    let message = self.stream_error_text(&error);
                    self.conversations[surface_index(surface)].fail(ticket, message);
                }

                AssistantEvent::OneShotReady {
                    kind,
                    generation,
                    result,
                } => {
                    if generation != self.generation {
                        continue; // stale context
                    }
                    let text = match result {
                        Ok(text) => text,
                        Err(e) => self.stream_error_text(&e).to_string(),
                    };
                    let surface = match kind {
                        OneShotKind::Explanation => &mut self.explanation,
                        OneShotKind::Insight => &mut self.insight,
                        OneShotKind::Story => &mut self.story,
                        OneShotKind::Letter => &mut self.letter,
                    };
                    surface.text = Some(text);
                    surface.pending = false;
                }

                AssistantEvent::ForecastReady {
                    generation,
                    metric,
                    forecast,
                } => {
                    if generation != self.generation {
                        continue;
                    }
                    self.forecast_outstanding = self.forecast_outstanding.saturating_sub(1);
                    if let (Some(row), Some(forecast)) = (&mut self.forecast, forecast) {
                        row.merge(metric, forecast);
                    }
                }

                AssistantEvent::SynthesisReady { seq, pcm } => {
                    let rate = self.config.audio.playback_sample_rate;
                    if let Some(engine) = &mut self.playback {
                        let clip = pcm.map(|bytes| pcm16_to_clip(&bytes, rate));
                        engine.on_synthesis(seq, clip);
                    }
                }

                AssistantEvent::TranscriptReady {
                    surface,
                    generation,
                    text,
                } => {
                    if generation != self.generation {
                        continue;
                    }
                    if let Some(text) = text {
                        self.inputs[surface_index(surface)] = text;
                    }
                }

                AssistantEvent::HomeDistrict { name } => {
                    if let Some(name) = name {
                        if name != self.selected_district
                            && self.districts.contains(&name)
                        {
                            self.selected_district = name;
                            self.switch_context();
                        }
                    }
                }
            }
        }
    }

    // ── Requests ─────────────────────────────────────────────────────────

    fn send_question(&mut self, surface: ChatSurface) {
        let question = self.inputs[surface_index(surface)].trim().to_string();
        if question.is_empty() {
            return;
        }

        let prompt = match surface {
            ChatSurface::Analyst => {
                let Some(bundle) = &self.bundle else { return };
                self.prompts().analyst(bundle, &question)
            }
            ChatSurface::Rights => self.prompts().rights(&question),
            ChatSurface::Pension => self.prompts().pension(&question),
            ChatSurface::Worksite => {
                let district = self.selected_district.clone();
                self.prompts().worksite(&district, &question)
            }
        };

        let Some(ticket) = self.conversations[surface_index(surface)].ask(&question) else {
            return; // blank or already in flight
        };
        self.inputs[surface_index(surface)].clear();

        if !self.send(AssistantCommand::Ask {
            surface,
            ticket,
            prompt,
        }) {
            let message = self.strings().request_error;
            self.conversations[surface_index(surface)].fail(ticket, message);
        }
    }

    fn request_one_shot(&mut self, kind: OneShotKind) {
        let prompt = match kind {
            OneShotKind::Explanation => {
                let Some(bundle) = &self.bundle else { return };
                let Some(prompt) = self.prompts().explanation(bundle) else {
                    return;
                };
                prompt
            }
            OneShotKind::Story => {
                let Some(bundle) = &self.bundle else { return };
                let Some(prompt) = self.prompts().story(bundle) else { return };
                prompt
            }
            OneShotKind::Insight => {
                let snapshot = self
                    .service
                    .latest_snapshot()
                    .into_iter()
                    .find(|s| s.name == self.selected_district);
                let Some(snapshot) = snapshot else { return };
                self.prompts().insight(&snapshot)
            }
            OneShotKind::Letter => {
                let mut details = self.letter_form.clone();
                details.district = self.selected_district.clone();
                self.prompts().letter(&details)
            }
        };

        let generation = self.generation;
        let surface = match kind {
            OneShotKind::Explanation => &mut self.explanation,
            OneShotKind::Insight => &mut self.insight,
            OneShotKind::Story => &mut self.story,
            OneShotKind::Letter => &mut self.letter,
        };
        if surface.pending {
            return; // one outstanding request per surface
        }
        surface.pending = true;

        if !self.send(AssistantCommand::OneShot {
            kind,
            generation,
            prompt,
        }) {
            let message = self.strings().request_error.to_string();
            let surface = match kind {
                OneShotKind::Explanation => &mut self.explanation,
                OneShotKind::Insight => &mut self.insight,
                OneShotKind::Story => &mut self.story,
                OneShotKind::Letter => &mut self.letter,
            };
            surface.pending = false;
            surface.text = Some(message);
        }
    }

    fn request_forecast(&mut self) {
        if self.forecast_outstanding > 0 {
            return;
        }
        let Some(bundle) = &self.bundle else { return };

        let series: Vec<(Metric, Vec<(u16, f64)>)> = Metric::ALL
            .iter()
            .map(|&metric| {
                (
                    metric,
                    bundle
                        .district
                        .series
                        .iter()
                        .map(|r| (r.year, r.metric(metric)))
                        .collect(),
                )
            })
            .collect();

        let Some(target_year) = bundle.district.latest().map(|r| r.year + 1) else {
            return;
        };

        // One merged row per future year, created up front; every metric's
        // result lands in it as it arrives.
        self.forecast = Some(ForecastRow::new(target_year));
        self.forecast_outstanding = series.len();

        let generation = self.generation;
        let language = self.language;
        if !self.send(AssistantCommand::Forecast {
            generation,
            language,
            series,
        }) {
            self.forecast = None;
            self.forecast_outstanding = 0;
        }
    }

    /// Toggle speech playback for `text` (shared entry point for every
    /// speaker button).
    fn toggle_speech(&mut self, text: &str) {
        let Some(engine) = &mut self.playback else {
            return;
        };
        if let Some(request) = engine.toggle(text) {
            let seq = request.seq;
            let sent = self.send(AssistantCommand::Synthesize {
                seq,
                text: request.text,
            });
            if !sent {
                if let Some(engine) = &mut self.playback {
                    engine.on_synthesis(seq, None);
                }
            }
        }
    }

    fn toggle_voice(&mut self) {
        let surface = self.active_tab;
        let generation = self.generation;
        let language = self.language;

        let captured = {
            let Some(recorder) = &mut self.voice else { return };
            if recorder.is_recording() {
                recorder.stop()
            } else {
                if let Err(e) = recorder.start() {
                    log::warn!("could not start voice recording: {e}");
                }
                return;
            }
        };

        if let Some(samples) = captured {
            let wav = encode_wav_pcm16(&samples, UPLOAD_SAMPLE_RATE);
            self.send(AssistantCommand::Transcribe {
                surface,
                generation,
                wav,
                language,
            });
        }
    }

    fn export_csv(&mut self) {
        let Some(bundle) = &self.bundle else { return };
        let path = AppPaths::new()
            .exports_dir
            .join(format!("{}.csv", bundle.district.name));

        match crate::data::export::save_district_csv(&bundle.district, &path) {
            Ok(()) => {
                let message =
                    format!("{} {}", self.strings().export_done, path.display());
                self.notice = Some((message, Instant::now()));
            }
            Err(e) => log::error!("CSV export failed: {e}"),
        }
    }

    fn copy_letter(&mut self) {
        let Some(text) = self.letter.text.clone() else { return };
        match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text)) {
            Ok(()) => {
                self.notice =
                    Some((self.strings().letter_copied.to_string(), Instant::now()));
            }
            Err(e) => log::warn!("clipboard unavailable: {e}"),
        }
    }

    fn busy(&self) -> bool {
        self.conversations.iter().any(|c| c.in_flight())
            || self.explanation.pending
            || self.insight.pending
            || self.story.pending
            || self.letter.pending
            || self.forecast_outstanding > 0
            || self
                .playback
                .as_ref()
                .is_some_and(|p| p.state() != PlaybackState::Stopped)
            || self.voice.as_ref().is_some_and(|v| v.is_recording())
    }

    // ── Section renderers ────────────────────────────────────────────────

    fn draw_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(self.strings().app_title);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let mut switched = false;
                for lang in [Language::Hindi, Language::English] {
                    if ui
                        .selectable_label(self.language == lang, lang.label())
                        .clicked()
                        && self.language != lang
                    {
                        self.language = lang;
                        switched = true;
                    }
                }
                if switched {
                    self.switch_context();
                }
            });
        });

        ui.horizontal(|ui| {
            ui.label(self.strings().district_label);
            let mut selection = self.selected_district.clone();
            egui::ComboBox::from_id_salt("district-picker")
                .selected_text(selection.clone())
                .show_ui(ui, |ui| {
                    for district in &self.districts {
                        ui.selectable_value(
                            &mut selection,
                            district.clone(),
                            district.as_str(),
                        );
                    }
                });
            if selection != self.selected_district {
                self.selected_district = selection;
                self.switch_context();
            }
        });
    }

    fn draw_metrics(&mut self, ui: &mut egui::Ui) {
        let s = self.strings();
        let Some(bundle) = &self.bundle else {
            ui.label(s.no_data);
            return;
        };
        let Some((latest, average)) = bundle.latest_with_average() else {
            return;
        };

        egui::Grid::new("metric-cards")
            .num_columns(4)
            .spacing([24.0, 4.0])
            .show(ui, |ui| {
                for metric in Metric::ALL {
                    ui.vertical(|ui| {
                        ui.label(
                            egui::RichText::new(metric.label(self.language)).size(12.0),
                        );
                        ui.label(
                            egui::RichText::new(format!("{:.1}", latest.metric(metric)))
                                .size(20.0)
                                .strong(),
                        );
                        let avg_value = match metric {
                            Metric::HouseholdsEmployed => average.households_employed,
                            Metric::PersonDays => average.person_days_lakh,
                            Metric::AverageDays => average.average_days,
                            Metric::Expenditure => average.expenditure_crore,
                        };
                        let (arrow, note) = if latest.metric(metric) >= avg_value {
                            ("▲", s.above_average)
                        } else {
                            ("▼", s.below_average)
                        };
                        ui.label(
                            egui::RichText::new(format!("{arrow} {note}")).size(11.0),
                        );
                    });
                }
                ui.end_row();
            });
    }

    fn draw_table(&mut self, ui: &mut egui::Ui) {
        let s = self.strings();
        let Some(bundle) = &self.bundle else { return };

        egui::Grid::new("yearly-table")
            .striped(true)
            .num_columns(5)
            .show(ui, |ui| {
                ui.label(egui::RichText::new(s.year_column).strong());
                for metric in Metric::ALL {
                    ui.label(egui::RichText::new(metric.label(self.language)).strong());
                }
                ui.end_row();

                for record in &bundle.district.series {
                    ui.label(record.year.to_string());
                    ui.label(format!("{:.0}", record.households_employed));
                    ui.label(format!("{:.1}", record.person_days_lakh));
                    ui.label(format!("{:.1}", record.average_days));
                    ui.label(format!("{:.1}", record.expenditure_crore));
                    ui.end_row();
                }
            });

        if ui.button(s.export_button).clicked() {
            self.export_csv();
        }
    }

    /// Speaker-button label for the engine's state on `text`.
    fn speaker_label(&self, text: &str) -> &'static str {
        match self
            .playback
            .as_ref()
            .map(|p| p.state_for(text))
            .unwrap_or(PlaybackState::Stopped)
        {
            PlaybackState::Playing => "⏸",
            PlaybackState::Paused => "▶",
            PlaybackState::Stopped => "🔊",
            PlaybackState::Loading => "…",
        }
    }

    /// A one-shot surface: heading, trigger button, spinner, result text
    /// with an optional speaker button.
    fn draw_one_shot(
        &mut self,
        ui: &mut egui::Ui,
        heading: &str,
        button: &str,
        kind: OneShotKind,
        with_audio: bool,
    ) {
        ui.separator();
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(heading).strong());
            let pending = match kind {
                OneShotKind::Explanation => self.explanation.pending,
                OneShotKind::Insight => self.insight.pending,
                OneShotKind::Story => self.story.pending,
                OneShotKind::Letter => self.letter.pending,
            };
            if pending {
                ui.spinner();
            } else if ui.button(button).clicked() {
                self.request_one_shot(kind);
            }
        });

        let text = match kind {
            OneShotKind::Explanation => self.explanation.text.clone(),
            OneShotKind::Insight => self.insight.text.clone(),
            OneShotKind::Story => self.story.text.clone(),
            OneShotKind::Letter => self.letter.text.clone(),
        };
        if let Some(text) = text {
            let mut speak = false;
            ui.horizontal_wrapped(|ui| {
                ui.label(text.as_str());
                if with_audio && self.playback.is_some() {
                    speak = ui.button(self.speaker_label(&text)).clicked();
                }
            });
            if speak {
                self.toggle_speech(&text);
            }
        }
    }

    fn draw_forecast(&mut self, ui: &mut egui::Ui) {
        let s = self.strings();
        ui.separator();
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(s.forecast_heading).strong());
            if self.forecast_outstanding > 0 {
                ui.spinner();
            } else if ui.button(s.forecast_button).clicked() {
                self.request_forecast();
            }
        });

        if let Some(row) = &self.forecast {
            if !row.is_empty() {
                egui::Grid::new("forecast-row").num_columns(3).show(ui, |ui| {
                    for metric in Metric::ALL {
                        if let Some(forecast) = row.get(metric) {
                            ui.label(format!(
                                "{} {}",
                                s.forecast_next_year, row.year
                            ));
                            ui.label(format!(
                                "{}: {:.1}",
                                metric.label(self.language),
                                forecast.forecasted_value
                            ));
                            ui.label(
                                egui::RichText::new(&forecast.explanation).size(11.0),
                            );
                            ui.end_row();
                        }
                    }
                });
            }
        }
    }

    fn draw_letter_form(&mut self, ui: &mut egui::Ui) {
        let s = self.strings();
        ui.separator();
        ui.label(egui::RichText::new(s.letter_heading).strong());

        egui::Grid::new("letter-form").num_columns(2).show(ui, |ui| {
            ui.label(s.letter_name);
            ui.text_edit_singleline(&mut self.letter_form.name);
            ui.end_row();

            ui.label(s.letter_village);
            ui.text_edit_singleline(&mut self.letter_form.village);
            ui.end_row();

            ui.label(s.letter_complaint_type);
            ui.text_edit_singleline(&mut self.letter_form.complaint_type);
            ui.end_row();

            ui.label(s.letter_details);
            ui.text_edit_multiline(&mut self.letter_form.details);
            ui.end_row();
        });

        ui.horizontal(|ui| {
            if self.letter.pending {
                ui.spinner();
            } else if ui.button(s.letter_draft_button).clicked() {
                self.request_one_shot(OneShotKind::Letter);
            }
            if self.letter.text.is_some() && ui.button(s.letter_copy_button).clicked() {
                self.copy_letter();
            }
        });

        if let Some(text) = &self.letter.text {
            ui.add(egui::Label::new(text.clone()).wrap());
        }
    }

    fn draw_chat(&mut self, ui: &mut egui::Ui) {
        let s = self.strings();
        ui.separator();

        // Tab strip
        ui.horizontal(|ui| {
            for surface in ChatSurface::ALL {
                let title = match surface {
                    ChatSurface::Analyst => s.analyst_tab,
                    ChatSurface::Rights => s.rights_tab,
                    ChatSurface::Pension => s.pension_tab,
                    ChatSurface::Worksite => s.worksite_tab,
                };
                if ui
                    .selectable_label(self.active_tab == surface, title)
                    .clicked()
                {
                    self.active_tab = surface;
                }
            }
        });

        let tab = self.active_tab;
        let idx = surface_index(tab);
        let in_flight = self.conversations[idx].in_flight();

        // History
        let mut speak_request: Option<String> = None;
        egui::ScrollArea::vertical()
            .id_salt("chat-history")
            .max_height(260.0)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if self.conversations[idx].messages().is_empty() {
                    ui.label(s.chat_greeting);
                }
                for message in self.conversations[idx].messages() {
                    match message.sender {
                        MsgSender::User => {
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Min),
                                |ui| {
                                    ui.add(
                                        egui::Label::new(
                                            egui::RichText::new(&message.text).strong(),
                                        )
                                        .wrap(),
                                    );
                                },
                            );
                        }
                        MsgSender::Assistant => {
                            if message.text.is_empty() && !message.done {
                                ui.horizontal(|ui| {
                                    ui.spinner();
                                    ui.label(s.analyzing);
                                });
                            } else {
                                ui.horizontal_wrapped(|ui| {
                                    ui.add(
                                        egui::Label::new(message.text.clone()).wrap(),
                                    );
                                    if message.done && self.playback.is_some() {
                                        let label = self.speaker_label(&message.text);
                                        if ui.small_button(label).clicked() {
                                            speak_request = Some(message.text.clone());
                                        }
                                    }
                                });
                            }
                        }
                    }
                    ui.add_space(4.0);
                }
            });
        if let Some(text) = speak_request {
            self.toggle_speech(&text);
        }

        // Input row
        let mut submit = false;
        let mut toggle_mic = false;
        ui.horizontal(|ui| {
            let response = ui.add_sized(
                [ui.available_width() - 140.0, 24.0],
                egui::TextEdit::singleline(&mut self.inputs[idx])
                    .hint_text(s.chat_placeholder),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit = true;
            }

            if let Some(recorder) = &self.voice {
                let label = if recorder.is_recording() {
                    s.stop_listen_button
                } else {
                    s.listen_button
                };
                if ui.button(label).clicked() {
                    toggle_mic = true;
                }
            }

            if ui
                .add_enabled(!in_flight, egui::Button::new(s.send_button))
                .clicked()
            {
                submit = true;
            }
        });

        if toggle_mic {
            self.toggle_voice();
        }
        if submit && !in_flight {
            self.send_question(tab);
        }
    }
}

// ---------------------------------------------------------------------------
// eframe::App
// ---------------------------------------------------------------------------

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();

        if let Some(engine) = &mut self.playback {
            engine.poll();
        }

        // Stop an overrun recording and submit what was captured.
        if self.voice.as_ref().is_some_and(|v| v.overrun()) {
            self.toggle_voice();
        }

        // Expire transient notices.
        let notice_expired = self
            .notice
            .as_ref()
            .is_some_and(|(_, shown)| shown.elapsed().as_secs_f32() > 4.0);
        if notice_expired {
            self.notice = None;
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.draw_header(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("dashboard-scroll")
                .show(ui, |ui| {
                    self.draw_metrics(ui);
                    self.draw_table(ui);

                    let s = self.strings();
                    let (explanation_heading, explanation_button) =
                        (s.explanation_heading, s.explain_button);
                    let (insight_heading, insight_button) =
                        (s.insight_heading, s.insight_button);
                    let (story_heading, story_button) = (s.story_heading, s.story_button);

                    self.draw_one_shot(
                        ui,
                        explanation_heading,
                        explanation_button,
                        OneShotKind::Explanation,
                        true,
                    );
                    self.draw_one_shot(
                        ui,
                        insight_heading,
                        insight_button,
                        OneShotKind::Insight,
                        true,
                    );
                    self.draw_forecast(ui);
                    self.draw_one_shot(
                        ui,
                        story_heading,
                        story_button,
                        OneShotKind::Story,
                        true,
                    );
                    self.draw_letter_form(ui);
                    self.draw_chat(ui);

                    if let Some((message, _)) = &self.notice {
                        ui.separator();
                        ui.label(message.clone());
                    }
                });
        });

        // Keep streaming text, audio and timers moving without user input.
        if self.busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
