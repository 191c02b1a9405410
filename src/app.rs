//! Main application UI.
//! Tabbed window over the story matrix, the question bank, framework notes and practice mode.

use eframe::egui;
use lp_matrix::audio::{AudioError, CommandCapture, CommandPlayback, Playback, Recording};
use lp_matrix::config::AppConfig;
use lp_matrix::database::DocumentStore;
use lp_matrix::database::library::{save_framework, save_matrix, save_questions};
use lp_matrix::export::json::{export_json_to_path, import_json};
use lp_matrix::models::story_matrix::MAX_SCORE;
use lp_matrix::models::{DisplayState, LEADERSHIP_PRINCIPLES, Library, StoryEntry};
use lp_matrix::practice::ActiveCard;
use lp_matrix::{PracticeError, PracticeScope, PracticeSession, Timestamp};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Tab {
    #[default]
    Matrix,
    StoryEditor,
    Questions,
    Framework,
    Practice,
}

#[derive(Default)]
struct StoryForm {
    experience: String,
    principle: String,
    score: u8,
    points: String,
    story: String,
}

#[derive(Default)]
struct QuestionForm {
    pool: String,
    editing: Option<String>,
    question: String,
    answer: String,
    key_points: String,
}

pub struct LpMatrixApp {
    config: AppConfig,
    store: Arc<dyn DocumentStore>,
    library: Library,
    session: PracticeSession,
    last_scope: Option<PracticeScope>,
    tab: Tab,
    story_form: StoryForm,
    question_form: QuestionForm,
    new_experience: String,
    recording: Option<Recording>,
    playback: Option<Playback>,
    message: Option<String>,
}

fn lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

fn card_text(card: &ActiveCard) -> String {
    let item = &card.item;
    match card.state() {
        DisplayState::Question => format!(
            "{}\n\nQuestion:\n{}\n\n(Press Space to see the answer)",
            card.scope_label, item.prompt
        ),
        DisplayState::Answer => {
            let hint = if item.has_key_points() {
                "(Press Space to see key points)"
            } else {
                "(Press Space to complete this review)"
            };
            let answer = if item.response.is_empty() { "(no answer written yet)" } else { &item.response };
            format!("{}\n\nAnswer:\n{}\n\n{}", card.scope_label, answer, hint)
        }
        DisplayState::KeyPoints => format!(
            "{}\n\nKey Points:\n{}\n\n(Press Space to complete this review)",
            card.scope_label,
            item.key_points.join("\n")
        ),
    }
}

/// Space is the reveal trigger outside text fields. It is consumed before any widget
/// runs, so one press advances the card exactly once.
fn take_reveal_key(ctx: &egui::Context) -> bool {
    !ctx.wants_keyboard_input() && ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Space))
}

impl eframe::App for LpMatrixApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_audio(ctx);

        if self.tab == Tab::Practice && take_reveal_key(ctx) {
            self.reveal_next();
        }

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, Tab::Matrix, "Matrix View");
                ui.selectable_value(&mut self.tab, Tab::StoryEditor, "Story Editor");
                ui.selectable_value(&mut self.tab, Tab::Questions, "Questions");
                ui.selectable_value(&mut self.tab, Tab::Framework, "Framework");
                ui.selectable_value(&mut self.tab, Tab::Practice, "Practice");
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Matrix => self.render_matrix(ui),
            Tab::StoryEditor => self.render_story_editor(ui),
            Tab::Questions => self.render_questions(ui),
            Tab::Framework => self.render_framework(ui),
            Tab::Practice => self.render_practice(ui),
        });

        let mut close_message = false;
        if let Some(message) = &self.message {
            egui::Window::new("Message")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        close_message = true;
                    }
                });
        }
        if close_message {
            self.message = None;
        }
    }
}

impl LpMatrixApp {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>, library: Library) -> Self {
        let session = PracticeSession::open(Arc::clone(&store));
        let warnings: Vec<&str> = library
            .load_warnings
            .iter()
            .map(String::as_str)
            .chain(session.load_warning())
            .collect();
        let message = (!warnings.is_empty()).then(|| warnings.join("\n\n"));
        let question_form = QuestionForm {
            pool: LEADERSHIP_PRINCIPLES[0].to_string(),
            ..QuestionForm::default()
        };
        Self {
            config,
            store,
            library,
            session,
            last_scope: None,
            tab: Tab::Matrix,
            story_form: StoryForm::default(),
            question_form,
            new_experience: String::new(),
            recording: None,
            playback: None,
            message,
        }
    }

    fn show_error(&mut self, context: &str, error: impl std::fmt::Display) {
        log::error!("{}: {}", context, error);
        self.message = Some(format!("{}: {}", context, error));
    }

    // ==================== Matrix ====================

    fn render_matrix(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("New experience:");
            ui.text_edit_singleline(&mut self.new_experience);
            if ui.button("Add Experience").clicked() {
                match self.library.experiences.add(&self.new_experience) {
                    Ok(_) => {
                        self.new_experience.clear();
                        self.persist_matrix();
                    }
                    Err(e) => self.message = Some(e.to_string()),
                }
            }
        });
        ui.separator();

        if self.library.experiences.is_empty() {
            ui.label("Add an experience to start building your story matrix.");
        }

        let mut action_open: Option<(String, String)> = None;
        let mut action_remove: Option<String> = None;

        egui::ScrollArea::both().id_source("matrix_scroll").show(ui, |ui| {
            egui::Grid::new("story_matrix").striped(true).show(ui, |ui| {
                ui.strong("Experience");
                for principle in LEADERSHIP_PRINCIPLES {
                    ui.label(egui::RichText::new(principle).small());
                }
                ui.end_row();

                for experience in self.library.experiences.iter() {
                    ui.horizontal(|ui| {
                        ui.label(experience);
                        if ui.small_button("✖").on_hover_text("Remove experience").clicked() {
                            action_remove = Some(experience.to_string());
                        }
                    });
                    for principle in LEADERSHIP_PRINCIPLES {
                        let cell = match self.library.matrix.story(experience, principle) {
                            Some(story) if story.score > 0 => story.stars(),
                            Some(_) => "•".to_string(),
                            None => "+".to_string(),
                        };
                        if ui.small_button(cell).clicked() {
                            action_open = Some((experience.to_string(), principle.to_string()));
                        }
                    }
                    ui.end_row();
                }
            });
        });

        ui.separator();
        let uncovered = self.library.matrix.uncovered_principles();
        if uncovered.is_empty() {
            ui.label("Every Leadership Principle has at least one story.");
        } else {
            ui.label(format!("Principles without a story ({}): {}", uncovered.len(), uncovered.join(", ")));
        }

        if let Some((experience, principle)) = action_open {
            self.load_story_to_editor(&experience, &principle);
            self.tab = Tab::StoryEditor;
        }
        if let Some(experience) = action_remove {
            let removed = self.library.matrix.remove_experience(&experience);
            self.library.experiences.remove(&experience);
            log::info!("Removed experience '{}' with {} stories", experience, removed);
            self.persist_matrix();
        }
    }

    fn load_story_to_editor(&mut self, experience: &str, principle: &str) {
        let story = self
            .library
            .matrix
            .story(experience, principle)
            .cloned()
            .unwrap_or_default();
        self.story_form = StoryForm {
            experience: experience.to_string(),
            principle: principle.to_string(),
            score: story.score,
            points: story.points.join("\n"),
            story: story.story,
        };
    }

    fn persist_matrix(&mut self) -> bool {
        match save_matrix(self.store.as_ref(), &self.library.matrix, &self.library.experiences) {
            Ok(()) => true,
            Err(e) => {
                self.show_error("Failed to save stories", e);
                false
            }
        }
    }

    // ==================== Story editor ====================

    fn render_story_editor(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("story_form").num_columns(2).show(ui, |ui| {
            ui.label("Experience:");
            egui::ComboBox::from_id_source("experience_combo")
                .selected_text(self.story_form.experience.clone())
                .show_ui(ui, |ui| {
                    for name in self.library.experiences.iter() {
                        ui.selectable_value(&mut self.story_form.experience, name.to_string(), name);
                    }
                });
            ui.end_row();

            ui.label("Leadership Principle:");
            egui::ComboBox::from_id_source("principle_combo")
                .selected_text(self.story_form.principle.clone())
                .show_ui(ui, |ui| {
                    for principle in LEADERSHIP_PRINCIPLES {
                        ui.selectable_value(&mut self.story_form.principle, principle.to_string(), principle);
                    }
                });
            ui.end_row();

            ui.label(format!("Score (0-{}):", MAX_SCORE));
            egui::ComboBox::from_id_source("score_combo")
                .selected_text(self.story_form.score.to_string())
                .show_ui(ui, |ui| {
                    for score in 0..=MAX_SCORE {
                        ui.selectable_value(&mut self.story_form.score, score, score.to_string());
                    }
                });
            ui.end_row();
        });

        ui.label("Key Points (one per line):");
        ui.add(
            egui::TextEdit::multiline(&mut self.story_form.points)
                .desired_rows(5)
                .desired_width(f32::INFINITY),
        );
        ui.label("STAR Story:");
        ui.add(
            egui::TextEdit::multiline(&mut self.story_form.story)
                .desired_rows(10)
                .desired_width(f32::INFINITY),
        );

        ui.horizontal(|ui| {
            if ui.button("Save Story").clicked() {
                self.save_story();
            }
            if ui.button("Clear").clicked() {
                self.story_form = StoryForm::default();
            }
            if ui.button("Delete Story").clicked() {
                let form = &self.story_form;
                if self.library.matrix.remove_story(&form.experience, &form.principle).is_some() {
                    self.story_form = StoryForm::default();
                    self.persist_matrix();
                }
            }
        });
    }

    fn save_story(&mut self) {
        let experience = self.story_form.experience.clone();
        let entry = StoryEntry::new(
            lines(&self.story_form.points),
            self.story_form.score,
            self.story_form.story.clone(),
        );
        if let Err(e) = self.library.matrix.upsert_story(&experience, &self.story_form.principle, entry) {
            self.message = Some(e.to_string());
            return;
        }
        if let Err(e) = self.library.experiences.add(&experience) {
            log::warn!("Story saved under an unnamed experience: {}", e);
        }
        if self.persist_matrix() {
            self.message = Some("Story saved successfully!".to_string());
        }
    }

    // ==================== Question bank ====================

    fn render_questions(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            egui::ComboBox::from_label("Pool")
                .selected_text(self.question_form.pool.clone())
                .show_ui(ui, |ui| {
                    for pool in self.library.questions.pool_keys() {
                        let label = pool.clone();
                        ui.selectable_value(&mut self.question_form.pool, pool, label);
                    }
                });
            if ui.button("Export Questions").clicked() {
                self.handle_export();
            }
            if ui.button("Import Questions").clicked() {
                self.handle_import();
            }
        });
        ui.separator();

        let mut action_edit: Option<String> = None;
        let mut action_remove: Option<String> = None;
        let pool = self.question_form.pool.clone();

        egui::ScrollArea::vertical()
            .id_source("questions_list")
            .max_height(300.0)
            .show(ui, |ui| {
                for question in self.library.questions.questions(&pool) {
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            ui.strong(question.id.as_str());
                            ui.label(question.question.as_str());
                        });
                        if !question.answer.is_empty() {
                            ui.label(format!("   Answer: {}", question.answer));
                        }
                        for point in &question.key_points {
                            ui.label(format!("   • {}", point));
                        }
                        ui.horizontal(|ui| {
                            if ui.button("Edit").clicked() {
                                action_edit = Some(question.id.clone());
                            }
                            if ui.button("Remove").clicked() {
                                action_remove = Some(question.id.clone());
                            }
                        });
                    });
                }
            });

        if let Some(id) = action_edit {
            if let Some(question) = self.library.questions.find(&pool, &id) {
                self.question_form.question = question.question.clone();
                self.question_form.answer = question.answer.clone();
                self.question_form.key_points = question.key_points.join("\n");
                self.question_form.editing = Some(id);
            }
        }
        if let Some(id) = action_remove {
            match self.library.questions.remove_question(&pool, &id) {
                Ok(()) => {
                    self.persist_questions();
                }
                Err(e) => self.message = Some(e.to_string()),
            }
        }

        ui.separator();
        match &self.question_form.editing {
            Some(id) => ui.heading(format!("Edit {}", id)),
            None => ui.heading(format!("Add Question to {}", pool)),
        };
        ui.label("Question:");
        ui.add(egui::TextEdit::multiline(&mut self.question_form.question).desired_rows(2).desired_width(f32::INFINITY));
        ui.label("Answer:");
        ui.add(egui::TextEdit::multiline(&mut self.question_form.answer).desired_rows(4).desired_width(f32::INFINITY));
        ui.label("Key Points (one per line):");
        ui.add(egui::TextEdit::multiline(&mut self.question_form.key_points).desired_rows(3).desired_width(f32::INFINITY));

        ui.horizontal(|ui| {
            let label = if self.question_form.editing.is_some() { "Save Changes" } else { "Add Question" };
            if ui.button(label).clicked() {
                self.submit_question(&pool);
            }
            if ui.button("Cancel").clicked() {
                self.clear_question_form();
            }
        });
    }

    fn submit_question(&mut self, pool: &str) {
        let form = &self.question_form;
        let result = match &form.editing {
            Some(id) => self
                .library
                .questions
                .update_question(pool, id, &form.question, &form.answer, lines(&form.key_points))
                .map(|()| id.clone()),
            None => self
                .library
                .questions
                .add_question(pool, &form.question, &form.answer, lines(&form.key_points)),
        };
        match result {
            Ok(id) => {
                log::info!("Saved question {} in '{}'", id, pool);
                self.clear_question_form();
                self.persist_questions();
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    fn clear_question_form(&mut self) {
        self.question_form.editing = None;
        self.question_form.question.clear();
        self.question_form.answer.clear();
        self.question_form.key_points.clear();
    }

    fn persist_questions(&mut self) -> bool {
        match save_questions(self.store.as_ref(), &self.library.questions) {
            Ok(()) => true,
            Err(e) => {
                self.show_error("Failed to save questions", e);
                false
            }
        }
    }

    /// Handles question bank export to a JSON file
    fn handle_export(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name("question_bank.json")
            .add_filter("JSON files", &["json"])
            .save_file()
        {
            match export_json_to_path(&self.library.questions, &path) {
                Ok(()) => self.message = Some("Question bank exported successfully!".to_string()),
                Err(e) => self.show_error("Export failed", e),
            }
        }
    }

    /// Handles question bank import from a JSON file
    fn handle_import(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        {
            match import_json(&path) {
                Ok(bank) => {
                    let added = self.library.questions.merge(bank);
                    if self.persist_questions() {
                        self.message = Some(format!("Imported {} new questions.", added));
                    }
                }
                Err(e) => self.message = Some(format!(
                    "Import failed: {}\n\nPlease check if the file has correct structure:\n{{\n  \"principles\": {{ \"Ownership\": [...] }},\n  \"common\": [...]\n}}",
                    e
                )),
            }
        }
    }

    // ==================== Framework ====================

    fn render_framework(&mut self, ui: &mut egui::Ui) {
        ui.heading("Answer Framework");
        ui.add(
            egui::TextEdit::multiline(&mut self.library.framework.text)
                .desired_rows(20)
                .desired_width(f32::INFINITY),
        );
        if ui.button("Save Framework").clicked() {
            match save_framework(self.store.as_ref(), &self.library.framework) {
                Ok(()) => self.message = Some("Framework saved.".to_string()),
                Err(e) => self.show_error("Failed to save framework", e),
            }
        }
    }

    // ==================== Practice ====================

    fn render_practice(&mut self, ui: &mut egui::Ui) {
        ui.heading("Practice with Recording");

        let mut action_scope: Option<PracticeScope> = None;

        egui::ScrollArea::horizontal().id_source("lp_buttons").show(ui, |ui| {
            ui.horizontal(|ui| {
                for principle in LEADERSHIP_PRINCIPLES {
                    if ui.button(principle).clicked() {
                        action_scope = Some(PracticeScope::Principle(principle.to_string()));
                    }
                }
            });
        });
        ui.horizontal(|ui| {
            if ui.button("All Principles").clicked() {
                action_scope = Some(PracticeScope::All);
            }
            if ui.button("Common Questions").clicked() {
                action_scope = Some(PracticeScope::common());
            }
            if ui.button("Integrated (shuffled)").clicked() {
                action_scope = Some(PracticeScope::Integrated);
            }
            if ui.button("Random Principle").clicked() {
                action_scope = Some(PracticeScope::random_principle(&mut rand::thread_rng()));
            }
            if let Some(scope) = &self.last_scope {
                if ui.button("Next Question").clicked() {
                    action_scope = Some(scope.clone());
                }
            }
        });
        ui.separator();

        let active_state = self.session.active().map(ActiveCard::state);
        match self.session.active() {
            Some(card) => {
                let text = card_text(card);
                ui.group(|ui| {
                    ui.set_min_height(250.0);
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.label(egui::RichText::new(text).size(16.0));
                        ui.add_space(20.0);
                    });
                });
            }
            None => {
                ui.label("Pick a Leadership Principle or a pool to start practicing.");
            }
        }

        ui.add_space(10.0);
        let on_question = active_state == Some(DisplayState::Question);
        let recording = self.recording.is_some();
        let playing = self.playback.is_some();
        ui.horizontal(|ui| {
            if ui.add_enabled(on_question && !recording, egui::Button::new("Start Recording")).clicked() {
                self.start_recording();
            }
            if ui.add_enabled(recording, egui::Button::new("Stop Recording")).clicked() {
                self.stop_recording();
            }
            let can_play = active_state.is_some() && !on_question && !recording;
            if playing {
                if ui.button("Stop Playback").clicked() {
                    self.stop_playback();
                }
            } else if ui.add_enabled(can_play, egui::Button::new("Play Recording")).clicked() {
                self.play_recording();
            }
            if active_state.is_some() && ui.button("Reveal (Space)").clicked() {
                self.reveal_next();
            }
        });

        if active_state.is_some() {
            match self.session.last_practiced() {
                Some(at) => ui.label(format!("Last practiced on: {}", at)),
                None => ui.label("This is your first time practicing this question."),
            };
        }

        if self.session.has_unsaved_changes() {
            ui.horizontal(|ui| {
                ui.colored_label(
                    egui::Color32::from_rgb(200, 80, 40),
                    "Practice history is not saved yet.",
                );
                if ui.button("Retry Save").clicked() {
                    if let Err(e) = self.session.flush() {
                        self.show_error("Retry failed", e);
                    }
                }
            });
        }

        if let Some(scope) = action_scope {
            self.start_practice(scope);
        }
    }

    fn start_practice(&mut self, scope: PracticeScope) {
        let pool = scope.assemble(&self.library.questions, &mut rand::thread_rng());
        match self.session.start(scope.label(), &pool).map(|_| ()) {
            Ok(()) => self.last_scope = Some(scope),
            Err(PracticeError::InvalidArgument(_)) => {
                self.message = Some(format!("No questions available for {}", scope.label()));
            }
            Err(e) => self.show_error("Could not start practice", e),
        }
    }

    fn reveal_next(&mut self) {
        if let Err(e) = self.session.reveal_next(Timestamp::now()) {
            self.show_error("Review not saved", e);
        }
    }

    // ==================== Audio ====================

    fn start_recording(&mut self) {
        if self.recording.is_some() {
            return;
        }
        self.stop_playback();
        match CommandCapture::spawn(&self.config.capture_command) {
            Ok(capture) => {
                self.recording = Some(Recording::start(Box::new(capture), self.config.recording_path()));
            }
            Err(e) => self.show_error("Could not start recording", e),
        }
    }

    fn stop_recording(&mut self) {
        if let Some(recording) = self.recording.take() {
            if let Err(e) = recording.stop() {
                self.show_error("Recording failed", e);
            }
        }
    }

    fn play_recording(&mut self) {
        self.stop_playback();
        let path = self.config.recording_path();
        if !path.exists() {
            self.show_error("Error", AudioError::NoRecording(path));
            return;
        }
        let started = CommandPlayback::spawn(&self.config.playback_command)
            .and_then(|sink| Playback::start(&path, Box::new(sink)));
        match started {
            Ok(playback) => self.playback = Some(playback),
            Err(e) => self.show_error("Could not play recording", e),
        }
    }

    fn stop_playback(&mut self) {
        if let Some(playback) = self.playback.take() {
            if let Err(e) = playback.stop() {
                log::warn!("Playback ended with an error: {}", e);
            }
        }
    }

    /// Collects finished audio workers and keeps the UI ticking while one runs.
    fn poll_audio(&mut self, ctx: &egui::Context) {
        if self.playback.as_ref().is_some_and(Playback::is_finished) {
            if let Some(playback) = self.playback.take() {
                if let Err(e) = playback.wait() {
                    self.show_error("Playback failed", e);
                }
            }
        }
        if self.recording.as_ref().is_some_and(Recording::is_finished) {
            self.stop_recording();
        }
        if self.recording.is_some() || self.playback.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space_press() -> egui::RawInput {
        egui::RawInput {
            events: vec![egui::Event::Key {
                key: egui::Key::Space,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_space_press_is_taken_once() {
        let ctx = egui::Context::default();
        let _ = ctx.run(space_press(), |ctx| {
            assert!(take_reveal_key(ctx));
            assert!(!ctx.input(|i| i.key_pressed(egui::Key::Space)));
            assert!(!take_reveal_key(ctx));
        });
    }

    #[test]
    fn test_no_press_no_reveal() {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            assert!(!take_reveal_key(ctx));
        });
    }
}
