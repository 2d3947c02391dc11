//! Signplay daemon - hosts the mini-game sessions for thin UI clients.
//!
//! The daemon owns:
//! - the active game (math quiz, A→Z signs, color quiz) and its round pacing
//! - the gesture stability filter (created on enable, dropped on disable)
//! - score telemetry to the backend (best-effort)
//! - a JSON-line IPC server so a browser page or native shell can drive it
//!
//! The UI client stays thin: it renders state snapshots, forwards clicks, and
//! pushes classifier predictions at the advertised poll cadence. Camera and
//! model lifecycles are entirely the client's; if they fail, predictions
//! simply stop arriving and the games stay playable by manual selection.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

mod game;
mod reporter;

use game::ActiveGame;
use reporter::{ScoreReporter, DEFAULT_BACKEND_URL};
use signplay_games::gesture::{Prediction, StabilityFilter};
use signplay_games::session::{Feedback, ScoreEvent};
use signplay_games::stats::GameStats;

// ═══════════════════════════════════════════════════════════════════════════
// IPC protocol
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
enum Request {
    GetState,
    SetGame {
        game: String,
    },
    /// Manual selection: by display position or by value.
    Select {
        #[serde(default)]
        index: Option<usize>,
        #[serde(default)]
        choice: Option<String>,
    },
    /// One classifier poll result, pushed by the UI client.
    Predict {
        label: String,
        confidence: f32,
    },
    SetGestureMode {
        enabled: bool,
    },
    /// A→Z game only: switch the practiced letter.
    SetLetter {
        letter: String,
    },
    /// A→Z game only: toggle the grown-up hint.
    SetTeachMode {
        enabled: bool,
    },
    CfgGet,
    CfgSet {
        #[serde(default)]
        feedback_delay_ms: Option<u32>,
        #[serde(default)]
        target_fps: Option<u32>,
        #[serde(default)]
        backend_url: Option<String>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
enum Response {
    State(Box<StateSnapshot>),
    Config {
        feedback_delay_ms: u32,
        target_fps: u32,
        backend_url: String,
    },
    Success {
        message: String,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct FeedbackView {
    result: String,
    #[serde(default)]
    correct: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GestureView {
    enabled: bool,
    consecutive: u32,
    in_cooldown: bool,
    confidence_threshold: f32,
    stability_required: u32,
    cooldown_ms: u64,
    poll_interval_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct StateSnapshot {
    game: String,
    prompt: String,
    options: Vec<String>,
    correct: String,
    response_made: bool,
    #[serde(default)]
    feedback: Option<FeedbackView>,
    #[serde(default)]
    color_code: Option<String>,
    #[serde(default)]
    expecting: Option<String>,
    #[serde(default)]
    hint: Option<String>,
    stats: StatsView,
    gesture: GestureView,
}

#[derive(Debug, Serialize, Deserialize)]
struct StatsView {
    correct: u32,
    incorrect: u32,
    rounds: u32,
    streak: u32,
    best_streak: u32,
    accuracy: f32,
}

impl StatsView {
    fn from_stats(stats: &GameStats) -> Self {
        Self {
            correct: stats.correct,
            incorrect: stats.incorrect,
            rounds: stats.rounds,
            streak: stats.streak,
            best_streak: stats.best_streak,
            accuracy: stats.accuracy(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Daemon state
// ═══════════════════════════════════════════════════════════════════════════

struct DaemonState {
    game: ActiveGame,
    /// Present only while gesture mode is enabled.
    gesture: Option<StabilityFilter>,
    reporter: ScoreReporter,
    target_fps: u32,
}

impl DaemonState {
    fn new(reporter: ScoreReporter) -> Self {
        Self {
            game: ActiveGame::Math(signplay_games::math::MathGame::new()),
            gesture: None,
            reporter,
            target_fps: 30,
        }
    }

    /// One frame of the game loop. Returns `true` when the color quiz wants
    /// a backend question to replace the builtin one it just installed.
    fn tick(&mut self) -> bool {
        self.game.update_timing()
    }

    fn set_game(&mut self, kind: &str) -> bool {
        let Some(mut game) = ActiveGame::from_kind(kind) else {
            return false;
        };
        game.set_feedback_delay_ms(self.game.feedback_delay_ms());
        self.game = game;
        // Each game carries its own gesture tuning; rebuild the filter so no
        // stability carries across games.
        if self.gesture.is_some() {
            self.gesture = Some(StabilityFilter::new(self.game.gesture_config()));
        }
        true
    }

    /// Idempotent: enabling twice keeps the existing filter, disabling twice
    /// is a no-op.
    fn set_gesture_mode(&mut self, enabled: bool) {
        if enabled {
            if self.gesture.is_none() {
                self.gesture = Some(StabilityFilter::new(self.game.gesture_config()));
            }
        } else {
            self.gesture = None;
        }
    }

    /// Run one prediction through the filter; on acceptance, resolve and
    /// score the selection it stands for.
    fn on_prediction(&mut self, prediction: &Prediction) -> Option<(Feedback, ScoreEvent)> {
        let label = self.gesture.as_mut()?.on_prediction(prediction)?;
        match self.game.resolve_label(&label) {
            Some(choice) => self.game.select(&choice),
            None => {
                // Unrecognized label: drop it and start accumulating fresh.
                if let Some(filter) = self.gesture.as_mut() {
                    filter.reset();
                }
                None
            }
        }
    }

    fn snapshot(&self) -> StateSnapshot {
        let round = self.game.round();
        let feedback = self.game.last_feedback().map(|f| match f {
            Feedback::Correct => FeedbackView {
                result: "correct".to_string(),
                correct: None,
            },
            Feedback::Incorrect { correct } => FeedbackView {
                result: "wrong".to_string(),
                correct: Some(correct.clone()),
            },
        });

        let config = self.game.gesture_config();
        let gesture = GestureView {
            enabled: self.gesture.is_some(),
            consecutive: self.gesture.as_ref().map_or(0, StabilityFilter::consecutive),
            in_cooldown: self.gesture.as_ref().is_some_and(StabilityFilter::in_cooldown),
            confidence_threshold: config.confidence_threshold,
            stability_required: config.stability_required,
            cooldown_ms: config.cooldown.as_millis() as u64,
            poll_interval_ms: config.poll_interval.as_millis() as u64,
        };

        let (color_code, expecting, hint) = match &self.game {
            ActiveGame::Colors(g) => (Some(g.current().color_code.clone()), None, None),
            ActiveGame::Letters(g) => (None, Some(g.expecting().to_string()), g.hint()),
            ActiveGame::Math(_) => (None, None, None),
        };

        StateSnapshot {
            game: self.game.kind().to_string(),
            prompt: round.prompt().to_string(),
            options: round.options().to_vec(),
            correct: round.correct().to_string(),
            response_made: self.game.response_made(),
            feedback,
            color_code,
            expecting,
            hint,
            stats: StatsView::from_stats(self.game.stats()),
            gesture,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Request handling
// ═══════════════════════════════════════════════════════════════════════════

async fn handle_request(request: Request, state: &Arc<RwLock<DaemonState>>) -> Response {
    match request {
        Request::GetState => {
            let s = state.read().await;
            Response::State(Box::new(s.snapshot()))
        }
        Request::SetGame { game } => {
            let mut s = state.write().await;
            if s.set_game(&game) {
                info!("game switched to {game}");
                Response::State(Box::new(s.snapshot()))
            } else {
                Response::Error {
                    message: format!("Unknown game '{game}'. Use math|az|color_quiz"),
                }
            }
        }
        Request::Select { index, choice } => {
            let mut s = state.write().await;
            let scored = match (index, choice) {
                (Some(i), _) => s.game.select_index(i),
                (None, Some(c)) => s.game.select(&c),
                (None, None) => {
                    return Response::Error {
                        message: "Select needs an index or a choice".to_string(),
                    }
                }
            };
            if let Some((_, event)) = scored {
                s.reporter.report(event);
            }
            Response::State(Box::new(s.snapshot()))
        }
        Request::Predict { label, confidence } => {
            let mut s = state.write().await;
            let prediction = Prediction::new(label, confidence.clamp(0.0, 1.0));
            if let Some((_, event)) = s.on_prediction(&prediction) {
                s.reporter.report(event);
            }
            Response::State(Box::new(s.snapshot()))
        }
        Request::SetGestureMode { enabled } => {
            let mut s = state.write().await;
            s.set_gesture_mode(enabled);
            info!(
                "gesture mode {}",
                if enabled { "enabled" } else { "disabled" }
            );
            Response::State(Box::new(s.snapshot()))
        }
        Request::SetLetter { letter } => {
            let mut s = state.write().await;
            let Some(c) = letter.trim().chars().next() else {
                return Response::Error {
                    message: "SetLetter needs a letter A-Z".to_string(),
                };
            };
            match &mut s.game {
                ActiveGame::Letters(g) => {
                    if g.set_expecting(c) {
                        Response::State(Box::new(s.snapshot()))
                    } else {
                        Response::Error {
                            message: format!("'{letter}' is not a letter A-Z"),
                        }
                    }
                }
                _ => Response::Error {
                    message: "SetLetter only applies to the az game".to_string(),
                },
            }
        }
        Request::SetTeachMode { enabled } => {
            let mut s = state.write().await;
            match &mut s.game {
                ActiveGame::Letters(g) => {
                    g.set_teach_mode(enabled);
                    Response::State(Box::new(s.snapshot()))
                }
                _ => Response::Error {
                    message: "SetTeachMode only applies to the az game".to_string(),
                },
            }
        }
        Request::CfgGet => {
            let s = state.read().await;
            Response::Config {
                feedback_delay_ms: s.game.feedback_delay_ms(),
                target_fps: s.target_fps,
                backend_url: s.reporter.base_url().to_string(),
            }
        }
        Request::CfgSet {
            feedback_delay_ms,
            target_fps,
            backend_url,
        } => {
            let mut s = state.write().await;
            if let Some(ms) = feedback_delay_ms {
                s.game.set_feedback_delay_ms(ms);
            }
            if let Some(fps) = target_fps {
                s.target_fps = fps.clamp(1, 240);
            }
            if let Some(url) = backend_url {
                s.reporter.set_base_url(url);
            }
            Response::Config {
                feedback_delay_ms: s.game.feedback_delay_ms(),
                target_fps: s.target_fps,
                backend_url: s.reporter.base_url().to_string(),
            }
        }
    }
}

async fn handle_client(
    stream: TcpStream,
    state: Arc<RwLock<DaemonState>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle_request(request, &state).await,
            Err(e) => Response::Error {
                message: format!("Invalid request: {e}"),
            },
        };

        writer
            .write_all(serde_json::to_string(&response)?.as_bytes())
            .await?;
        writer.write_all(b"\n").await?;
    }

    Ok(())
}

/// The color quiz advanced on its own; try to replace the builtin question
/// with one from the quiz-content backend. On failure the builtin stays.
async fn refresh_color_question(state: Arc<RwLock<DaemonState>>) {
    let reporter = {
        let s = state.read().await;
        s.reporter.clone()
    };
    match reporter.next_color_question().await {
        Ok(question) => {
            let mut s = state.write().await;
            if let ActiveGame::Colors(g) = &mut s.game {
                // Only swap while the round is still unanswered.
                if !g.session.response_made() && !g.load(question) {
                    warn!("backend color question was unusable, keeping builtin");
                }
            }
        }
        Err(e) => warn!("color question fetch failed, keeping builtin: {e}"),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let state = Arc::new(RwLock::new(DaemonState::new(ScoreReporter::new(
        DEFAULT_BACKEND_URL,
    ))));

    // Nothing to persist; just exit cleanly on Ctrl-C.
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutting down");
            std::process::exit(0);
        }
    });

    let listener = TcpListener::bind("127.0.0.1:7350").await?;
    info!("signplay daemon listening on 127.0.0.1:7350");

    // Game loop task: round pacing runs on the wall clock, the FPS only
    // bounds how often we check.
    let state_clone = Arc::clone(&state);
    tokio::spawn(async move {
        loop {
            let target_fps = {
                let s = state_clone.read().await;
                s.target_fps
            };
            let frame_millis = (1000 / target_fps).max(1) as u64;
            tokio::time::sleep(tokio::time::Duration::from_millis(frame_millis)).await;

            let wants_backend_question = {
                let mut s = state_clone.write().await;
                s.tick()
            };
            if wants_backend_question {
                tokio::spawn(refresh_color_question(Arc::clone(&state_clone)));
            }
        }
    });

    loop {
        let (stream, addr) = listener.accept().await?;
        info!("client connected: {addr}");
        let state_clone = Arc::clone(&state);

        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, state_clone).await {
                error!("client handler error: {e}");
            }
        });
    }
}
