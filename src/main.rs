use std::sync::Arc;
use std::time::Duration;

use memovox::audio::capture::{FramePump, MicCapture};
use memovox::audio::playback::{spawn_tick_chain, Playback};
use memovox::render::surface::{Color, DrawSurface};
use memovox::render::waveform::{self, Viewport};
use memovox::script::generator;
use memovox::script::keywords;
use memovox::script::themes::Theme;
use memovox::session::clock::format_timecode;
use memovox::session::event::{Effect, SessionEvent};
use memovox::session::state::{RecorderState, Session};
use ringbuf::traits::Split;
use ringbuf::HeapRb;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_SAMPLE_RATE: u32 = 48_000;
const VIEW: Viewport = Viewport {
    width: 480.0,
    height: 120.0,
};

/// Terminal waveform surface: maps the logical pixel grid onto a character
/// grid, one column per bar stride, painted with 24-bit ANSI color.
struct AsciiSurface {
    cols: usize,
    rows: usize,
    view_w: f64,
    view_h: f64,
    // Per cell: bar color, or None for background.
    grid: Vec<Vec<Option<Color>>>,
}

impl AsciiSurface {
    fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            view_w: 1.0,
            view_h: 1.0,
            grid: vec![vec![None; cols]; rows],
        }
    }

    fn present(&self) -> String {
        let mut out = String::new();
        for row in &self.grid {
            for cell in row {
                match cell {
                    Some(c) => {
                        out.push_str(&format!("\x1b[38;2;{};{};{}m█\x1b[0m", c.r, c.g, c.b));
                    }
                    None => out.push(' '),
                }
            }
            out.push('\n');
        }
        out
    }
}

impl DrawSurface for AsciiSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.view_w = width.max(1.0);
        self.view_h = height.max(1.0);
        for row in &mut self.grid {
            row.fill(None);
        }
    }

    fn fill_rounded_rect(&mut self, x: f64, y: f64, _width: f64, height: f64, _radius: f64, color: Color) {
        let col = (x / self.view_w * self.cols as f64).floor() as i64;
        if col < 0 || col >= self.cols as i64 {
            return;
        }
        let top = (y / self.view_h * self.rows as f64).floor() as i64;
        let bottom = ((y + height) / self.view_h * self.rows as f64).ceil() as i64;
        for r in top.max(0)..bottom.min(self.rows as i64) {
            self.grid[r as usize][col as usize] = Some(color);
        }
    }
}

/// Set up the microphone and its frame pump. Failure is non-fatal: the next
/// record press retries, matching a denied-then-granted permission flow.
fn init_mic(tx: mpsc::Sender<SessionEvent>) -> Option<MicCapture> {
    let rb = HeapRb::<f32>::new(16_384);
    let (producer, consumer) = rb.split();
    match MicCapture::new(producer) {
        Ok(mic) => {
            let gate = mic.gate();
            std::thread::spawn(move || FramePump::new(consumer, tx, gate).run());
            Some(mic)
        }
        Err(e) => {
            tracing::warn!("microphone unavailable: {}", e);
            None
        }
    }
}

fn parse_command(line: &str) -> Option<SessionEvent> {
    let line = line.trim();
    let (cmd, rest) = match line.split_once(' ') {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };
    match cmd {
        "record" => Some(SessionEvent::RecordPressed),
        "stop" => Some(SessionEvent::StopPressed),
        "play" => Some(SessionEvent::PlayPressed),
        "pause" => Some(SessionEvent::PausePressed),
        "delete" => Some(SessionEvent::DeleteRequested),
        "yes" => Some(SessionEvent::DeleteConfirmed),
        "no" => Some(SessionEvent::DeleteCancelled),
        "done" => Some(SessionEvent::DonePressed {
            at: chrono::Utc::now(),
        }),
        "tts" => Some(SessionEvent::ScriptPlayPressed),
        "channel" => match Theme::from_label(rest) {
            Some(theme) => Some(SessionEvent::ChannelSelected(theme)),
            None => {
                println!("unknown channel: {}", rest);
                None
            }
        },
        "text" => Some(SessionEvent::Recognition {
            final_text: format!("{} ", rest),
            interim: String::new(),
        }),
        "down" => rest.parse().ok().map(|x| SessionEvent::ScrubStart { x }),
        "move" => rest.parse().ok().map(|x| SessionEvent::ScrubMove { x }),
        "up" => Some(SessionEvent::ScrubEnd),
        "" => None,
        other => {
            println!("unknown command: {}", other);
            None
        }
    }
}

fn redraw(session: &Session, surface: &mut AsciiSurface) {
    let recording = session.state() == RecorderState::Recording;
    waveform::render(
        surface,
        &session.store,
        session.current_time(),
        recording,
        session.viewport(),
    );
    print!("{}", surface.present());
    println!(
        "[{}] {} words | {:?}",
        format_timecode(session.current_time()),
        session.timeline.word_count(),
        session.state()
    );
    let transcript = session.transcript_display("▮");
    if !transcript.is_empty() {
        println!("{}", transcript);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!("memovox starting");

    let (tx, mut rx) = mpsc::channel::<SessionEvent>(256);

    // Try the microphone up front so the session adopts the device rate.
    let mut mic = init_mic(tx.clone());
    let sample_rate = mic
        .as_ref()
        .map(|m| m.sample_rate())
        .unwrap_or(DEFAULT_SAMPLE_RATE);

    let mut session = Session::new(sample_rate, VIEW);
    let mut surface = AsciiSurface::new(96, 12);

    // Driver-held resources for in-flight effects.
    let mut playback: Option<Playback> = None;
    let mut tick_cancel = CancellationToken::new();
    let mut synth_kill: Option<tokio::sync::oneshot::Sender<()>> = None;
    let mut current_utterance: Option<String> = None;

    // Stdin command reader.
    let input_tx = tx.clone();
    tokio::spawn(async move {
        let stdin = tokio::io::stdin();
        let mut lines = BufReader::new(stdin).lines();
        println!("commands: record stop play pause delete yes no done tts channel <name> text <words> down/move/up <x>");
        while let Ok(Some(line)) = lines.next_line().await {
            if let Some(event) = parse_command(&line) {
                if input_tx.send(event).await.is_err() {
                    break;
                }
            }
        }
    });

    let mut cadence = tokio::time::interval(Duration::from_millis(50));
    cadence.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        cadence.tick().await;

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }

        let mut effects = Vec::new();
        for event in events {
            effects.extend(session.apply(event));
        }

        // One repaint per loop iteration no matter how many events asked.
        let mut wants_redraw = false;

        for effect in effects {
            match effect {
                Effect::Redraw => wants_redraw = true,

                Effect::StartCapture => {
                    if mic.is_none() {
                        mic = init_mic(tx.clone());
                        if let Some(m) = &mic {
                            if m.sample_rate() != sample_rate && session.store.is_empty() {
                                session = Session::new(m.sample_rate(), VIEW);
                                // Re-enter recording on the fresh session.
                                let _ = session.apply(SessionEvent::RecordPressed);
                            }
                        }
                    }
                    match &mic {
                        Some(m) => m.activate(),
                        None => println!("microphone unavailable, recording is silent"),
                    }
                }
                Effect::StopCapture => {
                    if let Some(m) = &mic {
                        m.deactivate();
                    }
                }

                Effect::StartPlayback { from } => {
                    tick_cancel.cancel();
                    tick_cancel = CancellationToken::new();
                    let snapshot = Arc::new(session.store.samples().to_vec());
                    match Playback::start(snapshot, session.store.sample_rate(), from) {
                        Ok(p) => playback = Some(p),
                        Err(e) => tracing::warn!("playback unavailable: {}", e),
                    }
                    // The tick chain runs even without a device so the
                    // playhead still advances.
                    spawn_tick_chain(tx.clone(), tick_cancel.clone());
                }
                Effect::StopPlayback => {
                    tick_cancel.cancel();
                    drop(playback.take());
                }

                Effect::Export(export) => {
                    let summary = keywords::extract(&export.full_text);
                    println!("── memo saved ──");
                    println!("{} {}", summary.title, summary.tag);
                    println!("{}", serde_json::to_string_pretty(&export)?);
                }

                Effect::GenerateScript { theme } => {
                    let gen_tx = tx.clone();
                    tokio::spawn(async move {
                        let event = match generator::generate(theme).await {
                            Ok(script) => SessionEvent::ScriptReady(script),
                            Err(e) => {
                                tracing::warn!("script generation failed: {}", e);
                                SessionEvent::ScriptFailed
                            }
                        };
                        let _ = gen_tx.send(event).await;
                    });
                }

                Effect::Speak(sentence) => {
                    if let Some(kill) = synth_kill.take() {
                        let _ = kill.send(());
                    }
                    current_utterance = Some(sentence.text.clone());
                    synth_kill = speak(&tx, &sentence.text);
                }
                Effect::CancelSpeech => {
                    if let Some(kill) = synth_kill.take() {
                        let _ = kill.send(());
                    }
                    current_utterance = None;
                }
                Effect::PauseSpeech => {
                    // `say` has no pause; the sentence restarts on resume.
                    if let Some(kill) = synth_kill.take() {
                        let _ = kill.send(());
                    }
                }
                Effect::ResumeSpeech => {
                    if let Some(text) = current_utterance.clone() {
                        synth_kill = speak(&tx, &text);
                    }
                }

                Effect::Log(msg) => println!("{}", msg),
            }
        }

        if wants_redraw {
            redraw(&session, &mut surface);
        }
    }
}

/// Speak one utterance via the system `say` command; falls back to a timed
/// silence when the command is missing so the sentence queue still advances.
/// Returns the kill switch for the in-flight utterance; killing it does NOT
/// report completion.
fn speak(
    tx: &mpsc::Sender<SessionEvent>,
    text: &str,
) -> Option<tokio::sync::oneshot::Sender<()>> {
    let (kill_tx, mut kill_rx) = tokio::sync::oneshot::channel::<()>();
    let tx = tx.clone();
    let text = text.to_string();

    tokio::spawn(async move {
        match tokio::process::Command::new("say")
            .arg(&text)
            .kill_on_drop(true)
            .spawn()
        {
            Ok(mut child) => {
                tokio::select! {
                    _ = child.wait() => {
                        let _ = tx.send(SessionEvent::SynthFinished).await;
                    }
                    _ = &mut kill_rx => {
                        let _ = child.kill().await;
                    }
                }
            }
            Err(_) => {
                // ~60ms per character approximates speech pacing.
                let pause = Duration::from_millis(60 * text.chars().count().max(1) as u64);
                tokio::select! {
                    _ = tokio::time::sleep(pause) => {
                        let _ = tx.send(SessionEvent::SynthFinished).await;
                    }
                    _ = &mut kill_rx => {}
                }
            }
        }
    });

    Some(kill_tx)
}
