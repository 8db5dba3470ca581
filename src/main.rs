//! Habitus CLI
//!
//! Sensor-driven habit tracking engine.

use chrono::Utc;
use clap::{Parser, Subcommand};
use habitus::{
    config::Config,
    dashboard::{Dashboard, ToggleOutcome},
    events::create_shared_log,
    location::{FixedLocation, GeoPoint, LocationProvider, NoLocation},
    reading::{ReadingWorker, TextDetection},
    sensors::{
        check_available, ExerciseClassifier, GyroClassifier, LightClassifier, NoopSource,
        ReplaySource, SensorReading, StepClassifier,
    },
    store::{Habit, HabitKind, HabitStore},
    VERSION,
};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "habitus")]
#[command(version = VERSION)]
#[command(about = "Sensor-driven habit tracking engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine over sensor input
    Run {
        /// Sensor trace to replay (JSONL, one reading per line)
        #[arg(long)]
        trace: Option<PathBuf>,

        /// Text-recognition frame trace for the reading detector (JSONL)
        #[arg(long)]
        frames: Option<PathBuf>,

        /// Last-known latitude for event logging
        #[arg(long, requires = "longitude")]
        latitude: Option<f64>,

        /// Last-known longitude for event logging
        #[arg(long, requires = "latitude")]
        longitude: Option<f64>,
    },

    /// List habits and their completion state
    List,

    /// Create a new habit
    Add {
        /// Habit name
        name: String,

        /// What the habit aims for
        #[arg(long, default_value = "")]
        goal: String,

        /// Tracking period
        #[arg(long, default_value = "Everyday")]
        period: String,

        /// Completion kind (walk, exercise, read, focus, demo)
        #[arg(long, default_value = "demo")]
        kind: String,
    },

    /// Toggle a habit by hand (demo habits only; any habit can be unmarked)
    Complete {
        /// Habit name
        name: String,
    },

    /// Clear all stored habits and theme flags
    Reset,

    /// Show engine status
    Status,

    /// Show configuration
    Config,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            trace,
            frames,
            latitude,
            longitude,
        } => {
            cmd_run(trace, frames, latitude, longitude);
        }
        Commands::List => {
            cmd_list();
        }
        Commands::Add {
            name,
            goal,
            period,
            kind,
        } => {
            cmd_add(&name, &goal, &period, &kind);
        }
        Commands::Complete { name } => {
            cmd_complete(&name);
        }
        Commands::Reset => {
            cmd_reset();
        }
        Commands::Status => {
            cmd_status();
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn cmd_run(
    trace: Option<PathBuf>,
    frames: Option<PathBuf>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) {
    println!("Habitus v{VERSION}");
    println!();

    let config = Config::load().unwrap_or_default();
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }

    // Pick the sensor source: a readable trace, or the no-op fallback.
    let mut replay = None;
    let mut noop = None;
    match trace {
        Some(ref path) if check_available(path) => match ReplaySource::from_path(path) {
            Ok(source) => {
                println!("Replaying {} readings from {path:?}", source.len());
                replay = Some(source);
            }
            Err(e) => {
                eprintln!("Error loading sensor trace: {e}");
                std::process::exit(1);
            }
        },
        Some(ref path) => {
            eprintln!("Warning: sensor trace {path:?} not found; using no-op source");
            noop = Some(NoopSource::new());
        }
        None => {
            println!("No sensor trace given; using no-op source");
            noop = Some(NoopSource::new());
        }
    }

    let location: Box<dyn LocationProvider> = match (latitude, longitude) {
        (Some(lat), Some(lon)) => Box::new(FixedLocation(GeoPoint::new(lat, lon))),
        _ => Box::new(NoLocation),
    };

    // The grace window is measured in trace time, so anchor the dashboard at
    // the first reading when replaying.
    let started_at = replay
        .as_ref()
        .and_then(|r| r.first_timestamp())
        .unwrap_or_else(Utc::now);

    let events = create_shared_log();
    let mut dashboard = Dashboard::new(
        HabitStore::open_in(&config.data_path),
        events.clone(),
        location,
        config.dashboard,
        started_at,
    );

    let mut light = LightClassifier::new(config.light);
    let mut step = StepClassifier::new(config.step);
    let mut exercise = ExerciseClassifier::new(config.exercise);
    let mut gyro = GyroClassifier::new(config.gyro);

    // Reading pipeline: feed recognized-text frames to the worker.
    let reading_worker = frames.map(|path| {
        let (worker, frame_tx) = ReadingWorker::spawn();
        match load_frames(&path) {
            Ok(loaded) => {
                println!("Feeding {} recognized-text frames from {path:?}", loaded.len());
                thread::spawn(move || {
                    for frame in loaded {
                        if frame_tx.send(frame).is_err() {
                            break;
                        }
                    }
                });
            }
            Err(e) => {
                eprintln!("Warning: could not load frame trace: {e}");
            }
        }
        worker
    });

    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let running = Arc::new(AtomicBool::new(true));
    ctrlc_handler(running.clone());

    let (receiver, handle) = match (&mut replay, &mut noop) {
        (Some(source), _) => {
            let receiver = source.receiver().clone();
            let handle = source.start().unwrap_or_else(|e| {
                eprintln!("Error starting sensor source: {e}");
                std::process::exit(1);
            });
            (receiver, handle)
        }
        (None, Some(source)) => {
            let receiver = source.receiver().clone();
            let handle = source.start().unwrap_or_else(|e| {
                eprintln!("Error starting sensor source: {e}");
                std::process::exit(1);
            });
            (receiver, handle)
        }
        (None, None) => unreachable!("one source is always constructed"),
    };

    while running.load(Ordering::SeqCst) {
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(reading) => {
                let at = reading.timestamp();

                let signal = match reading {
                    SensorReading::Light(sample) => light.process(&sample),
                    SensorReading::Accel(sample) => {
                        // Both accelerometer classifiers see every sample.
                        let step_signal = step.process(&sample);
                        let exercise_signal = exercise.process(&sample);
                        if let Some(signal) = exercise_signal {
                            if let Err(e) = dashboard.apply_signal(signal, at) {
                                eprintln!("Warning: could not persist habit state: {e}");
                            }
                        }
                        step_signal
                    }
                    SensorReading::Gyro(sample) => gyro.process(&sample),
                };

                if let Some(signal) = signal {
                    if let Err(e) = dashboard.apply_signal(signal, at) {
                        eprintln!("Warning: could not persist habit state: {e}");
                    }
                }

                // Focus expiry is driven by trace time too.
                if let Some(signal) = gyro.tick(at) {
                    if let Err(e) = dashboard.apply_signal(signal, at) {
                        eprintln!("Warning: could not persist habit state: {e}");
                    }
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                // Replay exhausted: the source marks itself stopped.
                if !handle.is_running() && receiver.is_empty() {
                    break;
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                eprintln!("Sensor source disconnected unexpectedly");
                break;
            }
        }

        if let Some(ref worker) = reading_worker {
            if worker.try_detection().is_some() {
                match dashboard.complete_reading() {
                    Ok(true) => println!("Reading habit completed (page detected)"),
                    Ok(false) => {}
                    Err(e) => eprintln!("Warning: could not persist habit state: {e}"),
                }
            }
        }
    }

    handle.stop();
    if let Some(worker) = reading_worker {
        // Late frames are ignored by design; just let the worker drain.
        drop(worker);
    }

    println!();
    println!("Session summary");
    println!("===============");
    print_habits(dashboard.habits());
    println!();
    println!(
        "Theme: night mode {}, focus mode {}",
        on_off(dashboard.night_mode()),
        on_off(dashboard.focus_mode())
    );
    let logged = events.all();
    println!("Habit events this session: {}", logged.len());
    for event in &logged {
        println!(
            "  [{}] {} at ({:.4}, {:.4})",
            event.timestamp.format("%H:%M:%S"),
            event.label,
            event.latitude,
            event.longitude
        );
    }
}

fn cmd_list() {
    let config = Config::load().unwrap_or_default();
    let dashboard = open_dashboard(&config);
    print_habits(dashboard.habits());
}

fn cmd_add(name: &str, goal: &str, period: &str, kind: &str) {
    let Some(kind) = parse_kind(kind) else {
        eprintln!("Error: unknown habit kind '{kind}' (walk, exercise, read, focus, demo)");
        std::process::exit(1);
    };

    if name.trim().is_empty() {
        eprintln!("Error: habit name cannot be empty");
        std::process::exit(1);
    }

    let config = Config::load().unwrap_or_default();
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }

    let mut dashboard = open_dashboard(&config);
    if let Err(e) = dashboard.add_habit(Habit::new(name, goal, period, kind)) {
        eprintln!("Error saving habit: {e}");
        std::process::exit(1);
    }
    println!("Habit '{name}' created.");
}

fn cmd_complete(name: &str) {
    let config = Config::load().unwrap_or_default();
    let mut dashboard = open_dashboard(&config);

    match dashboard.toggle_manual(name) {
        Ok(ToggleOutcome::Completed) => println!("Habit '{name}' completed."),
        Ok(ToggleOutcome::Unmarked) => println!("Habit '{name}' unmarked."),
        Ok(ToggleOutcome::SensorOnly) => {
            println!("Habit '{name}' completes automatically via sensors.");
        }
        Ok(ToggleOutcome::NotFound) => {
            eprintln!("Error: no habit named '{name}'");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error saving habit state: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_reset() {
    let config = Config::load().unwrap_or_default();
    let mut store = HabitStore::open_in(&config.data_path);
    if let Err(e) = store.clear() {
        eprintln!("Error clearing store: {e}");
        std::process::exit(1);
    }
    println!("Stored habits and theme flags cleared.");
}

fn cmd_status() {
    let config = Config::load().unwrap_or_default();
    let store = HabitStore::open_in(&config.data_path);
    let habits = store.load();
    let completed = habits.iter().filter(|h| h.completed).count();

    println!("Habitus Status");
    println!("==============");
    println!();
    println!("Preference file: {:?}", store.path());
    if habits.is_empty() {
        println!("No stored habits (the dashboard seeds defaults on first run).");
    } else {
        println!("Habits: {completed}/{} completed", habits.len());
    }
    println!("Night mode: {}", on_off(store.night_mode()));
    println!("Focus mode: {}", on_off(store.focus_mode()));
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

fn open_dashboard(config: &Config) -> Dashboard {
    Dashboard::new(
        HabitStore::open_in(&config.data_path),
        create_shared_log(),
        Box::new(NoLocation),
        config.dashboard,
        Utc::now(),
    )
}

fn print_habits(habits: &[Habit]) {
    for habit in habits {
        println!(
            "  [{}] {} - {} ({}, {:?})",
            if habit.completed { "x" } else { " " },
            habit.name,
            habit.goal,
            habit.period,
            habit.kind
        );
    }
}

fn parse_kind(s: &str) -> Option<HabitKind> {
    match s.to_lowercase().as_str() {
        "walk" => Some(HabitKind::Walk),
        "exercise" => Some(HabitKind::Exercise),
        "read" => Some(HabitKind::Read),
        "focus" => Some(HabitKind::Focus),
        "demo" => Some(HabitKind::Demo),
        _ => None,
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn load_frames(path: &std::path::Path) -> Result<Vec<TextDetection>, std::io::Error> {
    let file = std::fs::File::open(path)?;
    let mut frames = Vec::new();
    for line in std::io::BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(frame) => frames.push(frame),
            Err(e) => {
                eprintln!("Warning: skipping malformed frame line: {e}");
            }
        }
    }
    Ok(frames)
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");
}
