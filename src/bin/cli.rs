//! pitchwheel CLI: live pitch-shifted playback and WAV export.
//!
//! Usage:
//!   pw-cli path/to/file.wav [--semitones N] [--block B]
//!   pw-cli path/to/file.wav --semitones -5 --wav output.wav
//!
//! During playback, type `+` / `-` (one semitone), a number (absolute
//! shift) or `q`, then Enter.

use pw_master::Controller;
use std::io::{BufRead, Write};
use std::sync::mpsc;
use std::time::Duration;
use std::{env, fs};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let path = args.get(1).unwrap_or_else(|| {
        eprintln!("Usage: pw-cli <file.wav> [--semitones N] [--block B] [--wav output.wav]");
        std::process::exit(1);
    });

    let flag = |name: &str| {
        args.iter()
            .position(|a| a == name)
            .and_then(|i| args.get(i + 1))
            .cloned()
    };
    let wav_path = flag("--wav");

    let data = fs::read(path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", path, e);
        std::process::exit(1);
    });

    let mut ctrl = Controller::new();
    ctrl.load_wav(&data).unwrap_or_else(|e| {
        eprintln!("Failed to parse WAV: {}", e);
        std::process::exit(1);
    });

    if let Some(block) = flag("--block") {
        let block: usize = block.parse().unwrap_or_else(|_| {
            eprintln!("Invalid block size: {}", block);
            std::process::exit(1);
        });
        ctrl.set_block_size(block).unwrap_or_else(|e| {
            eprintln!("Rejected block size: {}", e);
            std::process::exit(1);
        });
    }

    if let Some(s) = flag("--semitones") {
        let s: f64 = s.parse().unwrap_or_else(|_| {
            eprintln!("Invalid semitone offset: {}", s);
            std::process::exit(1);
        });
        ctrl.set_semitones(s);
    }

    if let Some(clip) = ctrl.clip() {
        println!("Rate:      {} Hz", clip.sample_rate);
        println!("Channels:  {}", clip.channels());
        println!("Length:    {:.2} s", clip.duration());
    }
    println!("Block:     {} samples", ctrl.block_size());
    println!("Shift:     {:+} semitones (x{:.4})", ctrl.semitones(), ctrl.pitch_factor());
    println!();

    match wav_path {
        Some(wav) => render_to_wav(&ctrl, &wav),
        None => play_audio(&mut ctrl),
    }
}

fn play_audio(ctrl: &mut Controller) {
    if let Err(e) = ctrl.play() {
        eprintln!("Failed to start playback: {}", e);
        std::process::exit(1);
    }
    println!("Playing... (+/-/<number>/q)");
    println!();

    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines().map_while(Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    while ctrl.is_playing() {
        while let Ok(cmd) = rx.try_recv() {
            match cmd.trim() {
                "q" => {
                    ctrl.stop();
                    println!("\rStopped.          ");
                    return;
                }
                "+" => {
                    ctrl.nudge_semitones(1.0);
                }
                "-" => {
                    ctrl.nudge_semitones(-1.0);
                }
                other => match other.parse::<f64>() {
                    Ok(s) => {
                        ctrl.set_semitones(s);
                    }
                    Err(_) => tracing::warn!("Unknown command: {}", other),
                },
            }
        }
        if let Some(pos) = ctrl.position() {
            print!("\rTime: {:6.2}s | Shift: {:+3} st", pos, ctrl.semitones());
            let _ = std::io::stdout().flush();
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    println!("\rDone.          ");
}

fn render_to_wav(ctrl: &Controller, path: &str) {
    println!("Rendering to {}...", path);

    let wav = ctrl.render_to_wav().unwrap_or_else(|e| {
        eprintln!("Failed to render: {}", e);
        std::process::exit(1);
    });
    println!("Rendered {} bytes", wav.len());

    fs::write(path, &wav).unwrap_or_else(|e| {
        eprintln!("Failed to write {}: {}", path, e);
        std::process::exit(1);
    });

    println!("Done.");
}
