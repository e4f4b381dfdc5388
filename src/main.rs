use std::env;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use duoplay::{
    Engines, PlaybackState, PlayerCmd, PlayerService, RodioEngine, Settings, UnavailableVideo,
};

const HELP: &str = "\
commands:
  t            toggle play/pause
  n / p        next / previous track
  g <index>    play playlist entry
  + <url>      append to playlist
  - <index>    remove playlist entry
  c            clear playlist
  f / r [s]    seek forward / back (default step)
  s <secs>     seek to position
  v <0-100>    set volume
  m / l / a    toggle mute / loop / auto-next
  ?            show status
  q            quit";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let settings = Settings::load_or_default();

    let service = PlayerService::spawn(
        settings,
        Box::new(|| {
            Ok(Engines {
                audio: Box::new(RodioEngine::open_default()?),
                video: Box::new(UnavailableVideo),
            })
        }),
    )?;

    // Only report changes a person cares about, not every position sample.
    let mut last: Option<(Option<usize>, String, bool)> = None;
    service.subscribe(move |s: &PlaybackState| {
        let key = (s.current_index, s.current_title.clone(), s.is_playing);
        if last.as_ref() != Some(&key) {
            println!("{}", status_line(s));
            last = Some(key);
        }
    });

    for url in env::args().skip(1) {
        service.send(PlayerCmd::Add {
            url,
            title: None,
            thumbnail: None,
        })?;
    }
    service.send(PlayerCmd::Toggle)?;

    println!("{HELP}");
    let stdin = io::stdin();
    let mut out = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        let (cmd, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();

        let msg = match cmd {
            "" => continue,
            "q" => break,
            "?" => {
                if let Some(s) = service.snapshot() {
                    println!("{}", status_line(&s));
                    for (i, t) in s.playlist.iter().enumerate() {
                        let mark = if Some(i) == s.current_index { '>' } else { ' ' };
                        println!("{mark} {i:>3}  {}  {}", t.title, t.url);
                    }
                    if let Some(t) = s.current_track().and_then(|t| t.thumbnail.as_deref()) {
                        println!("artwork: {t}");
                    }
                }
                continue;
            }
            "t" => PlayerCmd::Toggle,
            "n" => PlayerCmd::Next,
            "p" => PlayerCmd::Previous,
            "c" => PlayerCmd::Clear,
            "m" => PlayerCmd::ToggleMute,
            "l" => PlayerCmd::ToggleLoop,
            "a" => PlayerCmd::ToggleAutoNext,
            "f" => PlayerCmd::FastForward(parse_secs(arg)),
            "r" => PlayerCmd::Rewind(parse_secs(arg)),
            "+" if !arg.is_empty() => PlayerCmd::Add {
                url: arg.to_string(),
                title: None,
                thumbnail: None,
            },
            "-" | "g" | "s" | "v" => match (cmd, arg.parse::<u64>()) {
                ("-", Ok(i)) => PlayerCmd::Remove(i as usize),
                ("g", Ok(i)) => PlayerCmd::PlayTrack(i as usize),
                ("s", Ok(secs)) => PlayerCmd::SeekTo(Duration::from_secs(secs)),
                ("v", Ok(v)) => PlayerCmd::SetVolume(v.min(u64::from(u32::MAX)) as u32),
                _ => {
                    eprintln!("duoplay: expected a number after {cmd}");
                    continue;
                }
            },
            _ => {
                println!("{HELP}");
                continue;
            }
        };
        service.send(msg)?;
        out.flush()?;
    }

    service.shutdown();
    Ok(())
}

/// Warnings and errors to stderr; `DUOPLAY_LOG` overrides the level.
fn init_logging() {
    let mut clog = colog::default_builder();
    clog.filter(None, log::LevelFilter::Warn);
    clog.parse_env("DUOPLAY_LOG");
    clog.init();
}

fn parse_secs(arg: &str) -> Option<Duration> {
    arg.parse::<u64>().ok().map(Duration::from_secs)
}

fn status_line(s: &PlaybackState) -> String {
    let state = if s.is_playing { "playing" } else { "paused" };
    let index = s
        .current_index
        .map_or_else(|| "-".to_string(), |i| (i + 1).to_string());
    format!(
        "[{index}/{}] {state}: {} ({}/{}, -{})",
        s.playlist.len(),
        s.current_title,
        clock(s.current_time),
        clock(s.duration),
        clock(s.remaining()),
    )
}

fn clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_keeps_warnings() {
        init_logging();
        assert!(log::max_level() >= log::LevelFilter::Warn);
        assert!(log::log_enabled!(log::Level::Warn));
    }

    #[test]
    fn status_line_shows_position_and_remaining() {
        let s = PlaybackState {
            phase: duoplay::PlayerPhase::Playing,
            is_playing: true,
            current_time: Duration::from_secs(65),
            duration: Duration::from_secs(200),
            volume: 100,
            muted: false,
            loop_enabled: false,
            current_track_url: "/music/a.mp3".into(),
            current_title: "A".into(),
            current_thumbnail: None,
            playlist: vec![duoplay::Track::new("/music/a.mp3", "A", None)],
            current_index: Some(0),
            auto_next: true,
        };
        assert_eq!(status_line(&s), "[1/1] playing: A (1:05/3:20, -2:15)");
        assert_eq!(s.current_track().map(|t| t.title.as_str()), Some("A"));
    }
}
