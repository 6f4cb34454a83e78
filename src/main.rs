use std::env;
use std::fs;
use std::process;

use chordsheet::{ChordLibrary, CustomChordStore, LayeredResolver, ReaderConfig};

const USAGE: &str = "Usage: chordsheet <song.txt> [--transpose N] [--chords custom.json] [--config reader.yaml] [--capo] [--diagram CHORD]";

struct Options {
    song_path: Option<String>,
    transpose: i32,
    chords_path: Option<String>,
    config_path: Option<String>,
    capo: bool,
    diagram: Option<String>,
}

fn usage_error(message: &str) -> ! {
    eprintln!("{}", message);
    eprintln!("{}", USAGE);
    process::exit(1);
}

fn parse_args(args: &[String]) -> Options {
    let mut song_path = None;
    let mut transpose = 0;
    let mut chords_path = None;
    let mut config_path = None;
    let mut capo = false;
    let mut diagram = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--transpose" => {
                let value = iter.next().unwrap_or_else(|| usage_error("--transpose needs a value"));
                transpose = value
                    .parse()
                    .unwrap_or_else(|_| usage_error(&format!("Invalid transpose value: {}", value)));
            }
            "--chords" => chords_path = iter.next().cloned(),
            "--config" => config_path = iter.next().cloned(),
            "--diagram" => diagram = iter.next().cloned(),
            "--capo" => capo = true,
            flag if flag.starts_with("--") => usage_error(&format!("Unknown option: {}", flag)),
            path => song_path = Some(path.to_string()),
        }
    }

    if song_path.is_none() && diagram.is_none() {
        usage_error("Missing song file");
    }

    Options {
        song_path,
        transpose,
        chords_path,
        config_path,
        capo,
        diagram,
    }
}

fn read_file(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path, e);
            process::exit(1);
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    let config = match options.config_path.as_deref() {
        Some(path) => match ReaderConfig::from_yaml(&read_file(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error in '{}': {}", path, e);
                process::exit(1);
            }
        },
        None => ReaderConfig::default(),
    };

    let custom = match options.chords_path.as_deref() {
        Some(path) => match CustomChordStore::from_json(&read_file(path)) {
            Ok(store) => store,
            Err(e) => {
                eprintln!("Error in '{}': {}", path, e);
                process::exit(1);
            }
        },
        None => CustomChordStore::new(),
    };
    let library = ChordLibrary::builtin();
    let resolver = LayeredResolver::new(&custom, &library);

    // A diagram does not need the song.
    if let Some(name) = options.diagram.as_deref() {
        match chordsheet::chord_diagram(name, &resolver, &config) {
            Some(selection) => print!("{}", selection.diagram.to_svg()),
            None => {
                eprintln!("No fingering for chord '{}'", name);
                process::exit(1);
            }
        }
        return;
    }

    let song_path = options
        .song_path
        .as_deref()
        .unwrap_or_else(|| usage_error("Missing song file"));
    let source = read_file(song_path);
    let metadata = chordsheet::extract_metadata(&source);
    match (metadata.title(), metadata.artist()) {
        (Some(title), Some(artist)) => println!("{} - {}\n", title, artist),
        (Some(title), None) => println!("{}\n", title),
        _ => {}
    }

    let song = chordsheet::render_song_with_config(&source, options.transpose, &config);
    print!("{}", song.to_text());

    if options.capo {
        println!();
        match chordsheet::suggest_capo_with_config(&source, &config) {
            Some(suggestion) => println!(
                "Capo {}: difficulty {} -> {}",
                suggestion.capo, suggestion.original_score, suggestion.new_score
            ),
            None => println!("No capo needed"),
        }
    }
}
