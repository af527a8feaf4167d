//! Build script for glint-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates face.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const EXPRESSIONS: [&str; 11] = [
    "normal",
    "sleepy",
    "asleep",
    "focused",
    "reading",
    "searching",
    "thinking",
    "terminal",
    "stressed",
    "happy",
    "done",
];

/// Integer keys per section with their accepted range
const RANGES: [(&str, &str, i64, i64); 10] = [
    ("eyes", "width", 8, 96),
    ("eyes", "height", 8, 112),
    ("eyes", "corner_radius", 0, 32),
    ("eyes", "iris_size", 2, 112),
    ("eyes", "pupil_size", 1, 112),
    ("eyes", "spacing", 0, 80),
    ("eyes", "offset_y", -100, 100),
    ("blink", "min_ms", 500, 60_000),
    ("blink", "max_ms", 500, 60_000),
    ("expression", "happy_squint", 0, 80),
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

/// Validate face.toml configuration at compile time
///
/// Stricter than the runtime loader, which falls back to defaults.
fn validate_config() {
    println!("cargo:rerun-if-changed=face.toml");

    let config_path = Path::new("face.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: face.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a face.toml configuration file.             ║\n\
            ║  Please create one in the glint-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read face.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in face.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_ranges(&config, &mut errors);
    validate_geometry(&config, &mut errors);
    validate_expression(&config, &mut errors);
    validate_colors(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid face configuration                               ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=face.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn get<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section).and_then(|s| s.get(key))
}

fn get_int(config: &toml::Value, section: &str, key: &str) -> Option<i64> {
    get(config, section, key).and_then(|v| v.as_integer())
}

/// Numeric fields must be integers within range
fn validate_ranges(config: &toml::Value, errors: &mut Vec<String>) {
    for (section, key, lo, hi) in RANGES {
        match get(config, section, key) {
            Some(toml::Value::Integer(v)) => {
                if *v < lo || *v > hi {
                    errors.push(format!("[{}] {} must be {}-{}", section, key, lo, hi));
                }
            }
            Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
            None => {}
        }
    }

    if let (Some(min), Some(max)) = (
        get_int(config, "blink", "min_ms"),
        get_int(config, "blink", "max_ms"),
    ) {
        if min > max {
            errors.push("[blink] min_ms must not exceed max_ms".to_string());
        }
    }
}

/// The iris must fit the eye and the pupil must fit the iris
fn validate_geometry(config: &toml::Value, errors: &mut Vec<String>) {
    let width = get_int(config, "eyes", "width").unwrap_or(70);
    let height = get_int(config, "eyes", "height").unwrap_or(80);
    let iris = get_int(config, "eyes", "iris_size").unwrap_or(40);
    let pupil = get_int(config, "eyes", "pupil_size").unwrap_or(20);
    let radius = get_int(config, "eyes", "corner_radius").unwrap_or(12);
    let spacing = get_int(config, "eyes", "spacing").unwrap_or(20);

    if iris > width.min(height) {
        errors.push("[eyes] iris_size must fit inside the eye".to_string());
    }
    if pupil > iris {
        errors.push("[eyes] pupil_size must not exceed iris_size".to_string());
    }
    if radius * 2 > width.min(height) {
        errors.push("[eyes] corner_radius is more than half the eye".to_string());
    }
    if width * 2 + spacing > 240 {
        errors.push("[eyes] two eyes plus spacing must fit 240 px".to_string());
    }
}

fn validate_expression(config: &toml::Value, errors: &mut Vec<String>) {
    match get(config, "expression", "default") {
        Some(toml::Value::String(name)) => {
            if !EXPRESSIONS.contains(&name.to_ascii_lowercase().as_str()) {
                errors.push(format!("[expression] unknown default '{}'", name));
            }
        }
        Some(_) => errors.push("[expression] default must be a string".to_string()),
        None => {}
    }

    for key in ["squint_by_default"] {
        if let Some(v) = get(config, "expression", key) {
            if !v.is_bool() {
                errors.push(format!("[expression] {} must be true or false", key));
            }
        }
    }
    for key in ["eyebrows", "crows_feet"] {
        if let Some(v) = get(config, "eyes", key) {
            if !v.is_bool() {
                errors.push(format!("[eyes] {} must be true or false", key));
            }
        }
    }
}

/// Colors must be `#RRGGBB`, ticker keys must name an expression
fn validate_colors(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(v) = get(config, "eyes", "iris_color") {
        if !is_color(v) {
            errors.push("[eyes] iris_color must be \"#RRGGBB\"".to_string());
        }
    }

    let ticker = match config.get("ticker") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[ticker] must be a table".to_string());
            return;
        }
        None => return,
    };

    for (name, value) in ticker {
        if !EXPRESSIONS.contains(&name.as_str()) {
            errors.push(format!("[ticker] unknown expression '{}'", name));
        } else if !is_color(value) {
            errors.push(format!("[ticker] {} must be \"#RRGGBB\"", name));
        }
    }
}

fn is_color(value: &toml::Value) -> bool {
    match value.as_str() {
        Some(s) => {
            s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}
