use quill_delta::{
    render_for_display, validate_with_config, QuillConfig, QuillError, ViewerContent,
};
use std::env;
use std::fs;
use std::process;

fn usage() -> ! {
    eprintln!("Usage: delta-check [--config quill.yaml] [--render] <file.json>...");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  delta-check post.json");
    eprintln!("  delta-check --config quill.yaml --render *.json");
    process::exit(1);
}

fn main() {
    env_logger::init();

    let mut config_path = None;
    let mut render = false;
    let mut files = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => match args.next() {
                Some(path) => config_path = Some(path),
                None => usage(),
            },
            "--render" => render = true,
            "-h" | "--help" => usage(),
            _ => files.push(arg),
        }
    }
    if files.is_empty() {
        usage();
    }

    let config = match config_path {
        Some(path) => match QuillConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("✗ {}", e);
                process::exit(1);
            }
        },
        None => QuillConfig::default(),
    };

    let mut exit_code = 0;
    for file_path in files {
        match check_file(&file_path, &config) {
            Ok(html) => {
                println!("✓ {} is valid", file_path);
                if render {
                    println!("{}", html);
                }
            }
            Err(e) => {
                eprintln!("✗ {} has errors:", file_path);
                print_error(&e);
                exit_code = 1;
            }
        }
    }

    process::exit(exit_code);
}

fn check_file(path: &str, config: &QuillConfig) -> Result<String, QuillError> {
    let content = fs::read_to_string(path)
        .map_err(|e| QuillError::InvalidFormat {
            reason: format!("Failed to read file: {}", e),
        })?;

    validate_with_config(&content, config)?;
    Ok(render_for_display(&ViewerContent::Json(content), config))
}

fn print_error(error: &QuillError) {
    match error {
        QuillError::InvalidJson(msg) => {
            eprintln!("  Invalid JSON:");
            eprintln!("    {}", msg);
        }
        QuillError::MissingOps => {
            eprintln!("  Not a Delta:");
            eprintln!("    top-level 'ops' sequence is missing");
        }
        QuillError::TooShort { min } => {
            eprintln!("  Content too short:");
            eprintln!("    must be at least {} characters", min);
        }
        QuillError::TooLong { max } => {
            eprintln!("  Content too long:");
            eprintln!("    must not exceed {} characters", max);
        }
        e => match e.index() {
            Some(index) => eprintln!("  [{}] operation {}: {}", e.code(), index, e),
            None => eprintln!("  [{}] {}", e.code(), e),
        },
    }
}
