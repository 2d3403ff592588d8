use log::{error, info};
use sankey_viz::{Document, FixedViewport, Message, SankeyVisualization};
use std::io::{self, Read};

fn print_help() {
    println!("sankey-viz - Render Sankey diagram messages as SVG");
    println!();
    println!("Usage: sankey-viz [OPTIONS] [FILE]");
    println!();
    println!("Reads one or more JSON data messages from FILE or stdin. Each message");
    println!("replaces the previous diagram; the last diagram is printed.");
    println!();
    println!("Options:");
    println!("  -h, --help        Show this help message");
    println!("  --width <PX>      Viewport width (default: 800)");
    println!("  --height <PX>     Viewport height (default: 600)");
    println!();
    println!("Example:");
    println!("  echo '{{\"tables\":{{\"DEFAULT\":[{{\"dimensions\":[\"A\",\"B\"],\"metrics\":[5]}}]}}}}' | sankey-viz");
}

fn parse_dimension(args: &[String], flag: &str, default: f64) -> Result<f64, String> {
    match args.iter().position(|a| a == flag) {
        None => Ok(default),
        Some(i) => args
            .get(i + 1)
            .ok_or_else(|| format!("{} needs a value", flag))?
            .parse()
            .map_err(|e| format!("invalid {} value: {}", flag, e)),
    }
}

/// Read the whole input from a file, or from stdin when no file is given
fn read_input(file: Option<&str>) -> sankey_viz::Result<String> {
    let input = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(input)
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_help();
        return;
    }

    let viewport = match (
        parse_dimension(&args, "--width", 800.0),
        parse_dimension(&args, "--height", 600.0),
    ) {
        (Ok(width), Ok(height)) => FixedViewport::new(width, height),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Get input from a file argument or stdin; skip flag values
    let file = args
        .iter()
        .enumerate()
        .filter(|(i, a)| !a.starts_with('-') && !(*i > 0 && args[i - 1].starts_with("--")))
        .map(|(_, a)| a.clone())
        .next();
    let input = match read_input(file.as_deref()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {}: {}", file.as_deref().unwrap_or("stdin"), e);
            std::process::exit(1);
        }
    };

    if input.trim().is_empty() {
        eprintln!("Error: No input provided");
        std::process::exit(1);
    }

    let viz = SankeyVisualization::new();
    let mut document = Document::new();
    let mut cycles = 0;
    for message in serde_json::Deserializer::from_str(&input).into_iter::<Message>() {
        cycles += 1;
        let result = message
            .map_err(sankey_viz::Error::from)
            .and_then(|m| viz.on_data(&m, &viewport, &mut document));
        // A failed cycle only loses that diagram; later messages still render.
        // Undecodable input ends the stream.
        if let Err(e) = result {
            error!("render cycle {} failed: {}", cycles, e);
        }
    }
    info!("processed {} message(s)", cycles);

    match document.svg() {
        Some(svg) => println!("{}", svg),
        None => {
            eprintln!("Error: no diagram rendered");
            std::process::exit(1);
        }
    }
}
