use sheetpad::app;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    // Default grid size matches the original 20x10 deployment
    let mut rows: u32 = 20;
    let mut cols: u32 = 10;

    let seed = args.iter().any(|a| a == "--seed");
    let dims: Vec<&String> = args[1..].iter().filter(|a| !a.starts_with("--")).collect();
    if dims.len() >= 2 {
        rows = dims[0].parse().unwrap_or(20);
        cols = dims[1].parse().unwrap_or(10);
    }

    app::run(rows, cols, seed).await
}
