// Runs multithreaded perft and prints the node count
//
// Usage: perft <threads> [depth] [fen] [expected]

use raychess::{perft, PerftConfig, Position};
use std::env;
use std::process::ExitCode;

fn usage() -> ExitCode {
    eprintln!("usage: perft <threads> [depth] [fen] [expected]");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(threads) = args.first().and_then(|s| s.parse::<usize>().ok()) else {
        return usage();
    };
    let depth = match args.get(1).map(|s| s.parse::<u32>()) {
        None => 5,
        Some(Ok(d)) => d,
        Some(Err(_)) => return usage(),
    };
    let pos = match args.get(2) {
        None => Position::initial(),
        Some(fen) => match Position::from_fen(fen) {
            Ok(pos) => pos,
            Err(e) => {
                eprintln!("bad FEN: {}", e);
                return ExitCode::from(2);
            }
        },
    };
    let expected = match args.get(3).map(|s| s.parse::<u64>()) {
        None => None,
        Some(Ok(n)) => Some(n),
        Some(Err(_)) => return usage(),
    };

    let config = PerftConfig {
        threads,
        ..PerftConfig::default()
    };
    let report = match perft::perft_parallel(&pos, depth, &config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for (mv, count) in &report.divide {
        println!("{}: {}", mv, count);
    }
    println!("total: {}", report.total);
    println!("elapsed: {} ms", report.elapsed.as_millis());
    println!("speed: {} nodes/ms", report.nodes_per_ms());

    match expected {
        Some(n) if n != report.total => {
            eprintln!("mismatch: expected {}, got {}", n, report.total);
            ExitCode::FAILURE
        }
        _ => ExitCode::SUCCESS,
    }
}
