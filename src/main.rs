//! Achain key tool CLI
//!
//! Usage:
//!   act-key generate -n 5              # Generate 5 random keys
//!   act-key inspect 5HpHagT65TZz...    # Show public key and address for a key string
//!   act-key from-hex 0000...0001       # Build a key from a raw hex scalar

use std::error::Error;
use std::process;
use std::time::Duration;

use clap::Parser;

use act_key::config::{normalize_hex, Command};
use act_key::{Config, GeneratedKey, KeyError, PrivateKey, WorkerPool};

fn main() {
    env_logger::init();

    let config = Config::parse();

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    match &config.command {
        Command::Generate {
            count,
            report_interval,
            ..
        } => run_generate(config, *count, Duration::from_secs(*report_interval)),
        Command::Inspect { key } => print_key(&PrivateKey::from_encoded_text(key.trim())?)?,
        Command::FromHex { hex: scalar } => {
            let bytes = hex::decode(normalize_hex(scalar))?;
            print_key(&PrivateKey::from_raw_scalar(&bytes)?)?;
        }
    }
    Ok(())
}

fn run_generate(config: &Config, count: usize, report_interval: Duration) {
    println!("Achain Key Generator");
    println!("====================");
    println!("Workers:    {}", config.worker_count());
    println!("Target:     {} key(s)", count);
    println!();

    let pool = WorkerPool::new(config.worker_count());

    // Set up ctrl-c handler
    let stop_flag = pool.stop_flag_clone();
    ctrlc_handler(stop_flag);

    let mut found = 0;
    while found < count {
        match pool.wait_for_result(report_interval) {
            Some(result) => {
                found += 1;
                print_generated(&result, found);
            }
            None => print_progress(&pool, found, count),
        }

        if pool.is_stopped() {
            println!("\nStopped by user.");
            break;
        }
    }

    println!("--- Final Statistics ---");
    println!("Keys printed:   {}", found);
    println!("Failures:       {}", pool.total_failures());
    println!("Time elapsed:   {:.2}s", pool.elapsed().as_secs_f64());

    pool.join();
}

fn print_generated(result: &GeneratedKey, index: usize) {
    println!("=== Key #{} ===", index);
    println!("Private Key: {}", result.private_key);
    println!("Public Key:  {}", result.public_key);
    println!("Address:     {}", result.address);
    println!("Worker:      {}", result.worker_id);
    println!();
}

fn print_key(key: &PrivateKey) -> Result<(), KeyError> {
    println!("Private Key:     {}", key.to_key_string());
    println!("Scalar (hex):    {}", key.to_hex());
    println!("Scalar (int):    {}", key.scalar_as_integer());
    println!("Public Key:      {}", key.public_key_string()?);
    println!("Compressed:      {}", hex::encode(key.public_key(true)?));
    println!("Uncompressed:    {}", hex::encode(key.public_key(false)?));
    println!("Address:         {}", key.address()?);
    Ok(())
}

fn print_progress(pool: &WorkerPool, found: usize, count: usize) {
    println!(
        "[{:>4}s] {}/{} keys ({:.0}/s)",
        pool.elapsed().as_secs(),
        found,
        count,
        pool.keys_per_second()
    );
}

fn ctrlc_handler(stop_flag: std::sync::Arc<std::sync::atomic::AtomicBool>) {
    if let Err(e) = ctrlc::set_handler(move || {
        stop_flag.store(true, std::sync::atomic::Ordering::Relaxed);
    }) {
        log::warn!("failed to set Ctrl-C handler: {}", e);
    }
}
