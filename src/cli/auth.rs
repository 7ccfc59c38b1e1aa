//! `auth` / `deauth` commands for the keyring-stored API key.

use std::error::Error;
use std::io::{self, BufRead, Write};

use crate::core::credentials::{delete_api_key, store_api_key, API_KEY_ENV};

pub fn run_auth() -> Result<(), Box<dyn Error>> {
    println!("🔐 vers3chat Authentication Setup");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    print!("Enter your Groq API key: ");
    io::stdout().flush()?;

    let mut key = String::new();
    io::stdin().lock().read_line(&mut key)?;
    let key = key.trim();
    if key.is_empty() {
        return Err("No API key entered".into());
    }

    store_api_key(key)?;
    println!("✅ API key stored in the system keyring");
    if std::env::var_os(API_KEY_ENV).is_some() {
        println!("⚠️  {API_KEY_ENV} is set and takes precedence over the stored key");
    }
    Ok(())
}

pub fn run_deauth() -> Result<(), Box<dyn Error>> {
    if delete_api_key()? {
        println!("✅ API key removed from the system keyring");
    } else {
        println!("No stored API key found");
    }
    Ok(())
}
