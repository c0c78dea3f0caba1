//! chatglue - Main Entry Point
//!
//! Debug harness for the page behaviors: reads a raw assistant message
//! from a file argument (or stdin), runs it through page initialization
//! exactly as a chat page would, and prints the rendered HTML fragment.

mod config;
mod error;
mod http;
mod markdown;
mod page;

use config::load_config;
use error::{Error, Result};
use log::info;
use page::{MessageNode, Page, PageElements};
use std::io::Read;
use std::path::PathBuf;

/// Application name constant.
const APP_NAME: &str = "chatglue";

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    let settings = load_config();

    let input = match std::env::args().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            info!("Rendering {}", path.display());
            std::fs::read_to_string(&path).map_err(|e| Error::InputRead { path, source: e })?
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let mut page = Page::new(
        settings,
        PageElements {
            messages: vec![MessageNode::assistant(input)],
            ..PageElements::default()
        },
    );
    page.initialize();

    if let Some(message) = page.message(0) {
        println!("{}", message.html());
    }

    Ok(())
}
